//! Study generation: plot lookup, analysis, persistence.

use crate::analysis::Analyzer;
use crate::store::Repository;
use chrono::Utc;
use hbu_common::{Error, NewPlot, Plot, PlotId, Result, Study, StudyId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ties a repository to an analyzer.
pub struct StudyService<R: Repository> {
    repo: Arc<R>,
    analyzer: Box<dyn Analyzer>,
}

impl<R: Repository> StudyService<R> {
    pub fn new(repo: Arc<R>, analyzer: Box<dyn Analyzer>) -> Self {
        Self { repo, analyzer }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.name()
    }

    pub fn list_plots(&self) -> Vec<Plot> {
        self.repo.list_plots()
    }

    pub fn get_plot(&self, id: &PlotId) -> Result<Plot> {
        self.repo.get_plot(id).ok_or_else(|| Error::PlotNotFound {
            plot_id: id.to_string(),
        })
    }

    pub fn create_plot(&self, plot: NewPlot) -> Result<Plot> {
        Ok(self.repo.create_plot(plot)?)
    }

    /// Studies for an existing plot, oldest first.
    pub fn studies_for_plot(&self, plot_id: &PlotId) -> Result<Vec<Study>> {
        self.get_plot(plot_id)?;
        Ok(self.repo.studies_for_plot(plot_id))
    }

    pub fn get_study(&self, id: &StudyId) -> Result<Study> {
        self.repo.get_study(id).ok_or_else(|| Error::StudyNotFound {
            study_id: id.to_string(),
        })
    }

    /// Analyze the plot and store the resulting study.
    pub fn generate_study(&self, plot_id: &PlotId) -> Result<Study> {
        let plot = self.get_plot(plot_id)?;
        let started = Instant::now();
        info!(plot_id = %plot_id, analyzer = self.analyzer.name(), "analysis started");

        let analysis = self.analyzer.analyze(&plot).map_err(|e| {
            warn!(plot_id = %plot_id, error = %e, "analysis failed");
            Error::from(e)
        })?;
        debug!(
            plot_id = %plot_id,
            enhanced = analysis.is_enhanced(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        let study = self
            .repo
            .create_study(analysis.into_study(plot.id.clone(), Utc::now()))?;
        info!(
            study_id = %study.id,
            plot_id = %plot_id,
            enhanced = study.has_enhanced_data(),
            sections = study.populated_sections().len(),
            "study generated"
        );
        Ok(study)
    }

    /// The study and its plot, as needed by the report renderers.
    pub fn report_inputs(&self, study_id: &StudyId) -> Result<(Study, Plot)> {
        let study = self.get_study(study_id)?;
        let plot = self.get_plot(&study.plot_id)?;
        debug!(study_id = %study_id, plot_id = %plot.id, "report inputs loaded");
        Ok((study, plot))
    }
}
