//! Delivery of rendered reports.
//!
//! A [`DocumentSink`] receives finished PDF bytes under a suggested filename;
//! a [`ClipboardSink`] receives the plain-text report. [`ReportExporter`]
//! renders and delivers in one call, and treats a missing study or plot as
//! "nothing to export".

use crate::config::ReportConfig;
use crate::document::DocumentRenderer;
use crate::error::{ReportError, Result};
use crate::pdf::write_pdf;
use crate::text::render_text;
use hbu_common::{Plot, Study};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for finished documents.
pub trait DocumentSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// Destination for plain-text reports.
pub trait ClipboardSink {
    fn deliver(&mut self, text: &str) -> Result<()>;
}

/// Writes documents into a directory.
///
/// Bytes go to a temporary file in the target directory, are synced, and
/// the file is then renamed into place, so an interrupted export never
/// leaves a partial file under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths delivered so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Strip path separators so a filename cannot escape the target directory.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "report".to_string(),
        _ => cleaned,
    }
}

impl DocumentSink for DirectorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(sanitize_filename(filename));

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| ReportError::DeliveryError {
            target: target.display().to_string(),
            reason: e.error.to_string(),
        })?;

        self.written.push(target);
        Ok(())
    }
}

/// Collects deliveries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub documents: Vec<(String, Vec<u8>)>,
    pub texts: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_document(&self) -> Option<&(String, Vec<u8>)> {
        self.documents.last()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.texts.last().map(String::as_str)
    }
}

impl DocumentSink for MemorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<()> {
        self.documents.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

impl ClipboardSink for MemorySink {
    fn deliver(&mut self, text: &str) -> Result<()> {
        self.texts.push(text.to_string());
        Ok(())
    }
}

/// Writes plain-text reports to any writer, stdout by default.
pub struct WriterSink<W: Write> {
    inner: W,
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            inner: std::io::stdout(),
        }
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ClipboardSink for WriterSink<W> {
    fn deliver(&mut self, text: &str) -> Result<()> {
        writeln!(self.inner, "{}", text)?;
        self.inner.flush()?;
        Ok(())
    }
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub bytes: usize,
    /// Zero for plain-text exports.
    pub pages: usize,
}

/// Renders reports and hands them to sinks.
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    config: ReportConfig,
}

impl ReportExporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Render the PDF report and deliver it. Returns `Ok(None)` without
    /// doing anything when either input is missing.
    pub fn export_pdf(
        &self,
        study: Option<&Study>,
        plot: Option<&Plot>,
        sink: &mut dyn DocumentSink,
    ) -> Result<Option<ExportReceipt>> {
        let (Some(study), Some(plot)) = (study, plot) else {
            return Ok(None);
        };

        let document = DocumentRenderer::new(self.config.clone()).render(study, plot);
        let bytes = write_pdf(&document, &self.config)?;
        sink.deliver(&document.filename, &bytes)?;

        info!(
            study_id = %study.id,
            plot_id = %plot.id,
            filename = %document.filename,
            pages = document.page_count(),
            bytes = bytes.len(),
            "exported pdf report"
        );

        Ok(Some(ExportReceipt {
            pages: document.page_count(),
            filename: document.filename,
            bytes: bytes.len(),
        }))
    }

    /// Render the plain-text report and deliver it. Same guard as
    /// [`export_pdf`](Self::export_pdf).
    pub fn export_text(
        &self,
        study: Option<&Study>,
        plot: Option<&Plot>,
        sink: &mut dyn ClipboardSink,
    ) -> Result<Option<ExportReceipt>> {
        let (Some(study), Some(plot)) = (study, plot) else {
            return Ok(None);
        };

        let text = render_text(&self.config.title, study, plot);
        sink.deliver(&text)?;

        let filename = format!(
            "HBU-Study-{}-{}.txt",
            plot.parcel_number,
            self.config.effective_export_date().format("%Y-%m-%d")
        );
        info!(
            study_id = %study.id,
            plot_id = %plot.id,
            bytes = text.len(),
            "exported text report"
        );

        Ok(Some(ExportReceipt {
            filename,
            bytes: text.len(),
            pages: 0,
        }))
    }
}
