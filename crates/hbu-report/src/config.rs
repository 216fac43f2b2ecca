//! Report configuration types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    #[serde(default = "default_page_width")]
    pub width: f32,
    #[serde(default = "default_page_height")]
    pub height: f32,
    #[serde(default = "default_margin")]
    pub margin: f32,
    /// Lowest cursor position content may start a block at, before the
    /// block's own height is taken into account.
    #[serde(default = "default_bottom")]
    pub bottom: f32,
}

fn default_page_width() -> f32 {
    210.0
}

fn default_page_height() -> f32 {
    297.0
}

fn default_margin() -> f32 {
    20.0
}

fn default_bottom() -> f32 {
    280.0
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: default_page_width(),
            height: default_page_height(),
            margin: default_margin(),
            bottom: default_bottom(),
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// The four metric-row column anchors.
    pub fn columns(&self) -> [f32; 4] {
        [
            self.margin,
            self.margin + 45.0,
            self.margin + 90.0,
            self.margin + 135.0,
        ]
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Document title; the plain-text banner is its upper-cased form.
    #[serde(default = "default_title")]
    pub title: String,
    /// Page geometry.
    #[serde(default)]
    pub page: PageGeometry,
    /// Date used in export filenames. Today (UTC) when unset.
    #[serde(default)]
    pub export_date: Option<NaiveDate>,
    /// Flate-compress PDF content streams.
    #[serde(default = "default_true")]
    pub compress: bool,
}

fn default_title() -> String {
    "Highest & Best Use Study".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            page: PageGeometry::default(),
            export_date: None,
            compress: true,
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Pin the export date.
    pub fn with_export_date(mut self, date: NaiveDate) -> Self {
        self.export_date = Some(date);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Export date, falling back to today in UTC.
    pub fn effective_export_date(&self) -> NaiveDate {
        self.export_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
