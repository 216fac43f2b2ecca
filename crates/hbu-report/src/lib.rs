//! PDF and plain-text renderers for Highest & Best Use studies.
//!
//! Both renderers take a [`Study`](hbu_common::Study) and its
//! [`Plot`](hbu_common::Plot) and emit the same sections in the same order,
//! numbering only the sections the study actually carries.
//!
//! # Sections
//!
//! - Title, property block and executive summary (unnumbered)
//! - Development scenarios
//! - Zoning details
//! - Market analysis
//! - Space program
//! - Financial summary
//! - Risk factors
//! - Conclusion & next steps
//!
//! # Example
//!
//! ```no_run
//! use hbu_report::{DirectorySink, ReportConfig, ReportExporter};
//! # fn load() -> (hbu_common::Study, hbu_common::Plot) { unimplemented!() }
//!
//! let (study, plot) = load();
//! let exporter = ReportExporter::new(ReportConfig::default());
//! let mut sink = DirectorySink::new("reports");
//! let receipt = exporter.export_pdf(Some(&study), Some(&plot), &mut sink).unwrap();
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod sections;
pub mod text;

pub use config::{PageGeometry, ReportConfig};
pub use document::{document_filename, Document, DocumentRenderer};
pub use error::{ReportError, Result};
pub use export::{
    ClipboardSink, DirectorySink, DocumentSink, ExportReceipt, MemorySink, ReportExporter,
    WriterSink,
};
pub use layout::{Block, BlockKind, DrawOp, FontStyle, Layout, LayoutState, PlacedBlock};
pub use pdf::write_pdf;
pub use text::render_text;
