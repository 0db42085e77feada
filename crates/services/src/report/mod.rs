//! Aggregate statistics over the progress history and the two export
//! encodings built from them.
//!
//! Everything here is a pure function of the entries and an
//! [`ExportContext`]; only [`ReportService`] reads a clock.

mod aggregate;
mod printable;
mod service;
mod structured;

use chrono::{DateTime, Utc};

pub use aggregate::{
    EXCELLENT_THRESHOLD, FOCUS_THRESHOLD, Recommendation, ReportSummary, SubjectAverages,
    aggregate, recommendations,
};
pub use printable::to_printable_document;
pub use service::{ExportFormat, ExportedReport, ParseExportFormatError, ReportService};
pub use structured::{OverallProgress, StructuredReport, to_structured_document};

/// Inputs to an export that do not come from the history itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportContext {
    pub exported_at: DateTime<Utc>,
    pub current_week: u32,
}
