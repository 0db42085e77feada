use std::fmt;
use std::str::FromStr;

use quiz_core::model::ProgressEntry;

use super::ExportContext;
use super::aggregate::{ReportSummary, aggregate};
use super::printable::render;
use super::structured::StructuredReport;
use crate::Clock;
use crate::error::ReportError;

/// Export encodings offered to the guardian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Html,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when an export format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExportFormatError {
    raw: String,
}

impl fmt::Display for ParseExportFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown export format `{}` (expected json or html)", self.raw)
    }
}

impl std::error::Error for ParseExportFormatError {}

impl FromStr for ExportFormat {
    type Err = ParseExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" | "pdf" | "print" => Ok(ExportFormat::Html),
            _ => Err(ParseExportFormatError { raw: s.to_owned() }),
        }
    }
}

/// Encoded report plus what a caller needs to save or download it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub body: String,
}

/// Builds reports stamped with the service clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportService {
    clock: Clock,
}

impl ReportService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn context(&self, current_week: u32) -> ExportContext {
        ExportContext {
            exported_at: self.clock.now(),
            current_week,
        }
    }

    #[must_use]
    pub fn summary(&self, entries: &[ProgressEntry]) -> ReportSummary {
        aggregate(entries)
    }

    /// Encode the history in `format`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the structured document cannot be serialized.
    pub fn export(
        &self,
        entries: &[ProgressEntry],
        current_week: u32,
        format: ExportFormat,
    ) -> Result<ExportedReport, ReportError> {
        let ctx = self.context(current_week);
        let summary = aggregate(entries);
        let body = match format {
            ExportFormat::Json => {
                let report = StructuredReport::from_summary(summary, entries, &ctx);
                serde_json::to_string_pretty(&report)?
            }
            ExportFormat::Html => render(&summary, entries, &ctx),
        };
        let file_name = format!(
            "learning-progress-week-{}-{}.{}",
            current_week,
            ctx.exported_at.format("%Y-%m-%d"),
            format.extension()
        );
        tracing::info!(%format, file = %file_name, entries = entries.len(), "report exported");
        Ok(ExportedReport {
            file_name,
            mime_type: format.mime_type(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::{fixed_clock, fixed_now};

    #[test]
    fn export_names_file_after_week_and_date() {
        let svc = ReportService::new(fixed_clock());
        let json = svc.export(&[], 5, ExportFormat::Json).unwrap();
        assert_eq!(json.file_name, "learning-progress-week-5-2023-11-14.json");
        assert_eq!(json.mime_type, "application/json");
        assert!(json.body.contains("\"currentWeek\": 5"));

        let html = svc.export(&[], 5, ExportFormat::Html).unwrap();
        assert_eq!(html.file_name, "learning-progress-week-5-2023-11-14.html");
        assert!(html.body.contains("Week 5 | Generated on 2023-11-14"));
    }

    #[test]
    fn json_export_matches_pure_encoder() {
        let svc = ReportService::new(fixed_clock());
        let exported = svc.export(&[], 2, ExportFormat::Json).unwrap();
        let ctx = ExportContext {
            exported_at: fixed_now(),
            current_week: 2,
        };
        assert_eq!(
            exported.body,
            crate::report::to_structured_document(&[], &ctx).unwrap()
        );
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("html".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert_eq!("pdf".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
