use chrono::SecondsFormat;
use quiz_core::model::ProgressEntry;
use serde::Serialize;
use storage::record::ProgressRecord;

use super::ExportContext;
use super::aggregate::{ReportSummary, SubjectAverages, aggregate};
use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    pub total_questions: u32,
    pub total_correct: u32,
    pub average_accuracy: f64,
}

/// Machine-readable export document.
///
/// `weeklyProgress` uses the same entry shape as the persisted history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredReport {
    pub export_date: String,
    pub current_week: u32,
    pub total_sessions: usize,
    pub overall_progress: OverallProgress,
    pub subject_averages: SubjectAverages,
    pub weekly_progress: Vec<ProgressRecord>,
    pub recommendations: Vec<String>,
}

impl StructuredReport {
    #[must_use]
    pub fn build(entries: &[ProgressEntry], ctx: &ExportContext) -> Self {
        Self::from_summary(aggregate(entries), entries, ctx)
    }

    pub(crate) fn from_summary(
        summary: ReportSummary,
        entries: &[ProgressEntry],
        ctx: &ExportContext,
    ) -> Self {
        let recommendations = summary.recommendation_lines();
        Self {
            export_date: ctx
                .exported_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            current_week: ctx.current_week,
            total_sessions: summary.total_sessions,
            overall_progress: OverallProgress {
                total_questions: summary.total_questions,
                total_correct: summary.total_correct,
                average_accuracy: summary.overall_accuracy,
            },
            subject_averages: summary.subject_averages,
            weekly_progress: entries.iter().map(ProgressRecord::from_entry).collect(),
            recommendations,
        }
    }
}

/// Encode the history as pretty-printed JSON.
///
/// # Errors
///
/// Returns `ReportError::Encode` if serialization fails.
pub fn to_structured_document(
    entries: &[ProgressEntry],
    ctx: &ExportContext,
) -> Result<String, ReportError> {
    let report = StructuredReport::build(entries, ctx);
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quiz_core::model::{QuizSummary, Subject};
    use quiz_core::time::fixed_now;

    fn ctx() -> ExportContext {
        ExportContext {
            exported_at: fixed_now(),
            current_week: 3,
        }
    }

    fn entries() -> Vec<ProgressEntry> {
        [(Subject::Reading, 4), (Subject::Math, 2)]
            .into_iter()
            .map(|(subject, correct)| {
                let summary = QuizSummary::from_counts(subject, correct, 5).unwrap();
                ProgressEntry::from_summary(
                    &summary,
                    2,
                    "K-Pop Demon Hunter",
                    NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn document_uses_export_field_names() {
        let json = to_structured_document(&entries(), &ctx()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exportDate"], "2023-11-14T22:13:20.000Z");
        assert_eq!(value["currentWeek"], 3);
        assert_eq!(value["totalSessions"], 2);
        assert_eq!(value["overallProgress"]["totalQuestions"], 10);
        assert_eq!(value["overallProgress"]["totalCorrect"], 6);
        assert_eq!(value["overallProgress"]["averageAccuracy"], 60.0);
        assert_eq!(value["subjectAverages"]["reading"], 80.0);
        assert_eq!(value["subjectAverages"]["spelling"], 0.0);
        assert_eq!(value["weeklyProgress"][1]["subjectScore"]["math"], 40.0);
        assert_eq!(value["weeklyProgress"][1]["focusArea"], "Math");
        assert_eq!(
            value["recommendations"][0],
            "Focus more practice on math (current average: 40.0%)"
        );
    }

    #[test]
    fn document_is_deterministic() {
        let first = to_structured_document(&entries(), &ctx()).unwrap();
        let second = to_structured_document(&entries(), &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_history_still_exports() {
        let report = StructuredReport::build(&[], &ctx());
        assert_eq!(report.total_sessions, 0);
        assert!(report.weekly_progress.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.overall_progress.average_accuracy.abs() < f64::EPSILON);
    }
}
