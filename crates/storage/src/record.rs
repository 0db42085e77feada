//! Persisted shape of the progress history and its JSON codec.

use chrono::NaiveDate;
use quiz_core::model::{ProgressEntry, ProgressEntryError, SubjectScores};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Persisted shape for one progress entry.
///
/// This mirrors the domain `ProgressEntry` so repositories can
/// serialize/deserialize without leaking storage concerns into the domain layer.
/// Older snapshots stored the score map under `scores`; both keys are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub week: u32,
    pub theme: String,
    #[serde(alias = "scores")]
    pub subject_score: SubjectScores,
    pub accuracy: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub date: NaiveDate,
    pub focus_area: String,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_entry(entry: &ProgressEntry) -> Self {
        Self {
            week: entry.week(),
            theme: entry.theme_name().to_owned(),
            subject_score: entry.scores().clone(),
            accuracy: entry.accuracy(),
            total_questions: entry.total_questions(),
            correct_answers: entry.correct_answers(),
            date: entry.date(),
            focus_area: entry.focus_area().label().to_owned(),
        }
    }

    /// Convert the record back into a domain `ProgressEntry`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressEntryError` if the record violates entry invariants.
    pub fn into_entry(self) -> Result<ProgressEntry, ProgressEntryError> {
        ProgressEntry::from_persisted(
            self.week,
            self.theme,
            self.subject_score,
            self.accuracy,
            self.total_questions,
            self.correct_answers,
            self.date,
        )
    }
}

/// Serialize the full ordered history for a slot write.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_progress(entries: &[ProgressEntry]) -> Result<String, StorageError> {
    let records: Vec<ProgressRecord> = entries.iter().map(ProgressRecord::from_entry).collect();
    serde_json::to_string(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse a slot payload back into ordered entries.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the payload is not a valid history.
pub fn decode_progress(slot: &str, payload: &str) -> Result<Vec<ProgressEntry>, StorageError> {
    let corrupt = |reason: String| StorageError::Corrupt {
        slot: slot.to_owned(),
        reason,
    };
    let records: Vec<ProgressRecord> =
        serde_json::from_str(payload).map_err(|e| corrupt(e.to_string()))?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_entry()
                .map_err(|e| corrupt(format!("entry {index}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizSummary, Subject};

    fn entry(subject: Subject, correct: u32) -> ProgressEntry {
        let summary = QuizSummary::from_counts(subject, correct, 5).unwrap();
        ProgressEntry::from_summary(
            &summary,
            1,
            "Taylor Swift Era",
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        )
    }

    #[test]
    fn record_uses_camel_case_schema() {
        let payload = encode_progress(&[entry(Subject::Reading, 4)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let first = &value[0];
        assert_eq!(first["week"], 1);
        assert_eq!(first["theme"], "Taylor Swift Era");
        assert_eq!(first["subjectScore"]["reading"], 80.0);
        assert_eq!(first["totalQuestions"], 5);
        assert_eq!(first["correctAnswers"], 4);
        assert_eq!(first["date"], "2024-05-06");
        assert_eq!(first["focusArea"], "Reading");
    }

    #[test]
    fn decode_preserves_order() {
        let entries = vec![entry(Subject::Math, 1), entry(Subject::Grammar, 5)];
        let payload = encode_progress(&entries).unwrap();
        let decoded = decode_progress("slot", &payload).unwrap();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn decode_accepts_legacy_scores_key() {
        let payload = r#"[{"week":2,"theme":"K-Pop Demon Hunter","scores":{"math":60},
            "accuracy":60,"totalQuestions":5,"correctAnswers":3,"date":"2024-01-02",
            "focusArea":"Math"}]"#;
        let decoded = decode_progress("slot", payload).unwrap();
        assert_eq!(decoded[0].score_for(Subject::Math), Some(60.0));
        assert_eq!(decoded[0].focus_area(), Subject::Math);
    }

    #[test]
    fn decode_reports_corruption() {
        let err = decode_progress("learningProgress", "{not json").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref slot, .. } if slot == "learningProgress"));

        let invalid = r#"[{"week":1,"theme":"X","subjectScore":{"reading":50},"accuracy":50,
            "totalQuestions":1,"correctAnswers":2,"date":"2024-01-02","focusArea":"Reading"}]"#;
        let err = decode_progress("learningProgress", invalid).unwrap_err();
        assert!(err.to_string().contains("entry 0"));
    }
}
