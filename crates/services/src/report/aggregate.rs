use std::fmt;

use quiz_core::model::{ProgressEntry, Subject, SubjectScores, percentage};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Averages below this get a "focus more" recommendation.
pub const FOCUS_THRESHOLD: f64 = 70.0;
/// Averages above this get an "excellent progress" recommendation.
pub const EXCELLENT_THRESHOLD: f64 = 90.0;

/// Mean score per subject over the entries that recorded that subject.
///
/// Subjects without any entry read as `0` but are reported as unrecorded by
/// [`SubjectAverages::recorded`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectAverages(SubjectScores);

impl SubjectAverages {
    fn from_entries(entries: &[ProgressEntry]) -> Self {
        let mut averages = SubjectScores::new();
        for subject in Subject::ALL {
            let (sum, count) = entries
                .iter()
                .filter_map(|entry| entry.score_for(subject))
                .fold((0.0_f64, 0_u32), |(sum, count), score| {
                    (sum + score, count.saturating_add(1))
                });
            if count > 0 {
                averages.insert(subject, sum / f64::from(count));
            }
        }
        Self(averages)
    }

    #[must_use]
    pub fn get(&self, subject: Subject) -> f64 {
        self.0.get(subject).unwrap_or(0.0)
    }

    /// Average for `subject`; `None` if no entry recorded it.
    #[must_use]
    pub fn recorded(&self, subject: Subject) -> Option<f64> {
        self.0.get(subject)
    }
}

impl Serialize for SubjectAverages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Subject::ALL.len()))?;
        for subject in Subject::ALL {
            map.serialize_entry(subject.key(), &self.get(subject))?;
        }
        map.end()
    }
}

/// Advice emitted for one subject.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Focus { subject: Subject, average: f64 },
    Excellent { subject: Subject },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Focus { subject, average } => write!(
                f,
                "Focus more practice on {subject} (current average: {average:.1}%)"
            ),
            Recommendation::Excellent { subject } => write!(
                f,
                "Excellent progress in {subject}! Consider advanced challenges."
            ),
        }
    }
}

/// Aggregate statistics derived from the progress history.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub total_sessions: usize,
    pub total_questions: u32,
    pub total_correct: u32,
    pub overall_accuracy: f64,
    pub subject_averages: SubjectAverages,
    pub recommendations: Vec<Recommendation>,
}

impl ReportSummary {
    /// Recommendations rendered as text, in subject order.
    #[must_use]
    pub fn recommendation_lines(&self) -> Vec<String> {
        self.recommendations.iter().map(ToString::to_string).collect()
    }
}

/// Summarize the history. Never fails: empty inputs aggregate to zeros.
#[must_use]
pub fn aggregate(entries: &[ProgressEntry]) -> ReportSummary {
    let total_questions = entries
        .iter()
        .fold(0_u32, |acc, entry| acc.saturating_add(entry.total_questions()));
    let total_correct = entries
        .iter()
        .fold(0_u32, |acc, entry| acc.saturating_add(entry.correct_answers()));
    let subject_averages = SubjectAverages::from_entries(entries);
    let recommendations = recommendations(&subject_averages);

    ReportSummary {
        total_sessions: entries.len(),
        total_questions,
        total_correct,
        overall_accuracy: percentage(total_correct, total_questions),
        subject_averages,
        recommendations,
    }
}

/// Apply the threshold rule to every recorded subject, in subject order.
#[must_use]
pub fn recommendations(averages: &SubjectAverages) -> Vec<Recommendation> {
    Subject::ALL
        .into_iter()
        .filter_map(|subject| {
            let average = averages.recorded(subject)?;
            if average < FOCUS_THRESHOLD {
                Some(Recommendation::Focus { subject, average })
            } else if average > EXCELLENT_THRESHOLD {
                Some(Recommendation::Excellent { subject })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quiz_core::model::QuizSummary;

    fn entry(subject: Subject, correct: u32, total: u32) -> ProgressEntry {
        let summary = QuizSummary::from_counts(subject, correct, total).unwrap();
        ProgressEntry::from_summary(
            &summary,
            1,
            "Taylor Swift Era",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        )
    }

    #[test]
    fn empty_history_aggregates_to_zero() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.total_questions, 0);
        assert!(summary.overall_accuracy.abs() < f64::EPSILON);
        for subject in Subject::ALL {
            assert!(summary.subject_averages.get(subject).abs() < f64::EPSILON);
        }
        assert!(summary.recommendations.is_empty());
    }

    #[test]
    fn sparse_subjects_average_only_their_entries() {
        let entries = [
            entry(Subject::Reading, 12, 20),
            entry(Subject::Reading, 16, 20),
            entry(Subject::Reading, 19, 20),
        ];
        let summary = aggregate(&entries);
        let reading = summary.subject_averages.get(Subject::Reading);
        assert!((reading - 78.333_333).abs() < 1e-4);
        assert!(summary.subject_averages.recorded(Subject::Math).is_none());
        assert!(summary.subject_averages.get(Subject::Math).abs() < f64::EPSILON);
        assert!(summary.recommendations.is_empty());
    }

    #[test]
    fn overall_accuracy_weights_by_question_count() {
        let entries = [entry(Subject::Math, 1, 1), entry(Subject::Spelling, 0, 3)];
        let summary = aggregate(&entries);
        assert_eq!(summary.total_questions, 4);
        assert_eq!(summary.total_correct, 1);
        assert!((summary.overall_accuracy - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn thresholds_produce_recommendations_in_subject_order() {
        let entries = [
            entry(Subject::Math, 3, 5),
            entry(Subject::Reading, 19, 20),
            entry(Subject::Grammar, 4, 5),
            entry(Subject::Spelling, 9, 10),
        ];
        let lines = aggregate(&entries).recommendation_lines();
        assert_eq!(
            lines,
            vec![
                "Excellent progress in reading! Consider advanced challenges.".to_owned(),
                "Focus more practice on math (current average: 60.0%)".to_owned(),
            ]
        );
    }

    #[test]
    fn averages_serialize_all_four_subjects() {
        let summary = aggregate(&[entry(Subject::Grammar, 2, 4)]);
        let value = serde_json::to_value(&summary.subject_averages).unwrap();
        assert_eq!(value["grammar"], 50.0);
        assert_eq!(value["reading"], 0.0);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}
