use chrono::NaiveDate;
use thiserror::Error;

use crate::model::subject::{Subject, SubjectScores};
use crate::model::summary::QuizSummary;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProgressEntryError {
    #[error("entry has no subject scores")]
    NoScores,

    #[error("{field} must be a percentage in [0, 100], got {value}")]
    PercentageOutOfRange { field: &'static str, value: f64 },

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("theme name cannot be empty")]
    EmptyTheme,
}

/// One completed session as recorded in the progress ledger.
///
/// Entries are created once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    week: u32,
    theme_name: String,
    scores: SubjectScores,
    accuracy: f64,
    total_questions: u32,
    correct_answers: u32,
    date: NaiveDate,
    focus_area: Subject,
}

fn check_percentage(field: &'static str, value: f64) -> Result<(), ProgressEntryError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ProgressEntryError::PercentageOutOfRange { field, value })
    }
}

impl ProgressEntry {
    /// Record a submitted session for `week`.
    ///
    /// The focus area is the lowest-scoring subject of the summary, which for
    /// a single-subject session is that subject.
    #[must_use]
    pub fn from_summary(
        summary: &QuizSummary,
        week: u32,
        theme_name: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let scores = summary.scores().clone();
        let focus_area = scores.focus_area().unwrap_or(summary.subject());
        Self {
            week,
            theme_name: theme_name.into(),
            scores,
            accuracy: summary.accuracy(),
            total_questions: summary.total_questions(),
            correct_answers: summary.correct_answers(),
            date,
            focus_area,
        }
    }

    /// Rehydrate an entry from persisted storage.
    ///
    /// The focus area is recomputed from `scores`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressEntryError` if scores are empty, a percentage is out
    /// of range, the theme is blank, or counts do not align.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        week: u32,
        theme_name: String,
        scores: SubjectScores,
        accuracy: f64,
        total_questions: u32,
        correct_answers: u32,
        date: NaiveDate,
    ) -> Result<Self, ProgressEntryError> {
        if theme_name.trim().is_empty() {
            return Err(ProgressEntryError::EmptyTheme);
        }
        let focus_area = scores.focus_area().ok_or(ProgressEntryError::NoScores)?;
        for (_, score) in scores.iter() {
            check_percentage("subject score", score)?;
        }
        check_percentage("accuracy", accuracy)?;
        if correct_answers > total_questions {
            return Err(ProgressEntryError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }

        Ok(Self {
            week,
            theme_name,
            scores,
            accuracy,
            total_questions,
            correct_answers,
            date,
            focus_area,
        })
    }

    #[must_use]
    pub fn week(&self) -> u32 {
        self.week
    }

    #[must_use]
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    #[must_use]
    pub fn scores(&self) -> &SubjectScores {
        &self.scores
    }

    #[must_use]
    pub fn score_for(&self, subject: Subject) -> Option<f64> {
        self.scores.get(subject)
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn focus_area(&self) -> Subject {
        self.focus_area
    }
}
