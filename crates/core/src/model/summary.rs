use thiserror::Error;

use crate::model::subject::{Subject, SubjectScores};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Result of one submitted quiz session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    subject: Subject,
    scores: SubjectScores,
    accuracy: f64,
    total_questions: u32,
    correct_answers: u32,
}

/// `100 * correct / total`, with `0/0` defined as `0`.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * f64::from(correct) / f64::from(total)
    }
}

impl QuizSummary {
    /// Build a summary for a single-subject session.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::CountMismatch` if `correct_answers > total_questions`.
    pub fn from_counts(
        subject: Subject,
        correct_answers: u32,
        total_questions: u32,
    ) -> Result<Self, SummaryError> {
        if correct_answers > total_questions {
            return Err(SummaryError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }
        let accuracy = percentage(correct_answers, total_questions);
        Ok(Self {
            subject,
            scores: SubjectScores::single(subject, accuracy),
            accuracy,
            total_questions,
            correct_answers,
        })
    }

    /// Build a summary from per-question correctness flags.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::TooManyQuestions` if the count cannot fit in `u32`.
    pub fn from_marks(subject: Subject, marks: &[bool]) -> Result<Self, SummaryError> {
        let total = u32::try_from(marks.len())
            .map_err(|_| SummaryError::TooManyQuestions { len: marks.len() })?;
        let correct = u32::try_from(marks.iter().filter(|m| **m).count())
            .map_err(|_| SummaryError::TooManyQuestions { len: marks.len() })?;
        Self::from_counts(subject, correct, total)
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn scores(&self) -> &SubjectScores {
        &self.scores
    }

    /// Score recorded for the session's subject; equals `accuracy`.
    #[must_use]
    pub fn subject_score(&self) -> f64 {
        self.scores.get(self.subject).unwrap_or(self.accuracy)
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
}
