use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::locale::{Locale, LocalizedText};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("correct answer cannot be empty")]
    EmptyAnswer,

    #[error("multiple-choice question needs at least two options, got {count}")]
    TooFewOptions { count: usize },

    #[error("correct answer `{answer}` is not one of the options")]
    AnswerNotInOptions { answer: String },

    #[error("true-false answer must be `Yes` or `No`, got `{answer}`")]
    InvalidTrueFalseAnswer { answer: String },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

pub const TRUE_LITERAL: &str = "Yes";
pub const FALSE_LITERAL: &str = "No";
pub const TRUE_FALSE_OPTIONS: [&str; 2] = [TRUE_LITERAL, FALSE_LITERAL];

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    FreeInput,
    TrueFalse,
}

impl QuestionKind {
    #[must_use]
    pub fn multiple_choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultipleChoice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Choices presented to the learner; empty for free input.
    #[must_use]
    pub fn options(&self) -> Vec<&str> {
        match self {
            QuestionKind::MultipleChoice { options } => options.iter().map(String::as_str).collect(),
            QuestionKind::TrueFalse => TRUE_FALSE_OPTIONS.to_vec(),
            QuestionKind::FreeInput => Vec::new(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::FreeInput => "input",
            QuestionKind::TrueFalse => "true-false",
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Lower-cases and trims an answer for comparison.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A single immutable quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: LocalizedText,
    kind: QuestionKind,
    correct_answer: String,
    explanation: Option<LocalizedText>,
}

impl Question {
    /// Build a question, checking that the answer fits the kind.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or answer is blank, a
    /// multiple-choice question has fewer than two options or an answer that
    /// is not one of them, or a true-false answer is not a fixed literal.
    pub fn new(
        id: QuestionId,
        prompt: LocalizedText,
        kind: QuestionKind,
        correct_answer: impl Into<String>,
        explanation: Option<LocalizedText>,
    ) -> Result<Self, QuestionError> {
        let correct_answer = correct_answer.into();
        if prompt.is_blank() {
            return Err(QuestionError::EmptyPrompt);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        match &kind {
            QuestionKind::MultipleChoice { options } => {
                if options.len() < 2 {
                    return Err(QuestionError::TooFewOptions {
                        count: options.len(),
                    });
                }
                if !options.iter().any(|o| *o == correct_answer) {
                    return Err(QuestionError::AnswerNotInOptions {
                        answer: correct_answer,
                    });
                }
            }
            QuestionKind::TrueFalse => {
                if !TRUE_FALSE_OPTIONS.contains(&correct_answer.as_str()) {
                    return Err(QuestionError::InvalidTrueFalseAnswer {
                        answer: correct_answer,
                    });
                }
            }
            QuestionKind::FreeInput => {}
        }

        Ok(Self {
            id,
            prompt,
            kind,
            correct_answer,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &LocalizedText {
        &self.prompt
    }

    #[must_use]
    pub fn prompt_in(&self, locale: Locale) -> &str {
        self.prompt.get(locale)
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn options(&self) -> Vec<&str> {
        self.kind.options()
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&LocalizedText> {
        self.explanation.as_ref()
    }

    /// True when `raw` matches the canonical answer after normalization.
    #[must_use]
    pub fn is_correct(&self, raw: &str) -> bool {
        normalize_answer(raw) == normalize_answer(&self.correct_answer)
    }

    /// Returns a copy with the prompt rewritten; kind and answer are untouched.
    #[must_use]
    pub fn with_prompt(mut self, prompt: LocalizedText) -> Self {
        self.prompt = prompt;
        self
    }
}
