use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown subject: {0}")]
pub struct ParseSubjectError(pub String);

/// One of the four practice categories.
///
/// Declaration order is the fixed subject order used for reports and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Reading,
    Spelling,
    Grammar,
    Math,
}

impl Subject {
    pub const ALL: [Subject; 4] = [
        Subject::Reading,
        Subject::Spelling,
        Subject::Grammar,
        Subject::Math,
    ];

    /// Lower-case key used in persisted and exported documents.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Subject::Reading => "reading",
            Subject::Spelling => "spelling",
            Subject::Grammar => "grammar",
            Subject::Math => "math",
        }
    }

    /// Capitalized label, as shown for a focus area.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Subject::Reading => "Reading",
            Subject::Spelling => "Spelling",
            Subject::Grammar => "Grammar",
            Subject::Math => "Math",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Subject {
    type Err = ParseSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseSubjectError(s.to_owned()))
    }
}

/// Percentage score per subject for a single entry.
///
/// Usually holds exactly one subject: every session grades one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectScores(BTreeMap<Subject, f64>);

impl SubjectScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(subject: Subject, score: f64) -> Self {
        let mut scores = Self::new();
        scores.insert(subject, score);
        scores
    }

    pub fn insert(&mut self, subject: Subject, score: f64) {
        self.0.insert(subject, score);
    }

    #[must_use]
    pub fn get(&self, subject: Subject) -> Option<f64> {
        self.0.get(&subject).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates in fixed subject order.
    pub fn iter(&self) -> impl Iterator<Item = (Subject, f64)> + '_ {
        self.0.iter().map(|(subject, score)| (*subject, *score))
    }

    /// Subject with the lowest score; ties go to the earliest subject.
    #[must_use]
    pub fn focus_area(&self) -> Option<Subject> {
        let mut lowest: Option<(Subject, f64)> = None;
        for (subject, score) in self.iter() {
            match lowest {
                Some((_, best)) if score >= best => {}
                _ => lowest = Some((subject, score)),
            }
        }
        lowest.map(|(subject, _)| subject)
    }
}

impl FromIterator<(Subject, f64)> for SubjectScores {
    fn from_iter<T: IntoIterator<Item = (Subject, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
