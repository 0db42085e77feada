//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionError;
use storage::repository::StorageError;

/// Errors emitted by quiz session services.
///
/// `InvalidTransition` and `EmptyQuestionSet` are never returned by the
/// session itself; the session logs them and carries on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("`{operation}` ignored: session already submitted")]
    InvalidTransition { operation: &'static str },
    #[error("session loaded with no questions")]
    EmptyQuestionSet,
    #[error("session has not been submitted yet")]
    NotSubmitted,
    #[error("session result already recorded")]
    AlreadyRecorded,
    #[error("no theme with id `{id}`")]
    UnknownTheme { id: String },
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors emitted by the progress ledger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("stored progress in `{slot}` is unreadable: {reason}")]
    Corrupt { slot: String, reason: String },
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Corrupt { slot, reason } => Self::Corrupt { slot, reason },
            other => Self::Storage(other),
        }
    }
}

/// Errors emitted while encoding a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_storage_maps_to_corrupt_persistence() {
        let err = PersistenceError::from(StorageError::Corrupt {
            slot: "learningProgress".into(),
            reason: "expected value".into(),
        });
        assert!(matches!(err, PersistenceError::Corrupt { ref slot, .. } if slot == "learningProgress"));

        let err = PersistenceError::from(StorageError::Connection("closed".into()));
        assert!(matches!(err, PersistenceError::Storage(_)));
    }

    #[test]
    fn invalid_transition_names_the_operation() {
        let err = SessionError::InvalidTransition { operation: "next" };
        assert_eq!(err.to_string(), "`next` ignored: session already submitted");
    }
}
