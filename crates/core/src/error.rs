use thiserror::Error;

use crate::model::{ProgressEntryError, QuestionError, SummaryError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    ProgressEntry(#[from] ProgressEntryError),
}
