mod ids;
mod locale;
mod progress;
mod question;
mod subject;
mod summary;

pub use ids::QuestionId;
pub use locale::{Locale, LocalizedText, ParseLocaleError};
pub use progress::{ProgressEntry, ProgressEntryError};
pub use question::{
    FALSE_LITERAL, Question, QuestionError, QuestionKind, TRUE_FALSE_OPTIONS, TRUE_LITERAL,
    normalize_answer,
};
pub use subject::{ParseSubjectError, Subject, SubjectScores};
pub use summary::{QuizSummary, SummaryError, percentage};
