//! Static content handed to the quiz engine: weekly themes and question sets.
//!
//! Nothing here is mutated at runtime.

mod bank;
mod themes;

pub use bank::{BuiltinQuestionBank, QuestionBank};
pub use themes::{THEMES, Theme, theme_by_id, theme_for_week};
