use quiz_core::model::Question;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub position: usize,
    pub answered: usize,
    pub remaining_seconds: u32,
    pub is_submitted: bool,
}

/// Outcome of one question, for the results screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview<'a> {
    pub position: usize,
    pub question: &'a Question,
    pub answer: Option<&'a str>,
    pub is_correct: bool,
}
