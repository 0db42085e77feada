use std::collections::BTreeMap;
use std::fmt;

use quiz_core::model::{Question, QuizSummary, Subject};

use super::progress::{QuestionReview, SessionProgress};
use crate::error::SessionError;

/// Seconds allotted to a session unless overridden.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

/// Lifecycle phase of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Submitted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed attempt at a fixed question set for a single subject.
///
/// Answers are stored exactly as entered and only normalized when scored.
/// Once submitted the session is frozen: answer, navigation and tick calls
/// are ignored until `restart` or `load`.
pub struct QuizSession {
    subject: Subject,
    questions: Vec<Question>,
    position: usize,
    answers: BTreeMap<usize, String>,
    time_limit: u32,
    remaining_seconds: u32,
    phase: SessionPhase,
    summary: Option<QuizSummary>,
    recorded: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(subject: Subject, questions: Vec<Question>) -> Self {
        Self::with_time_limit(subject, questions, DEFAULT_TIME_LIMIT_SECS)
    }

    #[must_use]
    pub fn with_time_limit(subject: Subject, questions: Vec<Question>, time_limit: u32) -> Self {
        let mut session = Self {
            subject,
            questions: Vec::new(),
            position: 0,
            answers: BTreeMap::new(),
            time_limit,
            remaining_seconds: time_limit,
            phase: SessionPhase::Active,
            summary: None,
            recorded: false,
        };
        session.load(questions);
        session
    }

    /// Bind a new question set and reset to the initial active state.
    pub fn load(&mut self, questions: Vec<Question>) {
        if questions.is_empty() {
            let error = SessionError::EmptyQuestionSet;
            tracing::warn!(subject = %self.subject, %error, "session will score 0%");
        }
        self.questions = questions;
        self.reset();
        tracing::debug!(subject = %self.subject, total = self.questions.len(), "session loaded");
    }

    /// Start over on the same question set.
    pub fn restart(&mut self) {
        self.reset();
        tracing::debug!(subject = %self.subject, "session restarted");
    }

    fn reset(&mut self) {
        self.position = 0;
        self.answers.clear();
        self.remaining_seconds = self.time_limit;
        self.phase = SessionPhase::Active;
        self.summary = None;
        self.recorded = false;
    }

    /// Record `text` verbatim as the answer at the current position.
    pub fn select_answer(&mut self, text: impl Into<String>) {
        if !self.accepts("select_answer") {
            return;
        }
        if self.position < self.questions.len() {
            self.answers.insert(self.position, text.into());
        }
    }

    /// Move forward; on the last question this submits.
    pub fn next(&mut self) -> Option<QuizSummary> {
        if !self.accepts("next") {
            return None;
        }
        if self.position + 1 < self.questions.len() {
            self.position += 1;
            None
        } else {
            self.submit()
        }
    }

    pub fn previous(&mut self) {
        if !self.accepts("previous") {
            return;
        }
        self.position = self.position.saturating_sub(1);
    }

    /// Count down one second; reaching zero submits.
    pub fn tick(&mut self) -> Option<QuizSummary> {
        if !self.accepts("tick") {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            tracing::info!(subject = %self.subject, "time is up, submitting");
            self.submit()
        } else {
            None
        }
    }

    /// Score and freeze the session.
    ///
    /// Returns the summary only on the transition itself; later calls return
    /// `None` and leave the stored summary untouched.
    pub fn submit(&mut self) -> Option<QuizSummary> {
        if self.phase == SessionPhase::Submitted {
            return None;
        }
        self.phase = SessionPhase::Submitted;
        let marks: Vec<bool> = self.review().iter().map(|r| r.is_correct).collect();
        match QuizSummary::from_marks(self.subject, &marks) {
            Ok(summary) => {
                tracing::info!(
                    subject = %self.subject,
                    correct = summary.correct_answers(),
                    total = summary.total_questions(),
                    accuracy = summary.accuracy(),
                    "session submitted"
                );
                self.summary = Some(summary.clone());
                Some(summary)
            }
            Err(err) => {
                tracing::error!(subject = %self.subject, error = %err, "session could not be scored");
                None
            }
        }
    }

    fn accepts(&self, operation: &'static str) -> bool {
        if self.phase == SessionPhase::Active {
            return true;
        }
        let error = SessionError::InvalidTransition { operation };
        tracing::debug!(%error, "ignored");
        false
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == SessionPhase::Submitted
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// Raw answer recorded at `position`, if any.
    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(String::as_str)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.time_limit - self.remaining_seconds
    }

    /// Summary computed at submission; `None` while active.
    #[must_use]
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        SessionProgress {
            total,
            position: self.position,
            answered: self.answered_count(),
            remaining_seconds: self.remaining_seconds,
            is_submitted: self.is_submitted(),
        }
    }

    /// Per-question outcome, in question order.
    #[must_use]
    pub fn review(&self) -> Vec<QuestionReview<'_>> {
        self.questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let answer = self.answer_at(position);
                QuestionReview {
                    position,
                    question,
                    answer,
                    is_correct: answer.is_some_and(|raw| question.is_correct(raw)),
                }
            })
            .collect()
    }

    pub(crate) fn is_recorded(&self) -> bool {
        self.recorded
    }

    pub(crate) fn mark_recorded(&mut self) {
        self.recorded = true;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject", &self.subject)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("answers_len", &self.answers.len())
            .field("remaining_seconds", &self.remaining_seconds)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{LocalizedText, QuestionId, QuestionKind};

    fn choice(id: u32, answer: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            LocalizedText::en_only(format!("Question {id}")),
            QuestionKind::multiple_choice([answer, "other"]),
            answer,
            None,
        )
        .unwrap()
    }

    fn input(id: u32, answer: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            LocalizedText::en_only(format!("Spell {id}")),
            QuestionKind::FreeInput,
            answer,
            None,
        )
        .unwrap()
    }

    fn five_questions() -> Vec<Question> {
        (1..=5).map(|id| choice(id, &format!("a{id}"))).collect()
    }

    #[test]
    fn starts_active_at_first_question() {
        let session = QuizSession::new(Subject::Reading, five_questions());
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.position(), 0);
        assert_eq!(session.remaining_seconds(), DEFAULT_TIME_LIMIT_SECS);
        assert_eq!(session.answered_count(), 0);
        assert!(session.summary().is_none());
    }

    #[test]
    fn single_correct_answer_scores_full_marks() {
        let mut session = QuizSession::new(Subject::Reading, vec![choice(1, "right")]);
        session.select_answer("right");
        let summary = session.submit().unwrap();
        assert!((summary.accuracy() - 100.0).abs() < f64::EPSILON);
        assert_eq!(summary.correct_answers(), 1);
        assert_eq!(summary.total_questions(), 1);
    }

    #[test]
    fn answers_are_matched_trimmed_and_case_insensitive() {
        let mut session = QuizSession::new(Subject::Spelling, vec![input(1, "receive")]);
        session.select_answer("Receive ");
        assert_eq!(session.answer_at(0), Some("Receive "));
        let summary = session.submit().unwrap();
        assert_eq!(summary.correct_answers(), 1);
    }

    #[test]
    fn select_answer_overwrites_previous_choice() {
        let mut session = QuizSession::new(Subject::Reading, vec![choice(1, "right")]);
        session.select_answer("other");
        session.select_answer("right");
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.submit().unwrap().correct_answers(), 1);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut session = QuizSession::new(Subject::Math, five_questions());
        session.previous();
        assert_eq!(session.position(), 0);
        for _ in 0..4 {
            assert!(session.next().is_none());
        }
        assert_eq!(session.position(), 4);
        session.previous();
        assert_eq!(session.position(), 3);
    }

    #[test]
    fn next_on_last_question_submits() {
        let mut session = QuizSession::new(Subject::Math, five_questions());
        for _ in 0..4 {
            session.next();
        }
        let summary = session.next().expect("last next submits");
        assert_eq!(summary.total_questions(), 5);
        assert!(session.is_submitted());
        assert_eq!(session.position(), 4);
    }

    #[test]
    fn submit_is_idempotent() {
        let mut session = QuizSession::new(Subject::Grammar, five_questions());
        session.select_answer("a1");
        let first = session.submit().unwrap();
        assert!(session.submit().is_none());
        assert_eq!(session.summary(), Some(&first));
    }

    #[test]
    fn submitted_session_ignores_input() {
        let mut session = QuizSession::new(Subject::Grammar, five_questions());
        session.next();
        session.submit();

        session.select_answer("a2");
        session.previous();
        assert!(session.next().is_none());
        assert!(session.tick().is_none());

        assert_eq!(session.position(), 1);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.remaining_seconds(), DEFAULT_TIME_LIMIT_SECS);
        assert_eq!(session.summary().unwrap().correct_answers(), 0);
    }

    #[test]
    fn timeout_submits_partial_answers() {
        let mut session = QuizSession::new(Subject::Reading, five_questions());
        session.select_answer("a1");
        session.next();
        session.select_answer("a2");

        let mut emitted = Vec::new();
        for _ in 0..DEFAULT_TIME_LIMIT_SECS {
            if let Some(summary) = session.tick() {
                emitted.push(summary);
            }
        }
        assert_eq!(emitted.len(), 1);
        assert!((emitted[0].accuracy() - 40.0).abs() < f64::EPSILON);
        assert_eq!(emitted[0].correct_answers(), 2);
        assert_eq!(session.remaining_seconds(), 0);
        assert!(session.tick().is_none());
    }

    #[test]
    fn restart_clears_answers_and_timer() {
        let mut session = QuizSession::with_time_limit(Subject::Math, five_questions(), 10);
        session.select_answer("a1");
        session.next();
        session.tick();
        session.submit();

        session.restart();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.position(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.remaining_seconds(), 10);
        assert_eq!(session.questions().len(), 5);
        assert!(session.summary().is_none());
    }

    #[test]
    fn load_replaces_questions_from_any_phase() {
        let mut session = QuizSession::new(Subject::Math, five_questions());
        session.submit();
        session.load(vec![choice(9, "x")]);
        assert!(!session.is_submitted());
        assert_eq!(session.questions().len(), 1);
        assert_eq!(session.current_question().map(|q| q.id().value()), Some(9));
    }

    #[test]
    fn empty_question_set_scores_zero() {
        let mut session = QuizSession::new(Subject::Spelling, Vec::new());
        session.select_answer("ignored");
        assert_eq!(session.answered_count(), 0);
        let summary = session.next().unwrap();
        assert_eq!(summary.total_questions(), 0);
        assert!(summary.accuracy().abs() < f64::EPSILON);
    }

    #[test]
    fn review_reports_unanswered_as_incorrect() {
        let mut session = QuizSession::new(Subject::Reading, five_questions());
        session.select_answer(" A1");
        session.submit();
        let review = session.review();
        assert_eq!(review.len(), 5);
        assert!(review[0].is_correct);
        assert_eq!(review[0].answer, Some(" A1"));
        assert!(!review[1].is_correct);
        assert!(review[1].answer.is_none());
    }

    #[test]
    fn progress_tracks_elapsed_time() {
        let mut session = QuizSession::with_time_limit(Subject::Math, five_questions(), 30);
        session.tick();
        session.tick();
        session.select_answer("a1");
        assert_eq!(session.elapsed_seconds(), 2);
        let progress = session.progress();
        assert_eq!(progress.total, 5);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining_seconds, 28);
        assert!(!progress.is_submitted);
    }
}
