use std::sync::Arc;

use quiz_core::catalog::{QuestionBank, Theme, theme_by_id, theme_for_week};
use quiz_core::model::{ProgressEntry, Subject};

use super::service::{DEFAULT_TIME_LIMIT_SECS, QuizSession};
use crate::Clock;
use crate::error::SessionError;
use crate::ledger::ProgressLedger;

/// Orchestrates session start and recording of the result.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBank>,
    time_limit: u32,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBank>) -> Self {
        Self {
            clock,
            bank,
            time_limit: DEFAULT_TIME_LIMIT_SECS,
        }
    }

    #[must_use]
    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Theme the rotation assigns to `week`.
    #[must_use]
    pub fn theme(&self, week: u32) -> &'static Theme {
        theme_for_week(week)
    }

    /// Theme named by `theme_id`, or the weekly one when none is given.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTheme` if `theme_id` names no theme.
    pub fn resolve_theme(
        &self,
        week: u32,
        theme_id: Option<&str>,
    ) -> Result<&'static Theme, SessionError> {
        match theme_id {
            None => Ok(self.theme(week)),
            Some(id) => theme_by_id(id).ok_or_else(|| SessionError::UnknownTheme {
                id: id.to_owned(),
            }),
        }
    }

    /// Start a fresh session for `subject` in `week`, dressed in `theme`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Question` if the question bank content is invalid.
    pub fn start(
        &self,
        week: u32,
        theme: &'static Theme,
        subject: Subject,
    ) -> Result<QuizSession, SessionError> {
        let questions = self.bank.questions(week, theme, subject)?;
        tracing::info!(
            week,
            theme = theme.id,
            subject = %subject,
            questions = questions.len(),
            "session started"
        );
        Ok(QuizSession::with_time_limit(subject, questions, self.time_limit))
    }

    /// Append the submitted session's result to the ledger, once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitted` while the session is active,
    /// `SessionError::AlreadyRecorded` on a repeat call, or
    /// `SessionError::Persistence` if the ledger cannot be written.
    pub async fn record(
        &self,
        week: u32,
        theme: &Theme,
        session: &mut QuizSession,
        ledger: &mut ProgressLedger,
    ) -> Result<ProgressEntry, SessionError> {
        if session.is_recorded() {
            return Err(SessionError::AlreadyRecorded);
        }
        let summary = session.summary().cloned().ok_or(SessionError::NotSubmitted)?;
        let entry = ledger
            .append(&summary, week, theme.name, self.clock.today())
            .await?;
        session.mark_recorded();
        Ok(entry)
    }
}
