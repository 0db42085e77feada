use std::sync::Arc;

use quiz_core::catalog::{QuestionBank, Theme};
use quiz_core::model::{ProgressEntry, Subject};
use storage::repository::Storage;

use crate::error::{AppError, SessionError};
use crate::ledger::ProgressLedger;
use crate::report::ReportService;
use crate::sessions::{QuizLoopService, QuizSession};
use crate::Clock;

/// Assembles app-facing services around the one progress ledger.
pub struct AppServices {
    quiz_loop: QuizLoopService,
    reports: ReportService,
    ledger: ProgressLedger,
}

impl AppServices {
    /// Build services over any storage and question source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Persistence` if the stored history cannot be read.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        bank: Arc<dyn QuestionBank>,
    ) -> Result<Self, AppError> {
        let ledger = ProgressLedger::load(Arc::clone(&storage.progress)).await?;
        Ok(Self {
            quiz_loop: QuizLoopService::new(clock, bank),
            reports: ReportService::new(clock),
            ledger,
        })
    }

    #[must_use]
    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.quiz_loop = self.quiz_loop.with_time_limit(seconds);
        self
    }

    #[must_use]
    pub fn quiz_loop(&self) -> &QuizLoopService {
        &self.quiz_loop
    }

    #[must_use]
    pub fn reports(&self) -> &ReportService {
        &self.reports
    }

    #[must_use]
    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    /// Start a session for `subject` in `week`, themed by `theme`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the questions cannot be built.
    pub fn start(
        &self,
        week: u32,
        theme: &'static Theme,
        subject: Subject,
    ) -> Result<QuizSession, SessionError> {
        self.quiz_loop.start(week, theme, subject)
    }

    /// Record a submitted session in the ledger.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::record`].
    pub async fn record(
        &mut self,
        week: u32,
        theme: &Theme,
        session: &mut QuizSession,
    ) -> Result<ProgressEntry, SessionError> {
        self.quiz_loop
            .record(week, theme, session, &mut self.ledger)
            .await
    }
}
