#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod ledger;
pub mod report;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AppError, PersistenceError, ReportError, SessionError};
pub use ledger::ProgressLedger;
pub use report::{ExportContext, ExportFormat, ExportedReport, ReportService, ReportSummary};
pub use sessions::{
    Countdown, DEFAULT_TIME_LIMIT_SECS, QuestionReview, QuizLoopService, QuizSession,
    SessionPhase, SessionProgress,
};
