mod countdown;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use countdown::Countdown;
pub use progress::{QuestionReview, SessionProgress};
pub use service::{DEFAULT_TIME_LIMIT_SECS, QuizSession, SessionPhase};
pub use workflow::QuizLoopService;
