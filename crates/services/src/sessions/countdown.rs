//! Background ticking for an active quiz session.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::model::QuizSummary;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use super::service::QuizSession;

enum Tick {
    Continue,
    Stop,
    Expired(QuizSummary),
}

fn tick_once(session: &Mutex<QuizSession>) -> Tick {
    let Ok(mut guard) = session.lock() else {
        tracing::warn!("session lock poisoned, stopping countdown");
        return Tick::Stop;
    };
    if guard.is_submitted() {
        return Tick::Stop;
    }
    match guard.tick() {
        Some(summary) => Tick::Expired(summary),
        None => Tick::Continue,
    }
}

/// Calls `tick()` on a shared session once per period until it is submitted.
///
/// The task is aborted when the handle is cancelled or dropped, so a
/// countdown never outlives the screen that owns it.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
    expired: mpsc::Receiver<QuizSummary>,
}

impl Countdown {
    /// Spawn the ticking task on the current tokio runtime.
    #[must_use]
    pub fn start(session: Arc<Mutex<QuizSession>>, period: Duration) -> Self {
        let (tx, expired) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                match tick_once(&session) {
                    Tick::Continue => {}
                    Tick::Stop => break,
                    Tick::Expired(summary) => {
                        let _ = tx.send(summary).await;
                        break;
                    }
                }
            }
            tracing::debug!("countdown finished");
        });
        Self { handle, expired }
    }

    /// Wait for the timer to submit the session.
    ///
    /// Resolves to `None` once the countdown has stopped without expiring,
    /// e.g. because the session was submitted by other means. Cancel-safe.
    pub async fn expired(&mut self) -> Option<QuizSummary> {
        self.expired.recv().await
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Cancel and wait until the task, and its handle on the session, is gone.
    pub async fn stop(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{LocalizedText, Question, QuestionId, QuestionKind, Subject};

    fn shared_session(time_limit: u32) -> Arc<Mutex<QuizSession>> {
        let question = Question::new(
            QuestionId::new(1),
            LocalizedText::en_only("2 + 2"),
            QuestionKind::FreeInput,
            "4",
            None,
        )
        .unwrap();
        Arc::new(Mutex::new(QuizSession::with_time_limit(
            Subject::Math,
            vec![question],
            time_limit,
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_submits_and_delivers_summary() {
        let session = shared_session(3);
        session.lock().unwrap().select_answer(" 4");
        let mut countdown = Countdown::start(Arc::clone(&session), Duration::from_secs(1));

        let summary = countdown.expired().await.expect("timer expires");
        assert_eq!(summary.correct_answers(), 1);

        let guard = session.lock().unwrap();
        assert!(guard.is_submitted());
        assert_eq!(guard.remaining_seconds(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_stops_ticking() {
        let session = shared_session(10);
        let countdown = Countdown::start(Arc::clone(&session), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        countdown.cancel();
        tokio::time::sleep(Duration::from_secs(20)).await;

        let guard = session.lock().unwrap();
        assert_eq!(guard.remaining_seconds(), 8);
        assert!(!guard.is_submitted());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_aborts_the_task() {
        let session = shared_session(10);
        drop(Countdown::start(Arc::clone(&session), Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(session.lock().unwrap().remaining_seconds(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_releases_the_shared_session() {
        let session = shared_session(10);
        let countdown = Countdown::start(Arc::clone(&session), Duration::from_secs(1));
        countdown.stop().await;

        let session = Arc::try_unwrap(session).expect("task released its handle");
        assert_eq!(session.into_inner().unwrap().remaining_seconds(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submit_ends_countdown_without_summary() {
        let session = shared_session(10);
        let mut countdown = Countdown::start(Arc::clone(&session), Duration::from_secs(1));
        assert!(session.lock().unwrap().submit().is_some());

        assert!(countdown.expired().await.is_none());
        assert!(countdown.is_finished());
        assert_eq!(session.lock().unwrap().remaining_seconds(), 10);
    }
}
