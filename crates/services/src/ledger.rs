//! Append-only history of submitted sessions.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use quiz_core::model::{ProgressEntry, QuizSummary};
use storage::repository::ProgressRepository;

use crate::error::PersistenceError;

/// In-memory progress history, written through to a repository.
///
/// Built once at startup with [`ProgressLedger::load`] and handed to
/// whoever records sessions or builds reports.
pub struct ProgressLedger {
    entries: Vec<ProgressEntry>,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressLedger {
    /// Read the stored history; a missing slot yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Corrupt` if stored data cannot be parsed,
    /// or `PersistenceError::Storage` if the backend cannot be read.
    pub async fn load(repo: Arc<dyn ProgressRepository>) -> Result<Self, PersistenceError> {
        let entries = repo.load_progress().await?.unwrap_or_default();
        tracing::info!(entries = entries.len(), "progress ledger loaded");
        Ok(Self { entries, repo })
    }

    /// Record a submitted session and persist the whole history.
    ///
    /// Nothing changes in memory unless the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the updated history cannot be stored.
    pub async fn append(
        &mut self,
        summary: &QuizSummary,
        week: u32,
        theme_name: &str,
        date: NaiveDate,
    ) -> Result<ProgressEntry, PersistenceError> {
        let entry = ProgressEntry::from_summary(summary, week, theme_name, date);
        let mut candidate = Vec::with_capacity(self.entries.len() + 1);
        candidate.extend_from_slice(&self.entries);
        candidate.push(entry.clone());

        self.repo.save_progress(&candidate).await?;
        self.entries = candidate;
        tracing::info!(
            week,
            subject = %summary.subject(),
            accuracy = summary.accuracy(),
            entries = self.entries.len(),
            "progress recorded"
        );
        Ok(entry)
    }

    /// Full history in recording order.
    #[must_use]
    pub fn all(&self) -> &[ProgressEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_week(&self, week: u32) -> impl Iterator<Item = &ProgressEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.week() == week)
    }

    #[must_use]
    pub fn latest_for_week(&self, week: u32) -> Option<&ProgressEntry> {
        self.entries.iter().rev().find(|entry| entry.week() == week)
    }
}

impl fmt::Debug for ProgressLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressLedger")
            .field("entries_len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Subject;
    use storage::repository::{InMemoryRepository, PROGRESS_SLOT};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn summary(subject: Subject, correct: u32) -> QuizSummary {
        QuizSummary::from_counts(subject, correct, 5).unwrap()
    }

    #[tokio::test]
    async fn empty_store_loads_empty_ledger() {
        let ledger = ProgressLedger::load(Arc::new(InMemoryRepository::new()))
            .await
            .unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.all().is_empty());
    }

    #[tokio::test]
    async fn append_persists_full_history() {
        let repo = InMemoryRepository::new();
        let mut ledger = ProgressLedger::load(Arc::new(repo.clone())).await.unwrap();

        let entry = ledger
            .append(&summary(Subject::Reading, 4), 1, "Taylor Swift Era", date(4))
            .await
            .unwrap();
        assert_eq!(entry.focus_area(), Subject::Reading);
        assert_eq!(entry.score_for(Subject::Reading), Some(80.0));
        assert_eq!(ledger.len(), 1);

        let reloaded = ProgressLedger::load(Arc::new(repo)).await.unwrap();
        assert_eq!(reloaded.all(), ledger.all());
    }

    #[tokio::test]
    async fn append_keeps_prior_entries() {
        let mut ledger = ProgressLedger::load(Arc::new(InMemoryRepository::new()))
            .await
            .unwrap();
        ledger
            .append(&summary(Subject::Math, 1), 1, "Taylor Swift Era", date(4))
            .await
            .unwrap();
        let before = ledger.all().to_vec();

        ledger
            .append(&summary(Subject::Spelling, 5), 2, "K-Pop Demon Hunter", date(11))
            .await
            .unwrap();
        assert_eq!(ledger.len(), before.len() + 1);
        assert_eq!(&ledger.all()[..before.len()], before.as_slice());
    }

    #[tokio::test]
    async fn failed_write_leaves_ledger_untouched() {
        let repo = InMemoryRepository::new();
        let mut ledger = ProgressLedger::load(Arc::new(repo.clone())).await.unwrap();
        ledger
            .append(&summary(Subject::Grammar, 3), 1, "Taylor Swift Era", date(4))
            .await
            .unwrap();

        repo.set_fail_writes(true);
        let err = ledger
            .append(&summary(Subject::Grammar, 5), 1, "Taylor Swift Era", date(5))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Storage(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_store_is_reported() {
        let repo = InMemoryRepository::new();
        repo.put_raw(PROGRESS_SLOT, "not json");
        let err = ProgressLedger::load(Arc::new(repo)).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn week_views_filter_entries() {
        let mut ledger = ProgressLedger::load(Arc::new(InMemoryRepository::new()))
            .await
            .unwrap();
        for (week, subject, correct) in [
            (1, Subject::Reading, 2),
            (2, Subject::Math, 3),
            (1, Subject::Math, 4),
        ] {
            ledger
                .append(&summary(subject, correct), week, "Theme", date(1))
                .await
                .unwrap();
        }
        assert_eq!(ledger.for_week(1).count(), 2);
        assert_eq!(
            ledger.latest_for_week(1).map(ProgressEntry::focus_area),
            Some(Subject::Math)
        );
        assert!(ledger.latest_for_week(3).is_none());
    }
}
