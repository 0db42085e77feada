use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::ProgressEntry;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{
    ProgressRepository, SlotStore, StorageError, load_progress_from, save_progress_to,
};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SlotStore for SqliteRepository {
    async fn read_slot(&self, name: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT payload
                FROM progress_slots
                WHERE name = ?1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row
            .try_get("payload")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(payload))
    }

    async fn write_slot(&self, name: &str, payload: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO progress_slots (name, payload, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(name) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(name)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<Vec<ProgressEntry>>, StorageError> {
        load_progress_from(self).await
    }

    async fn save_progress(&self, entries: &[ProgressEntry]) -> Result<(), StorageError> {
        save_progress_to(self, entries).await
    }
}
