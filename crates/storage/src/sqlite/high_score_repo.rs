use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{HighScoreRepository, HighScoreUpdate, StorageError};

use super::SqliteRepository;

fn score_from_row(raw: i64) -> Result<u32, StorageError> {
    u32::try_from(raw)
        .map_err(|_| StorageError::Serialization(format!("stored high score out of range: {raw}")))
}

#[async_trait]
impl HighScoreRepository for SqliteRepository {
    async fn get_high_score(&self) -> Result<u32, StorageError> {
        let row = sqlx::query("SELECT score FROM high_score WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(0);
        };
        let score: i64 = row
            .try_get("score")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        score_from_row(score)
    }

    async fn record_score(&self, score: u32) -> Result<HighScoreUpdate, StorageError> {
        // The conditional upsert keeps the read-compare-write in one statement.
        let result = sqlx::query(
            r"
            INSERT INTO high_score (id, score, updated_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                score = excluded.score,
                updated_at = excluded.updated_at
            WHERE excluded.score > high_score.score
            ",
        )
        .bind(i64::from(score))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let is_new_record = result.rows_affected() > 0 && score > 0;
        let high_score = self.get_high_score().await?;
        if is_new_record {
            tracing::info!(high_score, "new high score recorded");
        }
        Ok(HighScoreUpdate {
            high_score,
            is_new_record,
        })
    }
}
