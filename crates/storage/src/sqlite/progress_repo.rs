use lessons_core::model::UserId;

use super::{SqliteRepository, mapping};
use crate::repository::{ProgressRepository, ProgressRow, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn upsert_row(&self, row: &ProgressRow) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO learning_progress (
                    user_id, lesson_id, completed, current_step,
                    quiz_completed, quiz_score, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(user_id, lesson_id) DO UPDATE SET
                    completed = excluded.completed,
                    current_step = excluded.current_step,
                    quiz_completed = excluded.quiz_completed,
                    quiz_score = excluded.quiz_score,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(row.user_id.to_string())
        .bind(row.lesson_id.as_str())
        .bind(row.completed)
        .bind(i64::from(row.current_step))
        .bind(row.quiz_completed)
        .bind(i64::from(row.quiz_score))
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn rows_for_user(&self, user_id: UserId) -> Result<Vec<ProgressRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    user_id, lesson_id, completed, current_step,
                    quiz_completed, quiz_score, updated_at
                FROM learning_progress
                WHERE user_id = ?1
                ORDER BY lesson_id ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(mapping::map_progress_row(&row)?);
        }

        Ok(out)
    }
}
