use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessons_core::model::{LessonId, ProgressError, ProgressRecord, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one (user, lesson) progress entry.
///
/// This mirrors the domain `ProgressRecord` plus the storage key and an
/// `updated_at` stamp, so repositories can serialize/deserialize without
/// leaking storage concerns into the domain layer. `quiz_score` is stored
/// for reporting and never read back into unlock logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub completed: bool,
    pub current_step: u8,
    pub quiz_completed: bool,
    pub quiz_score: u32,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRow {
    #[must_use]
    pub fn from_record(
        user_id: UserId,
        lesson_id: LessonId,
        record: ProgressRecord,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            lesson_id,
            completed: record.completed(),
            current_step: record.current_step(),
            quiz_completed: record.quiz_completed(),
            quiz_score: record.quiz_score(),
            updated_at,
        }
    }

    /// Convert the row back into a domain `ProgressRecord`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the step is out of range or the completion
    /// flags violate the `completed ⟹ quiz_completed` invariant.
    pub fn into_record(self) -> Result<ProgressRecord, ProgressError> {
        ProgressRecord::from_persisted(
            self.completed,
            self.current_step,
            self.quiz_completed,
            self.quiz_score,
        )
    }
}

/// Repository contract for per-user lesson progress.
///
/// Writes are keyed by (user, lesson) and last-write-wins; there is no
/// version check, so concurrent writers race per lesson key.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Insert or update one progress row. Saving the same row twice must
    /// leave the store unchanged after the first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_row(&self, row: &ProgressRow) -> Result<(), StorageError>;

    /// All rows stored for the given user. Users with no rows yet get an
    /// empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn rows_for_user(&self, user_id: UserId) -> Result<Vec<ProgressRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<Mutex<HashMap<(UserId, LessonId), ProgressRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of rows currently held, across all users.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the inner lock is poisoned.
    pub fn row_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn upsert_row(&self, row: &ProgressRow) -> Result<(), StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((row.user_id, row.lesson_id.clone()), row.clone());
        Ok(())
    }

    async fn rows_for_user(&self, user_id: UserId) -> Result<Vec<ProgressRow>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|(_, row)| row.clone())
            .collect())
    }
}

/// Aggregates progress storage behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { progress }
    }
}
