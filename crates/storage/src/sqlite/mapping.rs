use lessons_core::model::{LessonId, UserId};
use sqlx::Row;

use crate::repository::{ProgressRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

pub(crate) fn lesson_id_from_str(s: &str) -> Result<LessonId, StorageError> {
    s.parse::<LessonId>().map_err(ser)
}

pub(crate) fn step_from_i64(v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid current_step: {v}")))
}

pub(crate) fn score_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid quiz_score: {v}")))
}

pub(crate) fn map_progress_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressRow, StorageError> {
    let user_id = user_id_from_str(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?;
    let lesson_id =
        lesson_id_from_str(row.try_get::<String, _>("lesson_id").map_err(ser)?.as_str())?;
    let current_step = step_from_i64(row.try_get::<i64, _>("current_step").map_err(ser)?)?;
    let quiz_score = score_from_i64(row.try_get::<i64, _>("quiz_score").map_err(ser)?)?;

    Ok(ProgressRow {
        user_id,
        lesson_id,
        completed: row.try_get("completed").map_err(ser)?,
        current_step,
        quiz_completed: row.try_get("quiz_completed").map_err(ser)?,
        quiz_score,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}
