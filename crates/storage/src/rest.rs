//! Remote progress store speaking a PostgREST-style API.
//!
//! The hosted backend exposes the `learning_progress` table over REST:
//! filtered `GET` reads and bulk `POST` upserts with
//! `Prefer: resolution=merge-duplicates`, so a repeated save merges into the
//! existing (user, lesson) row instead of duplicating it.

use std::env;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessons_core::model::{LessonId, UserId};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::repository::{ProgressRepository, ProgressRow, StorageError};

#[derive(Clone, Debug)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteStoreConfig {
    /// Read the remote store endpoint from the environment.
    ///
    /// Returns `None` when `LESSONS_REMOTE_URL` or `LESSONS_REMOTE_KEY` is
    /// unset or blank, in which case callers should run cache-only.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("LESSONS_REMOTE_URL").ok()?;
        let api_key = env::var("LESSONS_REMOTE_KEY").ok()?;
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return None;
        }
        Some(Self { base_url, api_key })
    }
}

/// HTTP client for the remote progress table.
#[derive(Clone)]
pub struct RestProgressStore {
    client: Client,
    config: RemoteStoreConfig,
}

impl RestProgressStore {
    #[must_use]
    pub fn new(config: RemoteStoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Build a store from the environment, if configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        RemoteStoreConfig::from_env().map(Self::new)
    }

    fn table_url(&self) -> String {
        format!(
            "{}/learning_progress",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn status_error(status: reqwest::StatusCode) -> StorageError {
    if status == reqwest::StatusCode::NOT_FOUND {
        StorageError::NotFound
    } else {
        StorageError::Connection(format!("remote store returned status {status}"))
    }
}

#[async_trait]
impl ProgressRepository for RestProgressStore {
    async fn upsert_row(&self, row: &ProgressRow) -> Result<(), StorageError> {
        let payload = [ProgressRowDto::from_row(row)];

        let response = self
            .client
            .post(self.table_url())
            .bearer_auth(&self.config.api_key)
            .header("apikey", &self.config.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&payload)
            .send()
            .await
            .map_err(conn)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }
        Ok(())
    }

    async fn rows_for_user(&self, user_id: UserId) -> Result<Vec<ProgressRow>, StorageError> {
        let response = self
            .client
            .get(self.table_url())
            .bearer_auth(&self.config.api_key)
            .header("apikey", &self.config.api_key)
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
            ])
            .send()
            .await
            .map_err(conn)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let body: Vec<ProgressRowDto> = response.json().await.map_err(conn)?;
        body.into_iter().map(ProgressRowDto::into_row).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgressRowDto {
    user_id: String,
    lesson_id: String,
    completed: bool,
    current_step: i64,
    quiz_completed: bool,
    quiz_score: i64,
    updated_at: DateTime<Utc>,
}

impl ProgressRowDto {
    fn from_row(row: &ProgressRow) -> Self {
        Self {
            user_id: row.user_id.to_string(),
            lesson_id: row.lesson_id.as_str().to_owned(),
            completed: row.completed,
            current_step: i64::from(row.current_step),
            quiz_completed: row.quiz_completed,
            quiz_score: i64::from(row.quiz_score),
            updated_at: row.updated_at,
        }
    }

    fn into_row(self) -> Result<ProgressRow, StorageError> {
        fn ser<E: core::fmt::Display>(e: E) -> StorageError {
            StorageError::Serialization(e.to_string())
        }

        let user_id = self.user_id.parse::<UserId>().map_err(ser)?;
        let lesson_id = self.lesson_id.parse::<LessonId>().map_err(ser)?;
        let current_step = u8::try_from(self.current_step)
            .map_err(|_| ser(format!("invalid current_step: {}", self.current_step)))?;
        let quiz_score = u32::try_from(self.quiz_score)
            .map_err(|_| ser(format!("invalid quiz_score: {}", self.quiz_score)))?;

        Ok(ProgressRow {
            user_id,
            lesson_id,
            completed: self.completed,
            current_step,
            quiz_completed: self.quiz_completed,
            quiz_score,
            updated_at: self.updated_at,
        })
    }
}
