//! Progress store adapter.
//!
//! Reconciles the per-user snapshot between the durable remote store and a
//! local cache behind one interface, so session and scoring code never
//! branches on storage mechanics. Loads degrade (remote -> cache ->
//! defaults) instead of failing; saves upsert each lesson independently and
//! report failures in aggregate.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use lessons_core::catalog::Catalog;
use lessons_core::model::{LessonId, ProgressSnapshot, UserId};
use storage::repository::{ProgressRepository, ProgressRow, StorageError};

//
// ─── LOAD RESULT ───────────────────────────────────────────────────────────────
//

/// Where a loaded snapshot came from. Anything but `Remote` is a
/// degradation the caller should surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Remote,
    Cache,
    Default,
}

impl SnapshotSource {
    #[must_use]
    pub fn is_degraded(self) -> bool {
        !matches!(self, SnapshotSource::Remote)
    }
}

/// A loaded snapshot together with its degradation signal.
#[derive(Debug, Clone)]
pub struct SnapshotLoad {
    snapshot: ProgressSnapshot,
    source: SnapshotSource,
}

impl SnapshotLoad {
    #[must_use]
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    #[must_use]
    pub fn into_snapshot(self) -> ProgressSnapshot {
        self.snapshot
    }
}

//
// ─── SAVE REPORT ───────────────────────────────────────────────────────────────
//

/// Aggregate outcome of a snapshot save. One entry per lesson attempted;
/// a failure for one lesson never blocks the others.
#[derive(Debug, Default)]
#[must_use]
pub struct SaveReport {
    saved: Vec<LessonId>,
    failed: Vec<(LessonId, StorageError)>,
}

impl SaveReport {
    #[must_use]
    pub fn saved(&self) -> &[LessonId] {
        &self.saved
    }

    #[must_use]
    pub fn failed(&self) -> &[(LessonId, StorageError)] {
        &self.failed
    }

    /// True when every lesson upsert succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Single entry point for reading and writing progress snapshots.
#[derive(Clone)]
pub struct ProgressService {
    primary: Arc<dyn ProgressRepository>,
    cache: Option<Arc<dyn ProgressRepository>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(primary: Arc<dyn ProgressRepository>) -> Self {
        Self {
            primary,
            cache: None,
        }
    }

    /// Attach a local fallback cache. Reads fall back to it when the
    /// primary store is unavailable; writes are mirrored into it.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ProgressRepository>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Load the user's snapshot.
    ///
    /// Remote first; on failure the local cache; on a double failure the
    /// all-default snapshot. Never fails: degradation is reported through
    /// `SnapshotSource`, and a successful remote read refreshes the cache
    /// best-effort.
    pub async fn load(&self, user_id: UserId, catalog: &Catalog) -> SnapshotLoad {
        match self.primary.rows_for_user(user_id).await {
            Ok(rows) => {
                self.refresh_cache(user_id, &rows).await;
                SnapshotLoad {
                    snapshot: build_snapshot(catalog, rows),
                    source: SnapshotSource::Remote,
                }
            }
            Err(err) => {
                tracing::warn!(
                    user = %user_id,
                    error = %err,
                    "remote progress read failed, falling back to local cache"
                );
                self.load_from_cache(user_id, catalog).await
            }
        }
    }

    async fn load_from_cache(&self, user_id: UserId, catalog: &Catalog) -> SnapshotLoad {
        if let Some(cache) = &self.cache {
            match cache.rows_for_user(user_id).await {
                Ok(rows) => {
                    return SnapshotLoad {
                        snapshot: build_snapshot(catalog, rows),
                        source: SnapshotSource::Cache,
                    };
                }
                Err(err) => {
                    tracing::warn!(user = %user_id, error = %err, "local cache read failed");
                }
            }
        }

        SnapshotLoad {
            snapshot: build_snapshot(catalog, Vec::new()),
            source: SnapshotSource::Default,
        }
    }

    async fn refresh_cache(&self, user_id: UserId, rows: &[ProgressRow]) {
        let Some(cache) = &self.cache else {
            return;
        };
        for row in rows {
            if let Err(err) = cache.upsert_row(row).await {
                tracing::warn!(
                    user = %user_id,
                    lesson = %row.lesson_id,
                    error = %err,
                    "failed to refresh local cache entry"
                );
            }
        }
    }

    /// Persist the snapshot, one upsert per lesson entry.
    ///
    /// Idempotent: saving identical content twice yields identical durable
    /// state. Failures are collected per lesson and mirrored entries still
    /// land in the cache so a later degraded load sees the latest local
    /// truth.
    pub async fn save(
        &self,
        user_id: UserId,
        snapshot: &ProgressSnapshot,
        saved_at: DateTime<Utc>,
    ) -> SaveReport {
        let mut report = SaveReport::default();

        for (lesson_id, record) in snapshot.iter() {
            let row = ProgressRow::from_record(user_id, lesson_id.clone(), *record, saved_at);

            if let Some(cache) = &self.cache {
                if let Err(err) = cache.upsert_row(&row).await {
                    tracing::warn!(
                        user = %user_id,
                        lesson = %lesson_id,
                        error = %err,
                        "failed to mirror progress into local cache"
                    );
                }
            }

            match self.primary.upsert_row(&row).await {
                Ok(()) => report.saved.push(lesson_id.clone()),
                Err(err) => {
                    tracing::warn!(
                        user = %user_id,
                        lesson = %lesson_id,
                        error = %err,
                        "failed to save progress for lesson"
                    );
                    report.failed.push((lesson_id.clone(), err));
                }
            }
        }

        report
    }
}

/// Assemble a snapshot with one entry per catalog lesson, overlaying stored
/// rows. Rows for unknown lessons or with invalid state are skipped with a
/// warning; a missing row reads as the zero record.
fn build_snapshot(catalog: &Catalog, rows: Vec<ProgressRow>) -> ProgressSnapshot {
    let mut snapshot = ProgressSnapshot::new();
    for lesson_id in catalog.lesson_ids() {
        snapshot.insert(lesson_id.clone(), Default::default());
    }

    for row in rows {
        let lesson_id = row.lesson_id.clone();
        if catalog.position(&lesson_id).is_none() {
            tracing::warn!(lesson = %lesson_id, "skipping progress row for unknown lesson");
            continue;
        }
        match row.into_record() {
            Ok(record) => snapshot.insert(lesson_id, record),
            Err(err) => {
                tracing::warn!(
                    lesson = %lesson_id,
                    error = %err,
                    "skipping invalid progress row"
                );
            }
        }
    }

    snapshot
}
