use std::sync::Arc;

use lessons_core::Clock;
use lessons_core::catalog::Catalog;
use lessons_core::model::{LessonId, ProgressSnapshot, UserId};
use lessons_core::policy;
use lessons_core::scorer::QuizOutcome;

use super::service::LessonSession;
use crate::error::SessionError;
use crate::identity::IdentityProvider;
use crate::progress_service::{ProgressService, SaveReport, SnapshotLoad};

/// Outcome of closing out a quiz attempt.
///
/// `save` is present only for a passing attempt; a failed attempt leaves
/// the snapshot untouched and nothing is persisted.
#[derive(Debug)]
pub struct QuizCompletion {
    pub outcome: QuizOutcome,
    pub save: Option<SaveReport>,
}

/// Orchestrates lesson opening, quiz completion, and persisted progress.
///
/// All session transitions stay synchronous on the [`LessonSession`] itself;
/// this service owns the only suspending operation (the save) so the state
/// machine never blocks on I/O.
#[derive(Clone)]
pub struct LearningLoopService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: ProgressService,
}

impl LearningLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, progress: ProgressService) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load the user's snapshot, degrading to cache or defaults as needed.
    pub async fn load_progress(&self, user_id: UserId) -> SnapshotLoad {
        self.progress.load(user_id, &self.catalog).await
    }

    /// Load the snapshot for the currently signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` when no user is authenticated.
    pub async fn load_progress_for(
        &self,
        identity: &dyn IdentityProvider,
    ) -> Result<SnapshotLoad, SessionError> {
        let user_id = identity
            .current_user_id()
            .ok_or(SessionError::NotSignedIn)?;
        Ok(self.load_progress(user_id).await)
    }

    /// Lessons the user may currently enter, in catalog order.
    #[must_use]
    pub fn unlocked_lessons(&self, snapshot: &ProgressSnapshot) -> Vec<LessonId> {
        policy::unlocked_lessons(snapshot, self.catalog.lesson_ids())
    }

    /// Share of lessons completed, for the progress bar.
    #[must_use]
    pub fn completion_percent(&self, snapshot: &ProgressSnapshot) -> u8 {
        policy::completion_percent(snapshot, self.catalog.lesson_ids())
    }

    /// Open a lesson session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Locked` for a lesson whose prerequisite is
    /// incomplete, or a catalog error for an unknown lesson.
    pub fn open_lesson(
        &self,
        lesson_id: LessonId,
        snapshot: &ProgressSnapshot,
    ) -> Result<LessonSession, SessionError> {
        LessonSession::open(lesson_id, &self.catalog, snapshot)
    }

    /// Fold a revealed quiz result into the snapshot and persist it.
    ///
    /// On a pass the lesson's record is marked completed with the earned
    /// score and the whole snapshot is saved; the returned report carries
    /// any per-lesson persistence failures so the caller can retry or warn
    /// that progress may not be saved. On a fail the snapshot is left
    /// unmodified.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResultNotRevealed` if the session has no
    /// revealed result to record.
    pub async fn finish_quiz(
        &self,
        user_id: UserId,
        snapshot: &mut ProgressSnapshot,
        session: &LessonSession,
    ) -> Result<QuizCompletion, SessionError> {
        let outcome = session
            .last_outcome()
            .ok_or(SessionError::ResultNotRevealed)?;

        if !outcome.passed() {
            return Ok(QuizCompletion {
                outcome,
                save: None,
            });
        }

        let score = u32::try_from(outcome.score()).unwrap_or(u32::MAX);
        snapshot.mark_completed(session.lesson_id(), score);
        let report = self
            .progress
            .save(user_id, snapshot, self.clock.now())
            .await;

        Ok(QuizCompletion {
            outcome,
            save: Some(report),
        })
    }
}
