use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::LessonId;

/// Highest step index a lesson session can reach (the quiz screen).
pub const MAX_STEP: u8 = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("current step {step} is out of range 0..=4")]
    StepOutOfRange { step: u8 },

    #[error("record marked completed without quiz completion")]
    CompletedWithoutQuiz,
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Per-(user, lesson) completion state.
///
/// The zero record (`Default`) stands in for lessons the user has never
/// touched; stores never need to distinguish "missing" from "untouched".
/// `quiz_score` is informational only and is never consulted by the unlock
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressRecord {
    completed: bool,
    current_step: u8,
    quiz_completed: bool,
    quiz_score: u32,
}

impl ProgressRecord {
    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::StepOutOfRange` if the step exceeds `MAX_STEP`,
    /// or `ProgressError::CompletedWithoutQuiz` if the completed flag is set
    /// without the quiz flag.
    pub fn from_persisted(
        completed: bool,
        current_step: u8,
        quiz_completed: bool,
        quiz_score: u32,
    ) -> Result<Self, ProgressError> {
        if current_step > MAX_STEP {
            return Err(ProgressError::StepOutOfRange { step: current_step });
        }
        if completed && !quiz_completed {
            return Err(ProgressError::CompletedWithoutQuiz);
        }

        Ok(Self {
            completed,
            current_step,
            quiz_completed,
            quiz_score,
        })
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    #[must_use]
    pub fn quiz_completed(&self) -> bool {
        self.quiz_completed
    }

    #[must_use]
    pub fn quiz_score(&self) -> u32 {
        self.quiz_score
    }

    /// Record the last content step the user reached.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::StepOutOfRange` if the step exceeds `MAX_STEP`.
    pub fn set_current_step(&mut self, step: u8) -> Result<(), ProgressError> {
        if step > MAX_STEP {
            return Err(ProgressError::StepOutOfRange { step });
        }
        self.current_step = step;
        Ok(())
    }

    /// Mark the lesson passed. Pins the step to the quiz screen.
    pub fn mark_completed(&mut self, quiz_score: u32) {
        self.completed = true;
        self.quiz_completed = true;
        self.current_step = MAX_STEP;
        self.quiz_score = quiz_score;
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// The complete per-user completion state across all lessons.
///
/// Lookups are total: lessons without a stored record read as the zero
/// record. Mutation happens only through the explicit methods below, and
/// only the store adapter writes snapshots to durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    records: BTreeMap<LessonId, ProgressRecord>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for a lesson, defaulting to the zero record.
    #[must_use]
    pub fn get(&self, lesson_id: &LessonId) -> ProgressRecord {
        self.records.get(lesson_id).copied().unwrap_or_default()
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, lesson_id: LessonId, record: ProgressRecord) {
        self.records.insert(lesson_id, record);
    }

    /// Record the step the user reached in a lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::StepOutOfRange` if the step exceeds `MAX_STEP`.
    pub fn set_current_step(
        &mut self,
        lesson_id: &LessonId,
        step: u8,
    ) -> Result<(), ProgressError> {
        let mut record = self.get(lesson_id);
        record.set_current_step(step)?;
        self.records.insert(lesson_id.clone(), record);
        Ok(())
    }

    /// Mark a lesson passed with the earned quiz score.
    pub fn mark_completed(&mut self, lesson_id: &LessonId, quiz_score: u32) {
        let mut record = self.get(lesson_id);
        record.mark_completed(quiz_score);
        self.records.insert(lesson_id.clone(), record);
    }

    /// Number of lessons recorded as completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.records.values().filter(|r| r.completed).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LessonId, &ProgressRecord)> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(n: u32) -> LessonId {
        LessonId::new(format!("lesson{n}")).unwrap()
    }

    #[test]
    fn zero_record_is_default() {
        let record = ProgressRecord::default();
        assert!(!record.completed());
        assert_eq!(record.current_step(), 0);
        assert!(!record.quiz_completed());
        assert_eq!(record.quiz_score(), 0);
    }

    #[test]
    fn from_persisted_rejects_bad_step() {
        let err = ProgressRecord::from_persisted(false, 5, false, 0).unwrap_err();
        assert_eq!(err, ProgressError::StepOutOfRange { step: 5 });
    }

    #[test]
    fn from_persisted_rejects_completed_without_quiz() {
        let err = ProgressRecord::from_persisted(true, 4, false, 0).unwrap_err();
        assert_eq!(err, ProgressError::CompletedWithoutQuiz);
    }

    #[test]
    fn mark_completed_upholds_invariant() {
        let mut record = ProgressRecord::default();
        record.mark_completed(3);
        assert!(record.completed());
        assert!(record.quiz_completed());
        assert_eq!(record.current_step(), MAX_STEP);
        assert_eq!(record.quiz_score(), 3);
    }

    #[test]
    fn snapshot_get_is_total() {
        let snapshot = ProgressSnapshot::new();
        let record = snapshot.get(&lesson(1));
        assert_eq!(record, ProgressRecord::default());
    }

    #[test]
    fn snapshot_mark_completed_counts() {
        let mut snapshot = ProgressSnapshot::new();
        snapshot.mark_completed(&lesson(1), 3);
        snapshot.set_current_step(&lesson(2), 2).unwrap();

        assert_eq!(snapshot.completed_count(), 1);
        assert!(snapshot.get(&lesson(1)).completed());
        assert_eq!(snapshot.get(&lesson(2)).current_step(), 2);
        assert!(!snapshot.get(&lesson(2)).completed());
    }

    #[test]
    fn snapshot_step_update_rejects_out_of_range() {
        let mut snapshot = ProgressSnapshot::new();
        let err = snapshot.set_current_step(&lesson(1), 7).unwrap_err();
        assert_eq!(err, ProgressError::StepOutOfRange { step: 7 });
        assert!(snapshot.is_empty());
    }
}
