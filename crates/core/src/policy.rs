//! Lesson unlock policy.
//!
//! A strict linear chain over the catalog order: the first lesson is always
//! open, every other lesson opens once its immediate predecessor is
//! completed. Unlock status is recomputed from the snapshot on every read
//! and never cached or persisted on its own.

use crate::model::{LessonId, ProgressSnapshot};

/// Returns true if the user may enter the given lesson.
///
/// Lessons not present in `order` are never unlocked.
#[must_use]
pub fn is_unlocked(lesson_id: &LessonId, snapshot: &ProgressSnapshot, order: &[LessonId]) -> bool {
    let Some(index) = order.iter().position(|id| id == lesson_id) else {
        return false;
    };
    if index == 0 {
        return true;
    }
    snapshot.get(&order[index - 1]).completed()
}

/// Ids of every lesson the user may currently enter, in catalog order.
#[must_use]
pub fn unlocked_lessons(snapshot: &ProgressSnapshot, order: &[LessonId]) -> Vec<LessonId> {
    order
        .iter()
        .filter(|id| is_unlocked(id, snapshot, order))
        .cloned()
        .collect()
}

/// Share of catalog lessons completed, rounded to whole percent.
#[must_use]
pub fn completion_percent(snapshot: &ProgressSnapshot, order: &[LessonId]) -> u8 {
    if order.is_empty() {
        return 0;
    }
    let completed = order
        .iter()
        .filter(|id| snapshot.get(id).completed())
        .count();
    let percent = (completed * 100 + order.len() / 2) / order.len();
    u8::try_from(percent).unwrap_or(100)
}
