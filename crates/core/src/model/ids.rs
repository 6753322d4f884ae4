use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error type for constructing or parsing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("lesson id cannot be empty")]
    EmptyLessonId,

    #[error("failed to parse {kind} from string")]
    Parse { kind: &'static str },
}

/// Unique identifier for a Lesson.
///
/// Lesson ids are stable strings with an ordinal embedded in their trailing
/// digits (`lesson1`, `lesson2`, ...). The catalog sorts by that ordinal,
/// breaking ties by the full id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId` from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyLessonId` if the id is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into().trim().to_owned();
        if id.is_empty() {
            return Err(IdError::EmptyLessonId);
        }
        Ok(Self(id))
    }

    /// Returns the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ordinal embedded in the id's trailing decimal digits (`lesson3` -> 3).
    ///
    /// Ids without trailing digits sort first with ordinal 0.
    #[must_use]
    pub fn ordinal(&self) -> u32 {
        let digits: String = self
            .0
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        digits.parse().unwrap_or(0)
    }
}

/// Unique identifier for a user, as handed out by the identity provider.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a `UserId` from an existing UUID.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Creates a random `UserId`, useful in tests.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for LessonId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Uuid>()
            .map(UserId::new)
            .map_err(|_| IdError::Parse { kind: "UserId" })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_rejects_empty() {
        assert_eq!(LessonId::new("   "), Err(IdError::EmptyLessonId));
    }

    #[test]
    fn lesson_id_trims_and_displays() {
        let id = LessonId::new("  lesson1  ").unwrap();
        assert_eq!(id.as_str(), "lesson1");
        assert_eq!(id.to_string(), "lesson1");
    }

    #[test]
    fn lesson_id_extracts_ordinal() {
        assert_eq!(LessonId::new("lesson1").unwrap().ordinal(), 1);
        assert_eq!(LessonId::new("lesson12").unwrap().ordinal(), 12);
        assert_eq!(LessonId::new("intro").unwrap().ordinal(), 0);
    }

    #[test]
    fn lesson_id_from_str_roundtrip() {
        let id: LessonId = "lesson3".parse().unwrap();
        assert_eq!(id, LessonId::new("lesson3").unwrap());
    }

    #[test]
    fn user_id_from_str() {
        let raw = "6f2e9bc4-7a51-4f3e-9d25-08a13a1f0f77";
        let id: UserId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn user_id_from_str_invalid() {
        let result = "not-a-uuid".parse::<UserId>();
        assert_eq!(result, Err(IdError::Parse { kind: "UserId" }));
    }
}
