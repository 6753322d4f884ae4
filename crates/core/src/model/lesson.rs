use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::{IdError, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson display name cannot be empty")]
    EmptyDisplayName,

    #[error("section title cannot be empty")]
    EmptySectionTitle,

    #[error("section body cannot be empty")]
    EmptySectionBody,

    #[error(transparent)]
    Id(#[from] IdError),
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// One titled block of lesson content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    title: String,
    body: String,
}

impl Section {
    /// Creates a new section.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title or body is empty or whitespace-only.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, LessonError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptySectionTitle);
        }
        let body = body.into().trim().to_owned();
        if body.is_empty() {
            return Err(LessonError::EmptySectionBody);
        }
        Ok(Self { title, body })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// An ordered unit of instructional content.
///
/// A lesson walks the learner through three content sections (intro, rules,
/// examples) before its quiz. Lessons are immutable once built; the catalog
/// owns their ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    display_name: String,
    short_description: String,
    intro: Section,
    rules: Section,
    examples: Section,
}

impl Lesson {
    /// Creates a new lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyDisplayName` if the name is empty or
    /// whitespace-only.
    pub fn new(
        id: LessonId,
        display_name: impl Into<String>,
        short_description: impl Into<String>,
        intro: Section,
        rules: Section,
        examples: Section,
    ) -> Result<Self, LessonError> {
        let display_name = display_name.into().trim().to_owned();
        if display_name.is_empty() {
            return Err(LessonError::EmptyDisplayName);
        }

        Ok(Self {
            id,
            display_name,
            short_description: short_description.into().trim().to_owned(),
            intro,
            rules,
            examples,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    #[must_use]
    pub fn intro(&self) -> &Section {
        &self.intro
    }

    #[must_use]
    pub fn rules(&self) -> &Section {
        &self.rules
    }

    #[must_use]
    pub fn examples(&self) -> &Section {
        &self.examples
    }
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated section content as supplied by the content store.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionDraft {
    pub title: String,
    pub body: String,
}

impl SectionDraft {
    /// Validate the draft into a `Section`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title or body is empty.
    pub fn validate(self) -> Result<Section, LessonError> {
        Section::new(self.title, self.body)
    }
}

/// Unvalidated lesson definition as supplied by the content store.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonDraft {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub short_description: String,
    pub intro: SectionDraft,
    pub rules: SectionDraft,
    pub examples: SectionDraft,
}

impl LessonDraft {
    /// Validate the draft into a `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the id, name, or any section fails validation.
    pub fn validate(self) -> Result<Lesson, LessonError> {
        Lesson::new(
            LessonId::new(self.id)?,
            self.display_name,
            self.short_description,
            self.intro.validate()?,
            self.rules.validate()?,
            self.examples.validate()?,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
