use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::{Lesson, LessonDraft, LessonError, LessonId, QuizDraft, QuizError, QuizQuestion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown lesson: {0}")]
    UnknownLesson(LessonId),

    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(LessonId),

    #[error("quiz references unknown lesson: {0}")]
    OrphanQuiz(LessonId),

    #[error("lesson {0} has no quiz questions")]
    EmptyQuiz(LessonId),

    #[error(transparent)]
    Lesson(#[from] LessonError),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Immutable, ordered collection of lessons and their quizzes.
///
/// Lessons are ordered by the ordinal embedded in their id, ties broken by
/// the id itself. Construction validates the whole catalog up front; a
/// lesson without quiz questions is a content-authoring error because it
/// could never be completed honestly.
#[derive(Debug, Clone)]
pub struct Catalog {
    order: Vec<LessonId>,
    lessons: HashMap<LessonId, Lesson>,
    questions: HashMap<LessonId, Vec<QuizQuestion>>,
}

impl Catalog {
    /// Build a catalog from validated lessons and their quizzes.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateLesson` for repeated lesson ids,
    /// `CatalogError::OrphanQuiz` for quizzes whose lesson is unknown, and
    /// `CatalogError::EmptyQuiz` for lessons left without questions.
    pub fn new(
        lessons: Vec<Lesson>,
        quizzes: Vec<(LessonId, Vec<QuizQuestion>)>,
    ) -> Result<Self, CatalogError> {
        let mut lesson_map = HashMap::with_capacity(lessons.len());
        let mut order = Vec::with_capacity(lessons.len());

        for lesson in lessons {
            let id = lesson.id().clone();
            if lesson_map.insert(id.clone(), lesson).is_some() {
                return Err(CatalogError::DuplicateLesson(id));
            }
            order.push(id);
        }
        order.sort_by(|a, b| a.ordinal().cmp(&b.ordinal()).then_with(|| a.cmp(b)));

        let mut question_map: HashMap<LessonId, Vec<QuizQuestion>> = HashMap::new();
        for (lesson_id, questions) in quizzes {
            if !lesson_map.contains_key(&lesson_id) {
                return Err(CatalogError::OrphanQuiz(lesson_id));
            }
            question_map.entry(lesson_id).or_default().extend(questions);
        }

        for id in &order {
            if question_map.get(id).is_none_or(Vec::is_empty) {
                return Err(CatalogError::EmptyQuiz(id.clone()));
            }
        }

        Ok(Self {
            order,
            lessons: lesson_map,
            questions: question_map,
        })
    }

    /// Lesson ids in catalog order.
    #[must_use]
    pub fn lesson_ids(&self) -> &[LessonId] {
        &self.order
    }

    /// Fetch a lesson by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownLesson` if the id is absent.
    pub fn lesson(&self, id: &LessonId) -> Result<&Lesson, CatalogError> {
        self.lessons
            .get(id)
            .ok_or_else(|| CatalogError::UnknownLesson(id.clone()))
    }

    /// Fetch the quiz questions for a lesson, in authored order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownLesson` if the id is absent.
    pub fn questions(&self, id: &LessonId) -> Result<&[QuizQuestion], CatalogError> {
        self.questions
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::UnknownLesson(id.clone()))
    }

    /// Position of a lesson in catalog order.
    #[must_use]
    pub fn position(&self, id: &LessonId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

//
// ─── DRAFT INGESTION ───────────────────────────────────────────────────────────
//

/// One lesson's quiz as supplied by the content store.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizSetDraft {
    pub lesson_id: String,
    pub questions: Vec<QuizDraft>,
}

/// The full content-store payload: lessons plus their quizzes.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDraft {
    pub lessons: Vec<LessonDraft>,
    pub quizzes: Vec<QuizSetDraft>,
}

impl CatalogDraft {
    /// Validate every draft and assemble the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` encountered: lesson/question
    /// validation failures, duplicates, orphan quizzes, or empty quizzes.
    pub fn validate(self) -> Result<Catalog, CatalogError> {
        let lessons = self
            .lessons
            .into_iter()
            .map(LessonDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let mut quizzes = Vec::with_capacity(self.quizzes.len());
        for set in self.quizzes {
            let lesson_id = LessonId::new(set.lesson_id).map_err(LessonError::from)?;
            let questions = set
                .questions
                .into_iter()
                .map(QuizDraft::validate)
                .collect::<Result<Vec<_>, _>>()?;
            quizzes.push((lesson_id, questions));
        }

        Catalog::new(lessons, quizzes)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
