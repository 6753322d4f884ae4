use std::fmt;

use lessons_core::catalog::Catalog;
use lessons_core::model::{LessonId, ProgressSnapshot, QuizQuestion};
use lessons_core::policy;
use lessons_core::scorer::{self, QuizOutcome};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

/// Screens a lesson session walks through, in order.
///
/// The three content screens allow moving back; the pre-quiz checkpoint is
/// forward-only, and once the quiz starts navigation happens per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonStep {
    Intro,
    Rules,
    Examples,
    PreQuiz,
    Quiz,
}

impl LessonStep {
    /// Step position as persisted in progress records (0..=4).
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            LessonStep::Intro => 0,
            LessonStep::Rules => 1,
            LessonStep::Examples => 2,
            LessonStep::PreQuiz => 3,
            LessonStep::Quiz => 4,
        }
    }
}

/// Direction for quiz question navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizNav {
    Next,
    Prev,
}

/// Result of a quiz navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvance {
    /// Moved between questions (or stayed put at a boundary).
    Moved,
    /// Advanced past the last question; the attempt was scored and the
    /// result is now revealed.
    Finished(QuizOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory traversal state of one open lesson for one user.
///
/// A session is created by [`LessonSession::open`] against an unlocked
/// lesson and owns a copy of that lesson's questions for the duration of
/// the sitting. Dropping the session is `close()`: all unsaved answers are
/// lost by design, since only a passing result is ever persisted.
pub struct LessonSession {
    lesson_id: LessonId,
    questions: Vec<QuizQuestion>,
    step: LessonStep,
    quiz_index: usize,
    answers: Vec<Option<usize>>,
    result_revealed: bool,
    last_outcome: Option<QuizOutcome>,
}

impl LessonSession {
    /// Open a lesson the user may enter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if the lesson is unknown, or
    /// `SessionError::Locked` if its prerequisite is not completed in the
    /// snapshot.
    pub fn open(
        lesson_id: LessonId,
        catalog: &Catalog,
        snapshot: &ProgressSnapshot,
    ) -> Result<Self, SessionError> {
        let questions = catalog.questions(&lesson_id)?.to_vec();
        if !policy::is_unlocked(&lesson_id, snapshot, catalog.lesson_ids()) {
            return Err(SessionError::Locked(lesson_id));
        }

        let answers = vec![None; questions.len()];
        Ok(Self {
            lesson_id,
            questions,
            step: LessonStep::Intro,
            quiz_index: 0,
            answers,
            result_revealed: false,
            last_outcome: None,
        })
    }

    // Accessors
    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn step(&self) -> LessonStep {
        self.step
    }

    #[must_use]
    pub fn quiz_index(&self) -> usize {
        self.quiz_index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions with an answer selected in this attempt.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// The selected option for the given question, if any.
    #[must_use]
    pub fn answer_at(&self, question_index: usize) -> Option<usize> {
        self.answers.get(question_index).copied().flatten()
    }

    /// The question under the cursor while the quiz is active.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.step == LessonStep::Quiz && !self.result_revealed {
            self.questions.get(self.quiz_index)
        } else {
            None
        }
    }

    #[must_use]
    pub fn result_revealed(&self) -> bool {
        self.result_revealed
    }

    /// Outcome of the last scored attempt, present once revealed.
    #[must_use]
    pub fn last_outcome(&self) -> Option<QuizOutcome> {
        self.last_outcome
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            step: self.step.index(),
            quiz_index: self.quiz_index,
            total_questions: self.total_questions(),
            answered: self.answered_count(),
            result_revealed: self.result_revealed,
        }
    }

    //
    // ─── STEP NAVIGATION ───────────────────────────────────────────────────
    //

    /// Advance to the next screen. Entering the quiz starts a fresh
    /// attempt; once in the quiz this is a no-op.
    pub fn next(&mut self) -> LessonStep {
        self.step = match self.step {
            LessonStep::Intro => LessonStep::Rules,
            LessonStep::Rules => LessonStep::Examples,
            LessonStep::Examples => LessonStep::PreQuiz,
            LessonStep::PreQuiz => {
                self.begin_attempt();
                LessonStep::Quiz
            }
            LessonStep::Quiz => LessonStep::Quiz,
        };
        self.step
    }

    /// Move back one content screen. A no-op at the intro, at the
    /// forward-only pre-quiz checkpoint, and inside the quiz.
    pub fn prev(&mut self) -> LessonStep {
        self.step = match self.step {
            LessonStep::Rules => LessonStep::Intro,
            LessonStep::Examples => LessonStep::Rules,
            step => step,
        };
        self.step
    }

    //
    // ─── QUIZ ──────────────────────────────────────────────────────────────
    //

    fn begin_attempt(&mut self) {
        self.quiz_index = 0;
        self.answers = vec![None; self.questions.len()];
        self.result_revealed = false;
        self.last_outcome = None;
    }

    fn require_quiz_active(&self) -> Result<(), SessionError> {
        if self.step != LessonStep::Quiz || self.result_revealed {
            return Err(SessionError::QuizNotActive);
        }
        Ok(())
    }

    /// Record (or overwrite) the answer for the question under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizNotActive` outside an active quiz, or
    /// `SessionError::InvalidOption` if the index does not point into the
    /// question's options.
    pub fn select_answer(&mut self, option_index: usize) -> Result<(), SessionError> {
        self.require_quiz_active()?;

        let options = self.questions[self.quiz_index].option_count();
        if option_index >= options {
            return Err(SessionError::InvalidOption {
                index: option_index,
                options,
            });
        }
        self.answers[self.quiz_index] = Some(option_index);
        Ok(())
    }

    /// Move the question cursor.
    ///
    /// Advancing requires an answer at the current position; advancing past
    /// the last question scores the attempt and reveals the result. Moving
    /// back stops at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizNotActive` outside an active quiz, or
    /// `SessionError::AnswerRequired` when advancing an unanswered question.
    pub fn navigate_quiz(&mut self, nav: QuizNav) -> Result<QuizAdvance, SessionError> {
        self.require_quiz_active()?;

        match nav {
            QuizNav::Prev => {
                if self.quiz_index > 0 {
                    self.quiz_index -= 1;
                }
                Ok(QuizAdvance::Moved)
            }
            QuizNav::Next => {
                if self.answers[self.quiz_index].is_none() {
                    return Err(SessionError::AnswerRequired);
                }
                if self.quiz_index + 1 < self.questions.len() {
                    self.quiz_index += 1;
                    Ok(QuizAdvance::Moved)
                } else {
                    let outcome = scorer::score(&self.answers, &self.questions);
                    self.result_revealed = true;
                    self.last_outcome = Some(outcome);
                    Ok(QuizAdvance::Finished(outcome))
                }
            }
        }
    }

    /// Start a new attempt after a failed result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidRetry` unless a failed result is
    /// currently revealed.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        let failed_reveal =
            self.result_revealed && self.last_outcome.is_some_and(|o| !o.passed());
        if !failed_reveal {
            return Err(SessionError::InvalidRetry);
        }
        self.begin_attempt();
        Ok(())
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson_id", &self.lesson_id)
            .field("step", &self.step)
            .field("quiz_index", &self.quiz_index)
            .field("answered", &self.answered_count())
            .field("result_revealed", &self.result_revealed)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
