//! Shared error types for the services crate.

use thiserror::Error;

use lessons_core::catalog::CatalogError;
use lessons_core::model::LessonId;

/// Errors emitted by the lesson session state machine and learning loop.
///
/// `AnswerRequired` and `InvalidRetry` are guard conditions the presentation
/// layer should prevent by construction (disable the control); the machine
/// still rejects them defensively. `Locked` is surfaced so the caller can
/// render an access-denied affordance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("lesson {0} is locked; its prerequisite is incomplete")]
    Locked(LessonId),

    #[error("the current question has no answer selected")]
    AnswerRequired,

    #[error("retry is only valid after a failed result was revealed")]
    InvalidRetry,

    #[error("the quiz is not active")]
    QuizNotActive,

    #[error("option {index} is out of range for {options} options")]
    InvalidOption { index: usize, options: usize },

    #[error("the quiz result has not been revealed yet")]
    ResultNotRevealed,

    #[error("no signed-in user")]
    NotSignedIn,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
