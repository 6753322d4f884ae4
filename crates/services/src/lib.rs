#![forbid(unsafe_code)]

pub mod error;
pub mod identity;
pub mod progress_service;
pub mod sessions;

pub use lessons_core::Clock;

pub use error::SessionError;
pub use identity::{IdentityProvider, StaticIdentity};
pub use progress_service::{ProgressService, SaveReport, SnapshotLoad, SnapshotSource};

pub use sessions::{
    LearningLoopService, LessonSession, LessonStep, QuizAdvance, QuizCompletion, QuizNav,
    SessionProgress,
};
