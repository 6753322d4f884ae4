mod ids;
mod lesson;
mod progress;
mod quiz;

pub use ids::{IdError, LessonId, UserId};
pub use lesson::{Lesson, LessonDraft, LessonError, Section, SectionDraft};
pub use progress::{MAX_STEP, ProgressError, ProgressRecord, ProgressSnapshot};
pub use quiz::{QuizDraft, QuizError, QuizQuestion};
