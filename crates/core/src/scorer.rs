//! Quiz scoring.
//!
//! Pure and total: any answer sequence scores against any question list.
//! Positions without an answer never match. The passing threshold is 70%
//! of the question count, rounded up.

use crate::model::QuizQuestion;

/// Outcome of scoring one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    score: usize,
    total: usize,
    threshold: usize,
    passed: bool,
}

impl QuizOutcome {
    /// Count of correctly answered questions.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Total number of questions in the attempt.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Minimum score required to pass.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Minimum correct answers required to pass a quiz of the given size.
///
/// `ceil(question_count * 0.7)`, computed in integer arithmetic.
#[must_use]
pub fn passing_threshold(question_count: usize) -> usize {
    question_count.saturating_mul(7).div_ceil(10)
}

/// Score an answer sequence against the question list.
///
/// `answers[i]` holds the selected option for question `i`, or `None` when
/// unanswered; sequences shorter than the question list are treated as
/// unanswered at the tail, and surplus entries are ignored.
#[must_use]
pub fn score(answers: &[Option<usize>], questions: &[QuizQuestion]) -> QuizOutcome {
    let score = questions
        .iter()
        .enumerate()
        .filter(|(i, question)| match answers.get(*i).copied().flatten() {
            Some(selected) => question.is_correct(selected),
            None => false,
        })
        .count();

    let total = questions.len();
    let threshold = passing_threshold(total);
    QuizOutcome {
        score,
        total,
        threshold,
        passed: score >= threshold,
    }
}
