use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("option text cannot be empty")]
    EmptyOption,

    #[error("correct option index {index} is out of range for {options} options")]
    CorrectOutOfRange { index: usize, options: usize },
}

/// A single multiple-choice question, owned by exactly one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    prompt_text: String,
    options: Vec<String>,
    correct_option_index: usize,
}

impl QuizQuestion {
    /// Creates a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the prompt is empty, no options are given, any
    /// option is empty, or the correct index does not point into the options.
    pub fn new(
        prompt_text: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
    ) -> Result<Self, QuizError> {
        let prompt_text = prompt_text.into().trim().to_owned();
        if prompt_text.is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }
        let options: Vec<String> = options
            .into_iter()
            .map(|o| o.trim().to_owned())
            .collect();
        if options.iter().any(String::is_empty) {
            return Err(QuizError::EmptyOption);
        }
        if correct_option_index >= options.len() {
            return Err(QuizError::CorrectOutOfRange {
                index: correct_option_index,
                options: options.len(),
            });
        }

        Ok(Self {
            prompt_text,
            options,
            correct_option_index,
        })
    }

    // Accessors
    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    /// Returns true if the given option index is the answer key.
    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option_index
    }
}

/// Unvalidated question definition as supplied by the content store.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizDraft {
    pub prompt_text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

impl QuizDraft {
    /// Validate the draft into a `QuizQuestion`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` on any constraint violation.
    pub fn validate(self) -> Result<QuizQuestion, QuizError> {
        QuizQuestion::new(self.prompt_text, self.options, self.correct_option_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn question_happy_path() {
        let q = QuizQuestion::new("What is the right move?", options(3), 1).unwrap();
        assert_eq!(q.option_count(), 3);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn question_rejects_empty_prompt() {
        let err = QuizQuestion::new("  ", options(2), 0).unwrap_err();
        assert_eq!(err, QuizError::EmptyPrompt);
    }

    #[test]
    fn question_rejects_no_options() {
        let err = QuizQuestion::new("Prompt", Vec::new(), 0).unwrap_err();
        assert_eq!(err, QuizError::NoOptions);
    }

    #[test]
    fn question_rejects_out_of_range_key() {
        let err = QuizQuestion::new("Prompt", options(2), 2).unwrap_err();
        assert_eq!(
            err,
            QuizError::CorrectOutOfRange {
                index: 2,
                options: 2
            }
        );
    }

    #[test]
    fn question_rejects_blank_option() {
        let err =
            QuizQuestion::new("Prompt", vec!["a".into(), "   ".into()], 0).unwrap_err();
        assert_eq!(err, QuizError::EmptyOption);
    }
}
