pub mod bank;
pub mod display;
pub mod gateway;
pub mod session;


use std::collections::HashSet;

pub use bank::{BankError, QuestionBank};
pub use gateway::{PromptState, SelectionGateway};
pub use session::{AnswerOutcome, QuizSession, SessionSnapshot, SubmitError};

/// A question attached to one clickable region of the body diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: String,
    pub prompt_text: String,
    pub context_text: String,
    pub options: Vec<String>,
    pub correct_option: String,
}
impl QuestionRecord {
    pub fn new(
        id: String,
        prompt_text: String,
        context_text: String,
        options: Vec<String>,
        correct_option: String,
    ) -> Result<Self, BankError> {
        if options.is_empty() {
            return Err(BankError::NoOptions { id });
        }

        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.as_str()) {
                return Err(BankError::DuplicateOption {
                    id,
                    option: option.clone(),
                });
            }
        }

        if !options.contains(&correct_option) {
            return Err(BankError::CorrectOptionMissing { id });
        }

        Ok(Self {
            id,
            prompt_text,
            context_text,
            options,
            correct_option,
        })
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Exact string match, no normalisation.
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option == option
    }
}
