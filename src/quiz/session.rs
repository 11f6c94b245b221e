use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};

use crate::quiz::QuestionBank;

pub const MAX_HEALTH: u32 = 100;
pub const HEALTH_PENALTY: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("The session is over")]
    SessionOver,
    #[error("'{0}' has already been answered")]
    AlreadyAnswered(String),
    #[error("There is no question for '{0}'")]
    UnknownTarget(String),
    #[error("'{option}' is not an option of the question for '{target_id}'")]
    InvalidOption { target_id: String, option: String },
    #[error("No question is currently open")]
    NoOpenPrompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub session_now_over: bool,
}

/// Read-only copy of the session handed to the shell for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub health: u32,
    pub answered_ids: HashSet<String>,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub is_over: bool,
    pub total_questions: usize,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    health: u32,
    answered_ids: HashSet<String>,
    correct_count: usize,
    incorrect_count: usize,
    is_over: bool,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            health: MAX_HEALTH,
            answered_ids: HashSet::new(),
            correct_count: 0,
            incorrect_count: 0,
            is_over: false,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Scores one answer and re-evaluates the end condition.
    ///
    /// Preconditions (session running, target known and not yet answered,
    /// option belongs to the target's question) are checked before anything
    /// changes: a rejected call leaves the session untouched.
    pub fn submit_answer(
        &mut self,
        target_id: &str,
        chosen_option: &str,
    ) -> Result<AnswerOutcome, SubmitError> {
        if self.is_over {
            return Err(SubmitError::SessionOver);
        }
        if self.is_answered(target_id) {
            return Err(SubmitError::AlreadyAnswered(target_id.to_string()));
        }
        let record = self
            .bank
            .lookup(target_id)
            .ok_or_else(|| SubmitError::UnknownTarget(target_id.to_string()))?;
        if !record.has_option(chosen_option) {
            return Err(SubmitError::InvalidOption {
                target_id: target_id.to_string(),
                option: chosen_option.to_string(),
            });
        }

        let is_correct = record.is_correct(chosen_option);

        self.answered_ids.insert(target_id.to_string());
        if is_correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
            self.health = self.health.saturating_sub(HEALTH_PENALTY);
        }

        // Uses the count after this answer was recorded
        self.is_over = self.health == 0 || self.answered_ids.len() == self.bank.len();

        info!(
            "Answered '{}' ({}): health {}, {}/{} answered",
            target_id,
            if is_correct { "correct" } else { "incorrect" },
            self.health,
            self.answered_ids.len(),
            self.bank.len()
        );
        if self.is_over {
            info!(
                "Session over: {} correct, {} incorrect",
                self.correct_count, self.incorrect_count
            );
        }

        Ok(AnswerOutcome {
            is_correct,
            session_now_over: self.is_over,
        })
    }

    pub fn restart(&mut self) {
        debug!("Restarting session");
        self.health = MAX_HEALTH;
        self.answered_ids.clear();
        self.correct_count = 0;
        self.incorrect_count = 0;
        self.is_over = false;
    }

    pub fn is_answered(&self, target_id: &str) -> bool {
        self.answered_ids.contains(target_id)
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            health: self.health,
            answered_ids: self.answered_ids.clone(),
            correct_count: self.correct_count,
            incorrect_count: self.incorrect_count,
            is_over: self.is_over,
            total_questions: self.bank.len(),
        }
    }
}
