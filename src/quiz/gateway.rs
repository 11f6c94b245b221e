use std::sync::Arc;

use log::{debug, warn};

use crate::quiz::{AnswerOutcome, QuestionBank, QuestionRecord, QuizSession, SubmitError};

/// The question currently shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub target_id: String,
    pub question: QuestionRecord,
}

/// Turns raw "region clicked" events into prompts and answers.
///
/// Owns the session and the open prompt, so every answer it scores comes from
/// the question it opened itself.
#[derive(Debug, Clone)]
pub struct SelectionGateway {
    session: QuizSession,
    prompt: Option<PromptState>,
}

impl SelectionGateway {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            session: QuizSession::new(bank),
            prompt: None,
        }
    }

    /// Returns the opened prompt, or `None` when the interaction is inert.
    pub fn on_interaction(&mut self, target_id: &str) -> Option<&PromptState> {
        if self.session.is_over() {
            debug!("Challenge is over, ignoring interaction with: {}", target_id);
            return None;
        }

        let question = match self.session.bank().lookup(target_id) {
            Some(question) => question.clone(),
            None => {
                debug!("No question available for: {}", target_id);
                return None;
            }
        };

        if self.session.is_answered(target_id) {
            debug!("Question already answered for: {}", target_id);
            return None;
        }

        self.prompt = Some(PromptState {
            target_id: target_id.to_string(),
            question,
        });
        self.prompt.as_ref()
    }

    /// Scores `option` against the open prompt, then closes it.
    ///
    /// Callers only pass options taken from the open prompt. Anything else is
    /// a caller bug: it panics in debug builds, and in release nothing is
    /// scored and the prompt stays as it was.
    pub fn on_answer_chosen(&mut self, option: &str) -> Result<AnswerOutcome, SubmitError> {
        let prompt = match &self.prompt {
            Some(prompt) => prompt,
            None => {
                debug_assert!(false, "answer '{}' chosen with no open question", option);
                warn!("Answer '{}' chosen with no open question", option);
                return Err(SubmitError::NoOpenPrompt);
            }
        };

        if !prompt.question.has_option(option) {
            debug_assert!(
                false,
                "'{}' is not an option of the open question for '{}'",
                option, prompt.target_id
            );
            warn!(
                "'{}' is not an option of the open question for '{}'",
                option, prompt.target_id
            );
            return Err(SubmitError::InvalidOption {
                target_id: prompt.target_id.clone(),
                option: option.to_string(),
            });
        }

        let target_id = prompt.target_id.clone();
        self.prompt = None;

        self.session.submit_answer(&target_id, option)
    }

    pub fn on_dismiss(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            debug!("Question for '{}' dismissed", prompt.target_id);
        }
    }

    pub fn restart(&mut self) {
        self.prompt = None;
        self.session.restart();
    }

    pub fn prompt(&self) -> Option<&PromptState> {
        self.prompt.as_ref()
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SelectionGateway {
        let bank = QuestionBank::from_json_str(
            r#"{
                "Heart": {"question": "Q1", "context": "C1", "options": ["A", "B"], "correctAnswer": "A"},
                "Brain": {"question": "Q2", "context": "C2", "options": ["B", "C"], "correctAnswer": "B"},
                "Liver": {"question": "Q3", "context": "C3", "options": ["D", "E"], "correctAnswer": "D"}
            }"#,
        )
        .unwrap();
        SelectionGateway::new(Arc::new(bank))
    }

    #[test]
    fn opens_a_prompt_for_a_known_part() {
        let mut gateway = gateway();
        let prompt = gateway.on_interaction("Heart").unwrap();
        assert_eq!(prompt.target_id, "Heart");
        assert_eq!(prompt.question.prompt_text, "Q1");
        assert!(gateway.prompt().is_some());
    }

    #[test]
    fn unknown_part_is_inert() {
        let mut gateway = gateway();
        assert!(gateway.on_interaction("Spleen").is_none());
        assert!(gateway.prompt().is_none());
    }

    #[test]
    fn answering_closes_the_prompt() {
        let mut gateway = gateway();
        gateway.on_interaction("Heart");
        let outcome = gateway.on_answer_chosen("B").unwrap();
        assert!(!outcome.is_correct);
        assert!(gateway.prompt().is_none());
        assert_eq!(gateway.session().health(), 90);
    }

    #[test]
    fn answered_part_cannot_be_reopened() {
        let mut gateway = gateway();
        gateway.on_interaction("Heart");
        gateway.on_answer_chosen("B").unwrap();
        let before = gateway.session().snapshot();

        assert!(gateway.on_interaction("Heart").is_none());
        assert!(gateway.prompt().is_none());
        assert_eq!(gateway.session().snapshot(), before);
    }

    #[test]
    fn dismiss_leaves_the_part_open_for_later() {
        let mut gateway = gateway();
        gateway.on_interaction("Brain");
        gateway.on_dismiss();
        assert!(gateway.prompt().is_none());
        assert!(!gateway.session().is_answered("Brain"));
        assert_eq!(gateway.session().health(), 100);

        assert!(gateway.on_interaction("Brain").is_some());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no open question")]
    fn answer_without_prompt_panics_in_debug() {
        let mut gateway = gateway();
        let _ = gateway.on_answer_chosen("A");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is not an option of the open question")]
    fn foreign_option_panics_in_debug() {
        let mut gateway = gateway();
        gateway.on_interaction("Heart");
        let _ = gateway.on_answer_chosen("C");
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn answer_without_prompt_is_rejected() {
        let mut gateway = gateway();
        assert_eq!(
            gateway.on_answer_chosen("A"),
            Err(SubmitError::NoOpenPrompt)
        );
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn foreign_option_keeps_prompt_open() {
        let mut gateway = gateway();
        gateway.on_interaction("Heart");
        assert!(matches!(
            gateway.on_answer_chosen("C"),
            Err(SubmitError::InvalidOption { .. })
        ));
        assert_eq!(gateway.prompt().unwrap().target_id, "Heart");
        assert!(gateway.session().snapshot().answered_ids.is_empty());
    }

    #[test]
    fn interactions_are_inert_once_over() {
        let mut gateway = gateway();
        for (part, option) in [("Heart", "A"), ("Brain", "B"), ("Liver", "D")] {
            gateway.on_interaction(part);
            gateway.on_answer_chosen(option).unwrap();
        }
        assert!(gateway.session().is_over());
        assert!(gateway.on_interaction("Brain").is_none());

        gateway.restart();
        assert!(!gateway.session().is_over());
        assert!(gateway.on_interaction("Heart").is_some());
    }

    #[test]
    fn restart_closes_an_open_prompt() {
        let mut gateway = gateway();
        gateway.on_interaction("Liver");
        gateway.restart();
        assert!(gateway.prompt().is_none());
    }
}
