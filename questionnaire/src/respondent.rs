//! Scripted respondent for running questionnaires without user interaction.
//!
//! `ScriptedRespondent` answers each item from a fixed set of responses and
//! moves forward until the questionnaire completes. This is useful for
//! testing definitions and for replaying recorded answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::{Answer, AnswerType, Item, Questionnaire, ScriptedRespondent};
//!
//! let mut q = Questionnaire::new(
//!     vec![
//!         Item::new("name", "Your name?")?
//!             .with_answer(Answer::new(AnswerType::Text).with_data_id("name")),
//!         Item::new("age", "Your age?")?.with_answer(Answer::new(AnswerType::Number)),
//!     ],
//!     |_| {},
//! )?;
//!
//! let path = ScriptedRespondent::new()
//!     .with_text("name", "Alice")
//!     .with_number("age_a0", 30.0)
//!     .run(&mut q)?;
//!
//! assert_eq!(path.len(), 2);
//! ```

use std::collections::HashMap;

use crate::{Advance, Answer, AnswerType, Content, NodeId, Questionnaire, QuestionnaireError};

/// Answers a questionnaire from pre-configured responses.
#[derive(Debug, Clone)]
pub struct ScriptedRespondent {
    responses: HashMap<String, Content>,
    max_steps: usize,
}

/// Error type for ScriptedRespondent.
#[derive(Debug, thiserror::Error)]
pub enum RespondentError {
    #[error("Missing response for answer: {0}")]
    MissingResponse(String),

    #[error("Validation blocked item '{item}': {}", messages.join("; "))]
    Blocked { item: String, messages: Vec<String> },

    #[error("Gave up after {0} steps without completing")]
    StepLimit(usize),

    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
}

impl ScriptedRespondent {
    /// Create a respondent with no responses and a limit of 1000 steps.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            max_steps: 1000,
        }
    }

    /// Add a response for an answer, keyed by its id or data id.
    pub fn with_response(mut self, answer: impl Into<String>, value: impl Into<Content>) -> Self {
        self.responses.insert(answer.into(), value.into());
        self
    }

    /// Add a text response.
    pub fn with_text(self, answer: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_response(answer, Content::Text(value.into()))
    }

    /// Add a numeric response.
    pub fn with_number(self, answer: impl Into<String>, value: f64) -> Self {
        self.with_response(answer, Content::Number(value))
    }

    /// Add a boolean response.
    pub fn with_bool(self, answer: impl Into<String>, value: bool) -> Self {
        self.with_response(answer, Content::Bool(value))
    }

    /// Add a chosen option (for Radio and Select answers).
    pub fn with_choice(self, answer: impl Into<String>, index: usize) -> Self {
        self.with_response(answer, Content::Choice(index))
    }

    /// Add ticked options (for Checkbox answers).
    pub fn with_choices(self, answer: impl Into<String>, indices: Vec<usize>) -> Self {
        self.with_response(answer, Content::Choices(indices))
    }

    /// Stop with `StepLimit` after this many items, guarding against routing loops.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Answer and advance until the questionnaire completes.
    ///
    /// Returns the ids of the items answered, in order. A top-level answer
    /// with no content and no scripted response is an error; nested answers
    /// are only filled in when scripted.
    pub fn run(&self, questionnaire: &mut Questionnaire) -> Result<Vec<NodeId>, RespondentError> {
        let mut path = Vec::new();

        while let Some(item) = questionnaire.current_item() {
            if path.len() >= self.max_steps {
                return Err(RespondentError::StepLimit(self.max_steps));
            }
            let item_id = item.id().clone();

            let mut scripted = Vec::new();
            collect_answer_responses(item.answers(), true, &self.responses, &mut scripted)?;
            for (answer_id, value) in scripted {
                questionnaire.respond_to(answer_id.as_str(), value)?;
            }

            path.push(item_id);
            if let Advance::Blocked { item, issues } = questionnaire.next_q()? {
                return Err(RespondentError::Blocked {
                    item: item.to_string(),
                    messages: issues.into_iter().map(|issue| issue.message).collect(),
                });
            }
        }

        Ok(path)
    }
}

impl Default for ScriptedRespondent {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_answer_responses(
    answers: &[Answer],
    top_level: bool,
    responses: &HashMap<String, Content>,
    scripted: &mut Vec<(NodeId, Content)>,
) -> Result<(), RespondentError> {
    for answer in answers {
        let value = responses
            .get(answer.id().as_str())
            .or_else(|| responses.get(answer.data_id()));

        match value {
            Some(value) => scripted.push((answer.id().clone(), value.clone())),
            None if top_level
                && answer.content().is_none()
                && answer.answer_type() != AnswerType::None =>
            {
                return Err(RespondentError::MissingResponse(answer.data_id().to_string()));
            }
            None => {}
        }

        collect_answer_responses(answer.extra_answers(), false, responses, scripted)?;
        for option in answer.options() {
            collect_answer_responses(option.extra_answers(), false, responses, scripted)?;
        }
    }

    Ok(())
}
