//! # questionnaire
//!
//! Drive a respondent through a list of questions, one item at a time.
//!
//! A [`Questionnaire`] owns its [`Item`]s, a [`CounterSet`] and the history of
//! visited items. Each item owns its [`Answer`]s, and each answer keeps the full
//! history of its content. Moving forward runs the item's answer-processing
//! hook (which usually updates counters), validates, and asks the item where
//! to go next. Moving back reverts exactly what the item returned to had
//! contributed to the counters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use questionnaire::{Answer, AnswerType, Item, Questionnaire, Required};
//!
//! let mut q = Questionnaire::new(
//!     vec![
//!         Item::new("welcome", "Welcome!")?,
//!         Item::new("name", "What is your name?")?
//!             .with_answer(Answer::new(AnswerType::Text).with_rule(Required))
//!             .ending(),
//!     ],
//!     |q| println!("done: {:?}", q.item("name").map(|i| i.as_rows())),
//! )?;
//!
//! q.next_q()?;
//! q.respond("Alice")?;
//! assert!(q.next_q()?.is_completed());
//! ```
//!
//! ## Routing
//!
//! - default: the next item in the list, or the end after the last one
//! - `with_next_item("id")`: always go to that item
//! - `ending()`: end after this item
//! - `with_next_item_fn(f)`: ask `f`; takes precedence over the others
//!
//! ## Logging
//!
//! Navigation is traced with `tracing` at debug level; blocked advances and
//! back steps with no history are logged as warnings. Both are also reported
//! through [`Advance`] and [`Retreat`].

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod answer;
pub use answer::Answer;

mod option;
pub use option::AnswerOption;

mod item;
pub use item::{Item, NextItemFn, ProcessAnswerFn, Routing};

mod questionnaire;
pub use questionnaire::{Advance, CompletionFn, Questionnaire, Retreat};

pub mod validation;
pub use validation::{
    AllAnswered, AnswerCheck, AnswerRule, AnyAnswered, GreaterThan, ItemCheck, ItemRule,
    LessThan, MaxLength, NotBlank, OfType, Required, WithSeverity,
};

// Scripted respondent for running questionnaires without user interaction
mod respondent;
pub use respondent::{RespondentError, ScriptedRespondent};
