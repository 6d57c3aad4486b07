//! Core types for the questionnaire crate.
//!
//! This crate provides the presentation-agnostic leaves of a questionnaire:
//! - `Content`, `AnswerType` and `ContentHistory` - what an answer holds and how it changed
//! - `Counter` and `CounterSet` - named values that items change and can take back
//! - `Issue` and `Severity` - validation results
//! - `NodeId`, `Extras` and `AnswerRow` - identity, free-form properties and export shape
//! - `Clock` - where timestamps come from

mod node_id;
pub use node_id::NodeId;

mod content;
pub use content::Content;

mod answer_type;
pub use answer_type::AnswerType;

mod history;
pub use history::{ChangeSource, ContentChange, ContentHistory};

mod counter;
pub use counter::{Counter, CounterSet, Operation, OwnedOperation};

mod issue;
pub use issue::{Issue, Severity, any_blocking};

mod extras;
pub use extras::{Extras, RESERVED_KEYS};

mod row;
pub use row::{AnswerRow, utc_string};

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod error;
pub use error::{QuestionnaireError, Result};
