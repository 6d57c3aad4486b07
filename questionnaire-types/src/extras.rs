use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Content, QuestionnaireError, Result};

/// Property names with built-in meaning on answers and options.
pub const RESERVED_KEYS: &[&str] = &[
    "id",
    "data_id",
    "type",
    "content",
    "default_content",
    "label",
    "extra_answers",
    "options",
    "answer_utc_time",
];

/// Free-form properties attached to an answer or option.
///
/// Frontends use these for presentation hints (placeholders, units, scores).
/// They are carried through to exported rows. Reserved names are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extras {
    values: BTreeMap<String, Content>,
}

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Content>) -> Result<()> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(QuestionnaireError::ReservedKey(key));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Content> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Content)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
