use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Content;

/// Why an answer's content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeSource {
    /// Restored to the default, e.g. when navigating back.
    Reset,
    /// Supplied by the respondent.
    User,
}

/// One entry in an answer's content history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentChange {
    pub timestamp: DateTime<Utc>,
    /// `None` when the restored default was itself empty.
    pub content: Option<Content>,
    pub source: ChangeSource,
}

/// Append-only log of an answer's content.
///
/// Entries are never removed: a reset is recorded as a new entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentHistory {
    entries: Vec<ContentChange>,
}

impl ContentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change.
    pub fn push(
        &mut self,
        content: Option<Content>,
        source: ChangeSource,
        timestamp: DateTime<Utc>,
    ) {
        self.entries.push(ContentChange {
            timestamp,
            content,
            source,
        });
    }

    /// The most recent change, if any.
    pub fn last(&self) -> Option<&ContentChange> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentChange> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ContentHistory {
    type Item = &'a ContentChange;
    type IntoIter = std::slice::Iter<'a, ContentChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
