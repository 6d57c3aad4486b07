use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::NodeId;

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Shown to the respondent, but does not stop them moving on.
    Warning,
    /// Stops the questionnaire from advancing.
    Error,
}

impl Severity {
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A validation failure found on an answer or item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// The answer or item the failing rule belongs to.
    pub owner: NodeId,
    /// Human-readable description.
    pub message: String,
    pub severity: Severity,
    /// When the rule was evaluated.
    pub timestamp: DateTime<Utc>,
}

impl Issue {
    pub fn new(
        owner: NodeId,
        message: impl Into<String>,
        severity: Severity,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            owner,
            message: message.into(),
            severity,
            timestamp,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// Whether any of `issues` stops advancement.
pub fn any_blocking<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> bool {
    issues.into_iter().any(Issue::is_blocking)
}
