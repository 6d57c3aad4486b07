use crate::NodeId;

/// Error type for questionnaire operations.
///
/// These are faults in a definition or illegal calls, not expected runtime
/// conditions. Validation failures are never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    /// A required field was missing or ambiguous when building a definition.
    #[error("Invalid definition: {0}")]
    Construction(String),

    /// A free-form property used a name reserved for a built-in field.
    #[error("Property '{0}' is reserved and cannot be used as an extra")]
    ReservedKey(String),

    /// A counter, item or answer lookup by name failed.
    #[error("No {kind} found named {name}")]
    NotFound { kind: &'static str, name: String },

    /// A counter was changed without a source and there is no current item.
    #[error("Cannot determine counter operation source")]
    NoSource,

    /// Routing produced an id that does not name any item.
    #[error("[{}] Cannot find item with id {id}", current.as_ref().map(NodeId::as_str).unwrap_or("-"))]
    UnknownItemId { id: String, current: Option<NodeId> },

    /// `Item::answer` was used on an item that does not have exactly one answer.
    #[error("Item {item} has {count} answers; the single-answer accessor needs exactly one")]
    InvalidAccess { item: NodeId, count: usize },

    /// Forward navigation was requested after the questionnaire completed.
    #[error("Cannot advance: no current item (history: [{}])", history.join(","))]
    NoCurrentItem { history: Vec<String> },
}

impl QuestionnaireError {
    /// Create a construction error from a message.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Create a not-found error for the given kind of thing.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Check if this error comes from a malformed definition.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_) | Self::ReservedKey(_))
    }
}

pub type Result<T, E = QuestionnaireError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_item_mentions_current() {
        let err = QuestionnaireError::UnknownItemId {
            id: "q9".into(),
            current: Some(NodeId::new("q1")),
        };
        assert_eq!(err.to_string(), "[q1] Cannot find item with id q9");
    }

    #[test]
    fn no_current_item_lists_history() {
        let err = QuestionnaireError::NoCurrentItem {
            history: vec!["q0".into(), "q1".into()],
        };
        assert_eq!(err.to_string(), "Cannot advance: no current item (history: [q0,q1])");
    }
}
