use std::fmt;

use serde::Serialize;

/// Identifier of a node in a questionnaire tree, e.g. `"mood_a0_o2_a0"`.
///
/// Items carry caller-supplied ids. Answers and options below them get
/// positional ids derived from their parent: the n-th answer of `p` is
/// `p_a{n}`, the n-th option of `p` is `p_o{n}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId {
    id: String,
}

impl NodeId {
    /// Create an id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Create an empty id (an answer or option not yet attached to a parent).
    pub fn empty() -> Self {
        Self { id: String::new() }
    }

    /// Id of the answer at `index` below this node.
    pub fn answer(&self, index: usize) -> Self {
        self.child('a', index)
    }

    /// Id of the option at `index` below this node.
    pub fn option(&self, index: usize) -> Self {
        self.child('o', index)
    }

    fn child(&self, marker: char, index: usize) -> Self {
        if self.id.is_empty() {
            Self::new(format!("{marker}{index}"))
        } else {
            Self::new(format!("{}_{marker}{index}", self.id))
        }
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Check if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for NodeId {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_and_option_children() {
        let item = NodeId::new("test");
        assert_eq!(item.answer(1).as_str(), "test_a1");
        assert_eq!(item.option(1).as_str(), "test_o1");
        assert_eq!(item.option(1).answer(0).option(0).as_str(), "test_o1_a0_o0");
    }

    #[test]
    fn child_from_empty() {
        assert_eq!(NodeId::empty().answer(0).as_str(), "a0");
    }

    #[test]
    fn compares_with_str() {
        assert_eq!(NodeId::from("item_1"), "item_1");
        assert_eq!(format!("{}", NodeId::from("item_1")), "item_1");
    }
}
