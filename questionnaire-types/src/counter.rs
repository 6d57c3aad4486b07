use tracing::debug;

use crate::{NodeId, QuestionnaireError, Result};

/// A change made to a counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Replace the value.
    Set(f64),
    /// Add to the value.
    Increment(f64),
}

impl Operation {
    /// Apply this operation to a value.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Set(v) => *v,
            Self::Increment(delta) => value + delta,
        }
    }
}

/// An operation together with the item that performed it.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedOperation {
    pub owner: NodeId,
    pub operation: Operation,
}

/// A named value derived by replaying the operations performed on it.
///
/// Every operation remembers which item made it, so an item's contribution
/// can be removed and the value recomputed as if it had never acted.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    name: String,
    initial_content: f64,
    operations: Vec<OwnedOperation>,
}

impl Counter {
    /// Create a counter. Names must not be empty.
    pub fn new(name: impl Into<String>, initial_content: f64) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(QuestionnaireError::construction("A Counter must have a name"));
        }
        Ok(Self {
            name,
            initial_content,
            operations: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    pub fn initial_content(&self) -> f64 {
        self.initial_content
    }

    /// The recorded operations, oldest first.
    pub fn operations(&self) -> &[OwnedOperation] {
        &self.operations
    }

    /// Current value: the operations folded over the initial content in order.
    pub fn content(&self) -> f64 {
        self.operations
            .iter()
            .fold(self.initial_content, |value, op| op.operation.apply(value))
    }

    /// Record `source` setting the value.
    pub fn set_content(&mut self, value: f64, source: NodeId) {
        self.push(Operation::Set(value), source);
    }

    /// Record `source` adding `delta` to the value.
    pub fn increment_content(&mut self, delta: f64, source: NodeId) {
        self.push(Operation::Increment(delta), source);
    }

    fn push(&mut self, operation: Operation, owner: NodeId) {
        self.operations.push(OwnedOperation { owner, operation });
    }

    /// Remove every operation made by `source`. Returns how many were removed.
    pub fn revert(&mut self, source: &NodeId) -> usize {
        let before = self.operations.len();
        self.operations.retain(|op| &op.owner != source);
        before - self.operations.len()
    }
}

/// All counters of one questionnaire, unique by name.
///
/// Counters are created on first write. Writes without an explicit source are
/// attributed to `default_source`, which the questionnaire keeps pointed at its
/// current item.
#[derive(Debug, Clone, Default)]
pub struct CounterSet {
    counters: Vec<Counter>,
    default_source: Option<NodeId>,
}

impl CounterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The item that writes are attributed to when no source is given.
    pub fn default_source(&self) -> Option<&NodeId> {
        self.default_source.as_ref()
    }

    pub fn set_default_source(&mut self, source: Option<NodeId>) {
        self.default_source = source;
    }

    /// All counters in creation order.
    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// Look up a counter by name.
    pub fn counter(&self, name: &str) -> Option<&Counter> {
        self.counters.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counter(name).is_some()
    }

    /// Value of a counter.
    ///
    /// A missing counter yields `default` if one is given, and `NotFound` otherwise.
    pub fn get(&self, name: &str, default: Option<f64>) -> Result<f64> {
        match (self.counter(name), default) {
            (Some(counter), _) => Ok(counter.content()),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(QuestionnaireError::not_found("counter", name)),
        }
    }

    /// Record `source` (or the default source) setting counter `name` to `value`.
    pub fn set(&mut self, name: &str, value: f64, source: Option<&NodeId>) -> Result<()> {
        let source = self.resolve_source(source)?;
        self.counter_or_create(name)?.set_content(value, source);
        Ok(())
    }

    /// Record `source` (or the default source) adding `delta` to counter `name`.
    ///
    /// A counter that does not exist yet starts at zero, so the creating
    /// increment is an ordinary operation that a revert can remove.
    pub fn increment(&mut self, name: &str, delta: f64, source: Option<&NodeId>) -> Result<()> {
        let source = self.resolve_source(source)?;
        self.counter_or_create(name)?.increment_content(delta, source);
        Ok(())
    }

    /// Rename a counter. The new name must not be taken.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        if to.is_empty() {
            return Err(QuestionnaireError::construction("A Counter must have a name"));
        }
        if from != to && self.contains(&to) {
            return Err(QuestionnaireError::construction(format!(
                "A counter named {to} already exists"
            )));
        }
        let counter = self
            .counters
            .iter_mut()
            .find(|c| c.name == from)
            .ok_or_else(|| QuestionnaireError::not_found("counter", from))?;
        counter.rename(to);
        Ok(())
    }

    /// Remove every operation made by `source` from every counter.
    pub fn revert(&mut self, source: &NodeId) {
        let removed: usize = self.counters.iter_mut().map(|c| c.revert(source)).sum();
        if removed > 0 {
            debug!(%source, removed, "reverted counter operations");
        }
    }

    fn resolve_source(&self, source: Option<&NodeId>) -> Result<NodeId> {
        source
            .or(self.default_source.as_ref())
            .cloned()
            .ok_or(QuestionnaireError::NoSource)
    }

    fn counter_or_create(&mut self, name: &str) -> Result<&mut Counter> {
        let index = match self.counters.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                debug!(counter = name, "creating counter");
                self.counters.push(Counter::new(name, 0.0)?);
                self.counters.len() - 1
            }
        };
        Ok(&mut self.counters[index])
    }
}
