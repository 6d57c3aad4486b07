use std::collections::HashSet;
use std::fmt;
use std::mem;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    Clock, Content, CounterSet, Issue, Item, NodeId, QuestionnaireError, Result, SystemClock,
    any_blocking,
};

/// Callback run each time the questionnaire runs off the end of its items.
pub type CompletionFn = Box<dyn FnMut(&Questionnaire)>;

/// Result of a forward step.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to another item.
    Moved { from: NodeId, to: NodeId },
    /// The questionnaire is complete and the completion callback has run.
    Completed { from: NodeId },
    /// Validation failed; the current item is unchanged.
    Blocked { item: NodeId, issues: Vec<Issue> },
}

impl Advance {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Result of a backward step.
#[derive(Debug, Clone, PartialEq)]
pub enum Retreat {
    /// Went back to `to`. `from` is `None` when stepping back from completion.
    Moved { from: Option<NodeId>, to: NodeId },
    /// There was nothing to go back to.
    NoHistory,
}

/// A run through a list of items.
///
/// Starts at the first item. [`Questionnaire::next_q`] processes the current
/// item's answers, validates and moves on; [`Questionnaire::last_q`] steps
/// back and takes back the counter changes of the item returned to.
pub struct Questionnaire {
    name: Option<String>,
    introduction: Option<String>,
    citation: Option<String>,
    version: Option<String>,
    items: Vec<Item>,
    counters: CounterSet,
    current: Option<usize>,
    history: Vec<usize>,
    reset_items_on_back: bool,
    on_complete: Option<CompletionFn>,
    clock: Box<dyn Clock>,
}

impl Questionnaire {
    /// Create a questionnaire positioned on its first item.
    ///
    /// Fails if there are no items or two items share an id.
    pub fn new(
        items: Vec<Item>,
        on_complete: impl FnMut(&Questionnaire) + 'static,
    ) -> Result<Self> {
        let Some(first) = items.first() else {
            return Err(QuestionnaireError::construction(
                "Questionnaire requires at least one item",
            ));
        };
        let mut seen = HashSet::new();
        if let Some(dup) = items.iter().find(|item| !seen.insert(item.id().as_str())) {
            return Err(QuestionnaireError::construction(format!(
                "Duplicate item id {}",
                dup.id()
            )));
        }

        let mut counters = CounterSet::new();
        counters.set_default_source(Some(first.id().clone()));
        Ok(Self {
            name: None,
            introduction: None,
            citation: None,
            version: None,
            items,
            counters,
            current: Some(0),
            history: Vec::new(),
            reset_items_on_back: false,
            on_complete: Some(Box::new(on_complete)),
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the message shown before the first item.
    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = Some(introduction.into());
        self
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Reset the current item's answers whenever the respondent steps back.
    pub fn with_reset_items_on_back(mut self, reset: bool) -> Self {
        self.reset_items_on_back = reset;
        self
    }

    /// Use `clock` for answer and issue timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn introduction(&self) -> Option<&str> {
        self.introduction.as_deref()
    }

    pub fn citation(&self) -> Option<&str> {
        self.citation.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn reset_items_on_back(&self) -> bool {
        self.reset_items_on_back
    }

    /// Current time according to the questionnaire's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // === Items ===

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Index of the item with this id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Result<&Item> {
        match self.position(id) {
            Some(index) => Ok(&self.items[index]),
            None => Err(self.unknown_item(id)),
        }
    }

    /// Mutable counterpart of [`Questionnaire::item`].
    pub fn item_mut(&mut self, id: &str) -> Result<&mut Item> {
        match self.position(id) {
            Some(index) => Ok(&mut self.items[index]),
            None => Err(self.unknown_item(id)),
        }
    }

    fn unknown_item(&self, id: &str) -> QuestionnaireError {
        QuestionnaireError::UnknownItemId {
            id: id.to_string(),
            current: self.current_item().map(|item| item.id().clone()),
        }
    }

    /// The item being asked, or `None` once complete.
    pub fn current_item(&self) -> Option<&Item> {
        self.current.map(|index| &self.items[index])
    }

    pub fn current_item_mut(&mut self) -> Option<&mut Item> {
        self.current.map(|index| &mut self.items[index])
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    /// Previously current items, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Item> {
        self.history.iter().map(|index| &self.items[*index])
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn counters(&self) -> &CounterSet {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut CounterSet {
        &mut self.counters
    }

    fn set_current(&mut self, index: Option<usize>) {
        self.current = index;
        self.counters
            .set_default_source(index.map(|i| self.items[i].id().clone()));
    }

    fn history_ids(&self) -> Vec<String> {
        self.history().map(|item| item.id().to_string()).collect()
    }

    // === Answering ===

    /// Record content for the current item's only answer.
    pub fn respond(&mut self, content: impl Into<Content>) -> Result<()> {
        let now = self.now();
        let history = self.history_ids();
        self.current_item_mut()
            .ok_or(QuestionnaireError::NoCurrentItem { history })?
            .answer_mut()?
            .set_content_at(content, now);
        Ok(())
    }

    /// Record content for one answer (by id or data id) of the current item.
    pub fn respond_to(&mut self, answer_id: &str, content: impl Into<Content>) -> Result<()> {
        let now = self.now();
        let history = self.history_ids();
        self.current_item_mut()
            .ok_or(QuestionnaireError::NoCurrentItem { history })?
            .find_answer_mut(answer_id)?
            .set_content_at(content, now);
        Ok(())
    }

    /// Reset every answer of an item, visited or not, to its default.
    pub fn reset_answers(&mut self, item_id: &str) -> Result<()> {
        let now = self.now();
        self.item_mut(item_id)?.reset_answers_at(now);
        Ok(())
    }

    // === Navigation ===

    /// Move forward from the current item.
    ///
    /// Runs the item's answer-processing hook, pushes it onto the history and
    /// validates it. Blocking issues stop here, leaving the hook's counter
    /// changes and the history entry in place. Otherwise the item's routing
    /// picks the next item, or completes the questionnaire.
    pub fn next_q(&mut self) -> Result<Advance> {
        let Some(index) = self.current else {
            return Err(QuestionnaireError::NoCurrentItem {
                history: self.history_ids(),
            });
        };

        let mut counters = mem::take(&mut self.counters);
        let processed = self.items[index].process_answer(self, &mut counters);
        self.counters = counters;
        processed?;
        self.history.push(index);

        let issues = self.check_item_at(index, true);
        let from = self.items[index].id().clone();
        if any_blocking(&issues) {
            warn!(item = %from, issues = issues.len(), "validation blocked advance");
            return Ok(Advance::Blocked { item: from, issues });
        }

        let next = self.items[index]
            .next_item(self)?
            .map(|item| item.id().clone());
        match next {
            None => {
                debug!(item = %from, "questionnaire complete");
                self.set_current(None);
                self.complete();
                Ok(Advance::Completed { from })
            }
            Some(to) => {
                debug!(from = %from, to = %to, "advanced");
                self.set_current(self.position(to.as_str()));
                Ok(Advance::Moved { from, to })
            }
        }
    }

    /// Step back to the most recent item in the history.
    ///
    /// Counter changes made by that item are reverted. Only one step is
    /// undone per call.
    pub fn last_q(&mut self) -> Retreat {
        if self.reset_items_on_back
            && let Some(index) = self.current
        {
            let now = self.now();
            self.items[index].reset_answers_at(now);
        }

        let Some(previous) = self.history.pop() else {
            warn!("no history to go back to");
            return Retreat::NoHistory;
        };
        self.counters.revert(self.items[previous].id());

        let from = self.current_item().map(|item| item.id().clone());
        let to = self.items[previous].id().clone();
        debug!(from = ?from, to = %to, "went back");
        self.set_current(Some(previous));
        Retreat::Moved { from, to }
    }

    fn complete(&mut self) {
        if let Some(mut on_complete) = self.on_complete.take() {
            on_complete(self);
            self.on_complete = Some(on_complete);
        }
    }

    // === Validation ===

    fn check_item_at(&mut self, index: usize, include_children: bool) -> Vec<Issue> {
        let issues = self.items[index].find_issues(self, include_children);
        self.items[index].record_issues(&issues, include_children);
        issues
    }

    /// Re-validate one item and store the results.
    pub fn check_item(&mut self, id: &str, include_children: bool) -> Result<Vec<Issue>> {
        let index = self.position(id).ok_or_else(|| self.unknown_item(id))?;
        Ok(self.check_item_at(index, include_children))
    }

    /// Re-validate one answer of an item and store the results.
    pub fn check_answer(
        &mut self,
        item_id: &str,
        answer_id: &str,
        include_children: bool,
    ) -> Result<Vec<Issue>> {
        let index = self.position(item_id).ok_or_else(|| self.unknown_item(item_id))?;
        let item = &self.items[index];
        let issues = item
            .find_answer(answer_id)?
            .find_issues(item, self, include_children);
        self.items[index]
            .find_answer_mut(answer_id)?
            .record_issues(&issues, include_children);
        Ok(issues)
    }

    /// Re-validate every item, visited or not, and return all issues.
    pub fn check_validation(&mut self) -> Vec<Issue> {
        (0..self.items.len())
            .flat_map(|index| self.check_item_at(index, true))
            .collect()
    }

    /// All issues currently recorded anywhere in the questionnaire.
    pub fn validation_issues(&self) -> Vec<Issue> {
        self.items.iter().flat_map(Item::all_issues).collect()
    }
}

impl fmt::Debug for Questionnaire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Questionnaire")
            .field("name", &self.name)
            .field("items", &self.items)
            .field("counters", &self.counters)
            .field("current", &self.current_item().map(Item::id))
            .field("history", &self.history_ids())
            .field("reset_items_on_back", &self.reset_items_on_back)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter()
            .map(|id| Item::new(*id, format!("Question {id}")).unwrap())
            .collect()
    }

    #[test]
    fn needs_items() {
        let err = Questionnaire::new(Vec::new(), |_| {}).unwrap_err();
        assert!(err.is_construction());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Questionnaire::new(items(&["a", "b", "a"]), |_| {}).unwrap_err();
        assert!(err.to_string().contains("Duplicate item id a"));
    }

    #[test]
    fn sequential_run_completes_once() {
        let completions = Rc::new(Cell::new(0));
        let seen = Rc::clone(&completions);
        let mut q = Questionnaire::new(items(&["a", "b"]), move |_| seen.set(seen.get() + 1))
            .unwrap();

        assert_eq!(q.current_item().unwrap().id(), "a");
        q.next_q().unwrap();
        assert!(q.next_q().unwrap().is_completed());
        assert!(q.is_complete());
        assert_eq!(completions.get(), 1);
        assert!(matches!(
            q.next_q(),
            Err(QuestionnaireError::NoCurrentItem { history }) if history == ["a", "b"]
        ));
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn default_counter_source_follows_current_item() {
        let mut q = Questionnaire::new(items(&["a", "b"]), |_| {}).unwrap();
        assert_eq!(q.counters().default_source().unwrap(), "a");
        q.next_q().unwrap();
        assert_eq!(q.counters().default_source().unwrap(), "b");
        q.next_q().unwrap();
        assert!(q.counters().default_source().is_none());
        assert!(matches!(
            q.counters_mut().increment("x", 1.0, None),
            Err(QuestionnaireError::NoSource)
        ));
    }

    #[test]
    fn item_lookup_reports_current() {
        let q = Questionnaire::new(items(&["a"]), |_| {}).unwrap();
        let err = q.item("zz").unwrap_err();
        assert_eq!(err.to_string(), "[a] Cannot find item with id zz");
    }

    #[test]
    fn metadata() {
        let q = Questionnaire::new(items(&["a"]), |_| {})
            .unwrap()
            .with_name("Screener")
            .with_introduction("Hello")
            .with_citation("Someone, 2024")
            .with_version("1.2");
        assert_eq!(q.name(), Some("Screener"));
        assert_eq!(q.introduction(), Some("Hello"));
        assert_eq!(q.citation(), Some("Someone, 2024"));
        assert_eq!(q.version(), Some("1.2"));
        assert!(!q.reset_items_on_back());
    }
}
