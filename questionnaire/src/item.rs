use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    Answer, AnswerRow, CounterSet, Issue, ItemRule, NodeId, Questionnaire, QuestionnaireError,
    Result,
};

/// Hook run when the respondent moves on from an item.
///
/// Receives the item's most recently changed answer and the whole
/// questionnaire, so it can look at other items' answers. Counters are read
/// and changed through the `CounterSet` argument; while the hook runs the
/// questionnaire's own view of them is empty. Writes without an explicit
/// source are attributed to the item.
pub type ProcessAnswerFn =
    Box<dyn Fn(Option<&Answer>, &Item, &Questionnaire, &mut CounterSet) -> Result<()>>;

/// Chooses the next item. Returns its id, or `None` to end the questionnaire.
///
/// Runs after the answer-processing hook, so counters are up to date.
pub type NextItemFn =
    Box<dyn Fn(Option<&Answer>, &Item, &Questionnaire) -> Result<Option<String>>>;

/// How an item picks its successor.
pub enum Routing {
    /// Ask a function.
    Conditional(NextItemFn),
    /// Always go to the item with this id.
    FixedTarget(String),
    /// Go to the next item in the list, or end after the last one.
    SequentialOrEnd,
    /// End the questionnaire.
    ImmediateEnd,
}

impl fmt::Debug for Routing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conditional(_) => f.write_str("Conditional(..)"),
            Self::FixedTarget(id) => f.debug_tuple("FixedTarget").field(id).finish(),
            Self::SequentialOrEnd => f.write_str("SequentialOrEnd"),
            Self::ImmediateEnd => f.write_str("ImmediateEnd"),
        }
    }
}

/// A single question, with its answers and routing.
pub struct Item {
    id: NodeId,
    question: String,
    answers: Vec<Answer>,
    process_answer: Option<ProcessAnswerFn>,
    routing: Routing,
    rules: Vec<Box<dyn ItemRule>>,
    issues: Vec<Issue>,
}

impl Item {
    /// Create an item that routes to the next item in the list.
    ///
    /// Ids must be unique within a questionnaire; the questionnaire checks this.
    pub fn new(id: impl Into<String>, question: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(QuestionnaireError::construction("An Item must have an id"));
        }
        let question = question.into();
        if question.is_empty() {
            return Err(QuestionnaireError::construction(format!(
                "Item {id} must have a question"
            )));
        }
        Ok(Self {
            id: NodeId::new(id),
            question,
            answers: Vec::new(),
            process_answer: None,
            routing: Routing::SequentialOrEnd,
            rules: Vec::new(),
            issues: Vec::new(),
        })
    }

    /// Add an answer. Its id becomes `{item_id}_a{index}`.
    pub fn with_answer(mut self, mut answer: Answer) -> Self {
        answer.assign_id(self.id.answer(self.answers.len()));
        self.answers.push(answer);
        self
    }

    pub fn with_answers(self, answers: impl IntoIterator<Item = Answer>) -> Self {
        answers.into_iter().fold(self, Self::with_answer)
    }

    pub fn with_process_answer(
        mut self,
        hook: impl Fn(Option<&Answer>, &Item, &Questionnaire, &mut CounterSet) -> Result<()>
        + 'static,
    ) -> Self {
        self.process_answer = Some(Box::new(hook));
        self
    }

    /// Route with a function. Takes precedence over any fixed routing.
    pub fn with_next_item_fn(
        mut self,
        next: impl Fn(Option<&Answer>, &Item, &Questionnaire) -> Result<Option<String>> + 'static,
    ) -> Self {
        self.routing = Routing::Conditional(Box::new(next));
        self
    }

    /// Always continue with the item `id`. Ignored if a routing function was given.
    pub fn with_next_item(mut self, id: impl Into<String>) -> Self {
        if !self.conditional_routing() {
            self.routing = Routing::FixedTarget(id.into());
        }
        self
    }

    /// End the questionnaire after this item. Ignored if a routing function was given.
    pub fn ending(mut self) -> Self {
        if !self.conditional_routing() {
            self.routing = Routing::ImmediateEnd;
        }
        self
    }

    pub fn with_rule(mut self, rule: impl ItemRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    /// Whether the successor is chosen by a function rather than fixed.
    pub fn conditional_routing(&self) -> bool {
        matches!(self.routing, Routing::Conditional(_))
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut [Answer] {
        &mut self.answers
    }

    /// The item's only answer. Fails unless there is exactly one.
    pub fn answer(&self) -> Result<&Answer> {
        match self.answers.as_slice() {
            [answer] => Ok(answer),
            answers => Err(QuestionnaireError::InvalidAccess {
                item: self.id.clone(),
                count: answers.len(),
            }),
        }
    }

    /// Mutable counterpart of [`Item::answer`].
    pub fn answer_mut(&mut self) -> Result<&mut Answer> {
        let count = self.answers.len();
        match self.answers.as_mut_slice() {
            [answer] => Ok(answer),
            _ => Err(QuestionnaireError::InvalidAccess {
                item: self.id.clone(),
                count,
            }),
        }
    }

    /// Find an answer anywhere below this item by id or data id.
    pub fn find_answer(&self, id: &str) -> Result<&Answer> {
        self.answers
            .iter()
            .find_map(|answer| answer.find(id))
            .ok_or_else(|| QuestionnaireError::not_found("answer", id))
    }

    /// Mutable counterpart of [`Item::find_answer`].
    pub fn find_answer_mut(&mut self, id: &str) -> Result<&mut Answer> {
        self.answers
            .iter_mut()
            .find_map(|answer| answer.find_mut(id))
            .ok_or_else(|| QuestionnaireError::not_found("answer", id))
    }

    /// The top-level answer whose content changed most recently.
    ///
    /// On equal timestamps the later answer in the list wins.
    pub fn last_changed_answer(&self) -> Option<&Answer> {
        self.answers
            .iter()
            .filter_map(|answer| answer.last_changed_time().map(|time| (time, answer)))
            .max_by_key(|(time, _)| *time)
            .map(|(_, answer)| answer)
    }

    /// Reset every answer (and nested answer) to its default.
    pub fn reset_answers_at(&mut self, timestamp: DateTime<Utc>) {
        for answer in &mut self.answers {
            answer.reset_content_at(timestamp);
        }
    }

    /// Run the answer-processing hook, if any.
    pub fn process_answer(
        &self,
        questionnaire: &Questionnaire,
        counters: &mut CounterSet,
    ) -> Result<()> {
        match &self.process_answer {
            Some(hook) => hook(self.last_changed_answer(), self, questionnaire, counters),
            None => Ok(()),
        }
    }

    // === Routing ===

    /// Id of the item after this one, or `None` at the end.
    pub fn next_item_id(&self, questionnaire: &Questionnaire) -> Result<Option<String>> {
        match &self.routing {
            Routing::Conditional(next) => next(self.last_changed_answer(), self, questionnaire),
            Routing::ImmediateEnd => Ok(None),
            Routing::FixedTarget(id) => Ok(Some(id.clone())),
            Routing::SequentialOrEnd => {
                let index = questionnaire
                    .position(self.id.as_str())
                    .ok_or_else(|| QuestionnaireError::not_found("item", self.id.as_str()))?;
                Ok(questionnaire
                    .items()
                    .get(index + 1)
                    .map(|next| next.id.to_string()))
            }
        }
    }

    /// The item after this one, or `None` at the end.
    ///
    /// Fails with `UnknownItemId` if routing names an item that does not exist.
    pub fn next_item<'q>(&self, questionnaire: &'q Questionnaire) -> Result<Option<&'q Item>> {
        match self.next_item_id(questionnaire)? {
            None => Ok(None),
            Some(id) => questionnaire
                .position(&id)
                .map(|index| Some(&questionnaire.items()[index]))
                .ok_or(QuestionnaireError::UnknownItemId {
                    id,
                    current: Some(self.id.clone()),
                }),
        }
    }

    // === Validation ===

    /// Issues recorded by the last validation of the item's own rules.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues recorded on the item and all of its answers.
    pub fn all_issues(&self) -> Vec<Issue> {
        let mut issues = self.issues.clone();
        for answer in &self.answers {
            issues.extend(answer.all_issues());
        }
        issues
    }

    /// Evaluate the item's rules and, if asked, those of its answers.
    ///
    /// Pure: nothing is recorded. See [`Questionnaire::check_item`].
    pub fn find_issues(&self, questionnaire: &Questionnaire, include_children: bool) -> Vec<Issue> {
        let now = questionnaire.now();
        let mut issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(self, questionnaire)
                    .map(|message| Issue::new(self.id.clone(), message, rule.severity(), now))
            })
            .collect();
        if include_children {
            for answer in &self.answers {
                issues.extend(answer.find_issues(self, questionnaire, true));
            }
        }
        issues
    }

    /// Replace stored issues with the matching entries of `issues`.
    pub(crate) fn record_issues(&mut self, issues: &[Issue], include_children: bool) {
        self.issues = issues
            .iter()
            .filter(|issue| issue.owner == self.id)
            .cloned()
            .collect();
        if include_children {
            for answer in &mut self.answers {
                answer.record_issues(issues, true);
            }
        }
    }

    // === Export ===

    /// Rows for every answer, nested answers included.
    pub fn as_rows(&self) -> Vec<AnswerRow> {
        self.answers
            .iter()
            .flat_map(|answer| answer.to_row(true))
            .collect()
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("question", &self.question)
            .field("answers", &self.answers)
            .field("routing", &self.routing)
            .field("rules", &self.rules.len())
            .field("issues", &self.issues)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::AnswerType;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(seconds)
    }

    #[test]
    fn requires_id_and_question() {
        assert!(Item::new("", "q").unwrap_err().is_construction());
        assert!(Item::new("q0", "").unwrap_err().is_construction());
    }

    #[test]
    fn single_answer_accessor() {
        let mut item = Item::new("q", "Two things?")
            .unwrap()
            .with_answer(Answer::new(AnswerType::Text))
            .with_answer(Answer::new(AnswerType::Text));

        item.answers_mut()[1].set_content_at("second", at(1));
        assert_eq!(item.last_changed_answer().unwrap().id(), "q_a1");
        assert!(matches!(
            item.answer(),
            Err(QuestionnaireError::InvalidAccess { count: 2, .. })
        ));
        assert!(item.answer_mut().is_err());
    }

    #[test]
    fn last_changed_answer_prefers_newest() {
        let mut item = Item::new("q", "Which?")
            .unwrap()
            .with_answers([Answer::new(AnswerType::Text), Answer::new(AnswerType::Text)]);
        assert!(item.last_changed_answer().is_none());

        item.answers_mut()[1].set_content_at("b", at(1));
        item.answers_mut()[0].set_content_at("a", at(2));
        assert_eq!(item.last_changed_answer().unwrap().id(), "q_a0");
    }

    #[test]
    fn routing_precedence() {
        let item = Item::new("q", "?")
            .unwrap()
            .with_next_item_fn(|_, _, _| Ok(None))
            .with_next_item("elsewhere")
            .ending();
        assert!(item.conditional_routing());

        let item = Item::new("q", "?").unwrap().with_next_item("q2");
        assert!(!item.conditional_routing());
        assert!(matches!(item.routing(), Routing::FixedTarget(id) if id == "q2"));

        let item = Item::new("q", "?").unwrap();
        assert!(matches!(item.routing(), Routing::SequentialOrEnd));
    }

    #[test]
    fn find_answer_by_data_id() {
        let item = Item::new("q", "Name?")
            .unwrap()
            .with_answer(Answer::new(AnswerType::Text).with_data_id("name"));
        assert_eq!(item.find_answer("name").unwrap().id(), "q_a0");
        assert_eq!(item.find_answer("q_a0").unwrap().data_id(), "name");
        assert!(matches!(
            item.find_answer("nope"),
            Err(QuestionnaireError::NotFound { kind: "answer", .. })
        ));
    }
}
