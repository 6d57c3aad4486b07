use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    AnswerOption, AnswerRow, AnswerRule, AnswerType, ChangeSource, Content, ContentHistory, Extras,
    Issue, Item, NodeId, Questionnaire, Result, utc_string,
};

/// One logical answer to an item's question.
///
/// Content is never overwritten: every change, including a reset to the
/// default, is appended to the answer's history, and the current content is
/// read from the newest entry. Changes take an explicit timestamp; inside a
/// questionnaire use [`Questionnaire::respond_to`] or [`Questionnaire::now`]
/// so all entries come from the same clock.
pub struct Answer {
    id: NodeId,
    explicit_id: bool,
    data_id: Option<String>,
    answer_type: AnswerType,
    label: Option<String>,
    default_content: Option<Content>,
    history: ContentHistory,
    rules: Vec<Box<dyn AnswerRule>>,
    issues: Vec<Issue>,
    options: Vec<AnswerOption>,
    extra_answers: Vec<Answer>,
    extras: Extras,
}

impl Answer {
    /// Create an answer of the given type.
    ///
    /// Unless named with [`Answer::with_id`], its id is assigned from its
    /// position when it is added to an item, option or other answer.
    pub fn new(answer_type: AnswerType) -> Self {
        Self {
            id: NodeId::empty(),
            explicit_id: false,
            data_id: None,
            answer_type,
            label: None,
            default_content: None,
            history: ContentHistory::new(),
            rules: Vec::new(),
            issues: Vec::new(),
            options: Vec::new(),
            extra_answers: Vec::new(),
            extras: Extras::new(),
        }
    }

    /// Give the answer a fixed id. It is kept when the answer is attached, and
    /// nested answers and options derive their ids from it.
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.explicit_id = true;
        self.relabel(id.into());
        self
    }

    /// Set the name used for this answer in exported data.
    pub fn with_data_id(mut self, data_id: impl Into<String>) -> Self {
        self.data_id = Some(data_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the content used until the respondent supplies one.
    pub fn with_default(mut self, content: impl Into<Content>) -> Self {
        self.default_content = Some(content.into());
        self
    }

    pub fn with_rule(mut self, rule: impl AnswerRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Add a choice. Options are only meaningful for Radio, Select and Checkbox answers.
    pub fn with_option(mut self, mut option: AnswerOption) -> Self {
        option.assign_id(self.id.option(self.options.len()));
        self.options.push(option);
        self
    }

    pub fn with_options(self, options: impl IntoIterator<Item = AnswerOption>) -> Self {
        options.into_iter().fold(self, Self::with_option)
    }

    /// Add a nested answer, e.g. a follow-up that refines this one.
    pub fn with_extra_answer(mut self, mut answer: Answer) -> Self {
        answer.assign_id(self.id.answer(self.extra_answers.len()));
        self.extra_answers.push(answer);
        self
    }

    /// Attach a free-form property. Fails on reserved names.
    pub fn try_with_extra(mut self, key: impl Into<String>, value: impl Into<Content>) -> Result<Self> {
        self.extras.insert(key, value)?;
        Ok(self)
    }

    /// Take the positional id `id`, unless an explicit one was given.
    pub(crate) fn assign_id(&mut self, id: NodeId) {
        let id = if self.explicit_id { self.id.clone() } else { id };
        self.relabel(id);
    }

    fn relabel(&mut self, id: NodeId) {
        for (index, option) in self.options.iter_mut().enumerate() {
            option.assign_id(id.option(index));
        }
        for (index, extra) in self.extra_answers.iter_mut().enumerate() {
            extra.assign_id(id.answer(index));
        }
        self.id = id;
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The export name: the explicit data id, or the positional id.
    pub fn data_id(&self) -> &str {
        self.data_id.as_deref().unwrap_or(self.id.as_str())
    }

    pub fn answer_type(&self) -> AnswerType {
        self.answer_type
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn default_content(&self) -> Option<&Content> {
        self.default_content.as_ref()
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn extra_answers(&self) -> &[Answer] {
        &self.extra_answers
    }

    pub fn extra_answers_mut(&mut self) -> &mut [Answer] {
        &mut self.extra_answers
    }

    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    // === Content ===

    /// Current content: the newest history entry, or the default if nothing was recorded.
    pub fn content(&self) -> Option<&Content> {
        match self.history.last() {
            Some(change) => change.content.as_ref(),
            None => self.default_content.as_ref(),
        }
    }

    /// The newest recorded content, without falling back to the default.
    pub fn raw_content(&self) -> Option<&Content> {
        self.history.last().and_then(|change| change.content.as_ref())
    }

    /// Record content supplied by the respondent at `timestamp`.
    pub fn set_content_at(&mut self, content: impl Into<Content>, timestamp: DateTime<Utc>) {
        self.history
            .push(Some(content.into()), ChangeSource::User, timestamp);
    }

    /// Restore the default content here and in every nested answer.
    ///
    /// Each reset is a new history entry; nothing is erased.
    pub fn reset_content_at(&mut self, timestamp: DateTime<Utc>) {
        self.history
            .push(self.default_content.clone(), ChangeSource::Reset, timestamp);
        for extra in &mut self.extra_answers {
            extra.reset_content_at(timestamp);
        }
        for option in &mut self.options {
            for extra in option.extra_answers_mut() {
                extra.reset_content_at(timestamp);
            }
        }
    }

    /// Whether any content change (including a reset) was ever recorded.
    pub fn content_changed(&self) -> bool {
        !self.history.is_empty()
    }

    /// When content last changed.
    pub fn last_changed_time(&self) -> Option<DateTime<Utc>> {
        self.history.last().map(|change| change.timestamp)
    }

    pub fn history(&self) -> &ContentHistory {
        &self.history
    }

    /// The option picked by a Radio or Select answer.
    pub fn selected_option(&self) -> Option<&AnswerOption> {
        self.content()
            .and_then(Content::as_choice)
            .and_then(|index| self.options.get(index))
    }

    /// The options ticked in a Checkbox answer.
    pub fn selected_options(&self) -> Vec<&AnswerOption> {
        self.content()
            .and_then(Content::as_choices)
            .map(|indices| indices.iter().filter_map(|i| self.options.get(*i)).collect())
            .unwrap_or_default()
    }

    // === Nested lookup ===

    /// Find this answer or a nested one (in extra answers or options) by id or data id.
    pub fn find(&self, id: &str) -> Option<&Answer> {
        if self.id == id || self.data_id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children().find_map(|child| child.find(id))
    }

    /// Mutable counterpart of [`Answer::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Answer> {
        if self.id == id || self.data_id.as_deref() == Some(id) {
            return Some(self);
        }
        self.extra_answers
            .iter_mut()
            .chain(
                self.options
                    .iter_mut()
                    .flat_map(|option| option.extra_answers_mut().iter_mut()),
            )
            .find_map(|child| child.find_mut(id))
    }

    /// Nested answers: extra answers first, then those of each option.
    fn children(&self) -> impl Iterator<Item = &Answer> {
        self.extra_answers.iter().chain(
            self.options
                .iter()
                .flat_map(|option| option.extra_answers().iter()),
        )
    }

    // === Validation ===

    /// Issues recorded by the last validation of this answer.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues recorded on this answer and every nested answer.
    pub fn all_issues(&self) -> Vec<Issue> {
        let mut issues = self.issues.clone();
        for child in self.children() {
            issues.extend(child.all_issues());
        }
        issues
    }

    /// Evaluate this answer's rules and, if asked, those of its extra answers
    /// and of the extra answers of the options currently selected. Follow-ups
    /// of unselected options are not checked.
    ///
    /// Pure: nothing is recorded. See [`Questionnaire::check_answer`].
    pub fn find_issues(
        &self,
        item: &Item,
        questionnaire: &Questionnaire,
        include_children: bool,
    ) -> Vec<Issue> {
        let now = questionnaire.now();
        let mut issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(self, item, questionnaire)
                    .map(|message| Issue::new(self.id.clone(), message, rule.severity(), now))
            })
            .collect();
        if include_children {
            let chosen_extras = self
                .chosen_options()
                .into_iter()
                .flat_map(AnswerOption::extra_answers);
            for extra in self.extra_answers.iter().chain(chosen_extras) {
                issues.extend(extra.find_issues(item, questionnaire, true));
            }
        }
        issues
    }

    /// Options picked by the current content, whether a single choice or several.
    fn chosen_options(&self) -> Vec<&AnswerOption> {
        if !self.answer_type.is_enumerated() {
            return Vec::new();
        }
        match self.selected_option() {
            Some(option) => vec![option],
            None => self.selected_options(),
        }
    }

    /// Replace the stored issues with those in `issues` owned by this answer.
    pub(crate) fn record_issues(&mut self, issues: &[Issue], include_children: bool) {
        self.issues = issues
            .iter()
            .filter(|issue| issue.owner == self.id)
            .cloned()
            .collect();
        if include_children {
            let nested = self.extra_answers.iter_mut().chain(
                self.options
                    .iter_mut()
                    .flat_map(|option| option.extra_answers_mut().iter_mut()),
            );
            for extra in nested {
                extra.record_issues(issues, true);
            }
        }
    }

    // === Export ===

    /// Flat rows for export: this answer, then (if asked) every nested answer.
    pub fn to_row(&self, include_children: bool) -> Vec<AnswerRow> {
        let mut rows = vec![self.own_row()];
        if include_children {
            for child in self.children() {
                rows.extend(child.to_row(true));
            }
        }
        rows
    }

    fn own_row(&self) -> AnswerRow {
        let (content, label) = match self.answer_type {
            answer_type if answer_type.is_single_choice() => match self.selected_option() {
                Some(option) => (
                    Some(option.content().clone()),
                    option.label().or(self.label()).map(str::to_string),
                ),
                None => (self.content().cloned(), self.label.clone()),
            },
            AnswerType::Checkbox if self.content().is_some() => {
                let labels: Vec<String> = self
                    .selected_options()
                    .iter()
                    .map(|option| option.display_label())
                    .collect();
                let serialized = serde_json::Value::from(labels).to_string();
                (Some(Content::Text(serialized)), self.label.clone())
            }
            _ => (self.content().cloned(), self.label.clone()),
        };
        AnswerRow {
            id: self.id.to_string(),
            data_id: self.data_id().to_string(),
            type_name: self.answer_type.name().to_string(),
            content,
            label,
            answer_utc_time: self.last_changed_time().as_ref().map(utc_string),
            extras: self.extras.clone(),
        }
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Answer")
            .field("id", &self.id)
            .field("data_id", &self.data_id)
            .field("answer_type", &self.answer_type)
            .field("content", &self.content())
            .field("history", &self.history.len())
            .field("rules", &self.rules.len())
            .field("issues", &self.issues)
            .field("options", &self.options)
            .field("extra_answers", &self.extra_answers)
            .finish_non_exhaustive()
    }
}
