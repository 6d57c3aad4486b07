use crate::{Answer, Content, Extras, NodeId, QuestionnaireError, Result};

/// One choice offered by a Radio, Select or Checkbox answer.
///
/// An option may carry its own nested answers for "other, please specify".
#[derive(Debug)]
pub struct AnswerOption {
    id: NodeId,
    content: Content,
    label: Option<String>,
    extra_answers: Vec<Answer>,
    extras: Extras,
}

impl AnswerOption {
    /// Create an option. Without explicit content, the label is used as content.
    pub fn new(content: Option<Content>, label: Option<String>) -> Result<Self> {
        let content = match (content, &label) {
            (Some(content), _) => content,
            (None, Some(label)) => Content::Text(label.clone()),
            (None, None) => {
                return Err(QuestionnaireError::construction(
                    "An Option needs a content or a label",
                ));
            }
        };
        Ok(Self {
            id: NodeId::empty(),
            content,
            label,
            extra_answers: Vec::new(),
            extras: Extras::new(),
        })
    }

    /// An option whose content is its label.
    pub fn labelled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: NodeId::empty(),
            content: Content::Text(label.clone()),
            label: Some(label),
            extra_answers: Vec::new(),
            extras: Extras::new(),
        }
    }

    /// An option with content and no label.
    pub fn valued(content: impl Into<Content>) -> Self {
        Self {
            id: NodeId::empty(),
            content: content.into(),
            label: None,
            extra_answers: Vec::new(),
            extras: Extras::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an answer the respondent gives when picking this option.
    pub fn with_extra_answer(mut self, mut answer: Answer) -> Self {
        answer.assign_id(self.id.answer(self.extra_answers.len()));
        self.extra_answers.push(answer);
        self
    }

    /// Attach a free-form property (e.g. a score). Fails on reserved names.
    pub fn try_with_extra(mut self, key: impl Into<String>, value: impl Into<Content>) -> Result<Self> {
        self.extras.insert(key, value)?;
        Ok(self)
    }

    pub(crate) fn assign_id(&mut self, id: NodeId) {
        for (index, extra) in self.extra_answers.iter_mut().enumerate() {
            extra.assign_id(id.answer(index));
        }
        self.id = id;
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label, or the content rendered as text.
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.content.to_string())
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_defaults_to_label() {
        let option = AnswerOption::new(None, Some("yes".into())).unwrap();
        assert_eq!(option.content(), &Content::from("yes"));
        assert_eq!(option.display_label(), "yes");
    }

    #[test]
    fn needs_content_or_label() {
        let err = AnswerOption::new(None, None).unwrap_err();
        assert!(err.is_construction());
    }

    #[test]
    fn valued_option_displays_content() {
        let option = AnswerOption::new(Some(Content::Number(3.0)), None).unwrap();
        assert_eq!(option.label(), None);
        assert_eq!(option.display_label(), "3");
    }
}
