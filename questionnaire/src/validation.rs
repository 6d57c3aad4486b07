//! Validation rules for answers and items.
//!
//! A rule inspects its target and returns `Some(message)` when it fails.
//! Failures become [`Issue`]s carrying the rule's severity; only
//! [`Severity::Error`] issues stop a questionnaire from advancing.
//!
//! ```rust,ignore
//! let age = Answer::new(AnswerType::Number)
//!     .with_rule(Required)
//!     .with_rule(GreaterThan(0.0))
//!     .with_rule(LessThan(120.0).with_severity(Severity::Warning));
//! ```

use crate::{Answer, Content, Item, Questionnaire, Severity};

/// A rule about a single answer.
pub trait AnswerRule {
    /// Severity of the issues this rule raises.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Check `answer`, which belongs to `item`. Returns a message on failure.
    fn evaluate(&self, answer: &Answer, item: &Item, questionnaire: &Questionnaire)
    -> Option<String>;

    /// Raise this rule's issues at a different severity.
    fn with_severity(self, severity: Severity) -> WithSeverity<Self>
    where
        Self: Sized,
    {
        WithSeverity {
            rule: self,
            severity,
        }
    }
}

/// A rule about an item as a whole, e.g. how its answers relate to each other.
pub trait ItemRule {
    /// Severity of the issues this rule raises.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Check `item`. Returns a message on failure.
    fn evaluate(&self, item: &Item, questionnaire: &Questionnaire) -> Option<String>;

    /// Raise this rule's issues at a different severity.
    fn with_severity(self, severity: Severity) -> WithSeverity<Self>
    where
        Self: Sized,
    {
        WithSeverity {
            rule: self,
            severity,
        }
    }
}

/// Wraps a rule and overrides its severity.
#[derive(Debug, Clone)]
pub struct WithSeverity<R> {
    rule: R,
    severity: Severity,
}

impl<R: AnswerRule> AnswerRule for WithSeverity<R> {
    fn severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(
        &self,
        answer: &Answer,
        item: &Item,
        questionnaire: &Questionnaire,
    ) -> Option<String> {
        self.rule.evaluate(answer, item, questionnaire)
    }
}

impl<R: ItemRule> ItemRule for WithSeverity<R> {
    fn severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, item: &Item, questionnaire: &Questionnaire) -> Option<String> {
        self.rule.evaluate(item, questionnaire)
    }
}

// === Answer rules ===

/// The answer must have content (supplied, or a default).
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl AnswerRule for Required {
    fn evaluate(&self, answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
        answer
            .content()
            .is_none()
            .then(|| "An answer is required".to_string())
    }
}

/// The answer must have content that is not blank text or an empty selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotBlank;

impl AnswerRule for NotBlank {
    fn evaluate(&self, answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
        match answer.content() {
            Some(content) if !content.is_blank() => None,
            _ => Some("Answer must not be blank".to_string()),
        }
    }
}

/// Content, when present, must be of the given kind (see [`Content::type_name`]).
#[derive(Debug, Clone, Copy)]
pub struct OfType(pub &'static str);

impl OfType {
    pub fn text() -> Self {
        Self("Text")
    }

    pub fn number() -> Self {
        Self("Number")
    }

    pub fn boolean() -> Self {
        Self("Bool")
    }

    pub fn date() -> Self {
        Self("Date")
    }

    pub fn time() -> Self {
        Self("Time")
    }
}

impl AnswerRule for OfType {
    fn evaluate(&self, answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
        let content = answer.content()?;
        (content.type_name() != self.0)
            .then(|| format!("Expected {}, got {}", self.0, content.type_name()))
    }
}

/// Numeric content, when present, must be strictly greater than the bound.
#[derive(Debug, Clone, Copy)]
pub struct GreaterThan(pub f64);

impl AnswerRule for GreaterThan {
    fn evaluate(&self, answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
        let value = answer.content()?.as_number()?;
        (value <= self.0).then(|| format!("Must be greater than {}", self.0))
    }
}

/// Numeric content, when present, must be strictly less than the bound.
#[derive(Debug, Clone, Copy)]
pub struct LessThan(pub f64);

impl AnswerRule for LessThan {
    fn evaluate(&self, answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
        let value = answer.content()?.as_number()?;
        (value >= self.0).then(|| format!("Must be less than {}", self.0))
    }
}

/// Text content, when present, must not exceed this many characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl AnswerRule for MaxLength {
    fn evaluate(&self, answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
        let Some(Content::Text(text)) = answer.content() else {
            return None;
        };
        let len = text.chars().count();
        (len > self.0).then(|| format!("At most {} characters allowed ({len} given)", self.0))
    }
}

/// A rule backed by a closure.
pub struct AnswerCheck<F> {
    check: F,
}

impl<F> AnswerCheck<F>
where
    F: Fn(&Answer, &Item, &Questionnaire) -> Option<String>,
{
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

impl<F> AnswerRule for AnswerCheck<F>
where
    F: Fn(&Answer, &Item, &Questionnaire) -> Option<String>,
{
    fn evaluate(
        &self,
        answer: &Answer,
        item: &Item,
        questionnaire: &Questionnaire,
    ) -> Option<String> {
        (self.check)(answer, item, questionnaire)
    }
}

// === Item rules ===

/// Every answer of the item must have content.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllAnswered;

impl ItemRule for AllAnswered {
    fn evaluate(&self, item: &Item, _: &Questionnaire) -> Option<String> {
        let missing: Vec<&str> = item
            .answers()
            .iter()
            .filter(|a| a.content().is_none())
            .map(|a| a.data_id())
            .collect();
        (!missing.is_empty()).then(|| format!("Please answer: {}", missing.join(", ")))
    }
}

/// At least one answer of the item must have content.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyAnswered;

impl ItemRule for AnyAnswered {
    fn evaluate(&self, item: &Item, _: &Questionnaire) -> Option<String> {
        let answered = item.answers().iter().any(|a| a.content().is_some());
        (!answered && !item.answers().is_empty())
            .then(|| "Please answer at least one question".to_string())
    }
}

/// An item rule backed by a closure.
pub struct ItemCheck<F> {
    check: F,
}

impl<F> ItemCheck<F>
where
    F: Fn(&Item, &Questionnaire) -> Option<String>,
{
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

impl<F> ItemRule for ItemCheck<F>
where
    F: Fn(&Item, &Questionnaire) -> Option<String>,
{
    fn evaluate(&self, item: &Item, questionnaire: &Questionnaire) -> Option<String> {
        (self.check)(item, questionnaire)
    }
}
