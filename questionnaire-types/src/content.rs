use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// A single piece of answer content.
///
/// This is the value recorded in an answer's history each time the
/// respondent (or a reset) changes it, and the value carried by options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Free text (Text answers, option values).
    Text(String),

    /// A numeric value (Number answers, option scores).
    Number(f64),

    /// A boolean value.
    Bool(bool),

    /// The index of the chosen option (Radio and Select answers).
    Choice(usize),

    /// The indices of all ticked options (Checkbox answers).
    Choices(Vec<usize>),

    /// A calendar date (Date answers).
    Date(NaiveDate),

    /// A time of day (Time answers).
    Time(NaiveTime),
}

impl Content {
    /// Try to get this content as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this content as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this content as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this content as a chosen option index.
    pub fn as_choice(&self) -> Option<usize> {
        match self {
            Self::Choice(idx) => Some(*idx),
            _ => None,
        }
    }

    /// Try to get this content as chosen option indices.
    pub fn as_choices(&self) -> Option<&[usize]> {
        match self {
            Self::Choices(indices) => Some(indices),
            _ => None,
        }
    }

    /// Try to get this content as a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get this content as a time of day.
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Whether this is text made only of whitespace, or an empty selection.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Choices(indices) => indices.is_empty(),
            _ => false,
        }
    }

    /// Get the type name of this content for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Number(_) => "Number",
            Self::Bool(_) => "Bool",
            Self::Choice(_) => "Choice",
            Self::Choices(_) => "Choices",
            Self::Date(_) => "Date",
            Self::Time(_) => "Time",
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Choice(idx) => write!(f, "{idx}"),
            Self::Choices(indices) => {
                let joined: Vec<String> = indices.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(","))
            }
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M")),
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Content {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Content {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Content {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Content {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<usize> for Content {
    fn from(idx: usize) -> Self {
        Self::Choice(idx)
    }
}

impl From<Vec<usize>> for Content {
    fn from(indices: Vec<usize>) -> Self {
        Self::Choices(indices)
    }
}

impl From<NaiveDate> for Content {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Content {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_become_numbers() {
        assert_eq!(Content::from(7), Content::Number(7.0));
        assert_eq!(Content::from(7_i64).as_number(), Some(7.0));
    }

    #[test]
    fn blank_text_and_empty_selection() {
        assert!(Content::from("   ").is_blank());
        assert!(Content::Choices(vec![]).is_blank());
        assert!(!Content::from("x").is_blank());
        assert!(!Content::Number(0.0).is_blank());
    }

    #[test]
    fn display() {
        assert_eq!(Content::from("hi").to_string(), "hi");
        assert_eq!(Content::Number(2.5).to_string(), "2.5");
        assert_eq!(Content::Choices(vec![0, 2]).to_string(), "[0,2]");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(Content::from(date).to_string(), "2024-03-01");
    }
}
