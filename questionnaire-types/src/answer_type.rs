use std::fmt;

use serde::Serialize;

/// The kind of an answer. Controls how frontends render it and how it is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnswerType {
    Unknown,
    None,
    Text,
    Number,
    Radio,
    Select,
    Checkbox,
    Date,
    Time,
}

impl AnswerType {
    /// Name used in exported rows.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::None => "NONE",
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Radio => "RADIO",
            Self::Select => "SELECT",
            Self::Checkbox => "CHECKBOX",
            Self::Date => "DATE",
            Self::Time => "TIME",
        }
    }

    /// Whether answers of this type pick from a list of options.
    pub fn is_enumerated(&self) -> bool {
        matches!(self, Self::Radio | Self::Select | Self::Checkbox)
    }

    /// Whether answers of this type pick exactly one option.
    pub fn is_single_choice(&self) -> bool {
        matches!(self, Self::Radio | Self::Select)
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
