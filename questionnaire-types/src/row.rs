use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Content, Extras};

/// Flat, tabular view of one answer, as handed to exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerRow {
    pub id: String,
    /// The export name: the answer's `data_id`, or its `id` when none was given.
    pub data_id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub content: Option<Content>,
    pub label: Option<String>,
    pub answer_utc_time: Option<String>,
    /// Free-form properties, flattened into the row.
    #[serde(flatten)]
    pub extras: Extras,
}

/// Format a timestamp the way exported rows carry it, e.g. `Tue, 01 Oct 2024 09:30:00 GMT`.
pub fn utc_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
