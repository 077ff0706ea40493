//! Captured values and the report section they project into.

use careboard_id::ElementId;
use serde::{Deserialize, Serialize};

/// A value captured for one form element while filling a report.
///
/// Single-valued elements (text, textarea, date, radio) capture one entry;
/// checkboxes capture a list. The wire shape is untagged: a JSON string is a
/// single value, a JSON array of strings is a list.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CapturedValue {
    /// One entry.
    One(String),
    /// A list of entries.
    Many(Vec<String>),
}

impl CapturedValue {
    /// True when nothing usable was captured: an empty string or an empty
    /// list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(text) => text.is_empty(),
            Self::Many(entries) => entries.is_empty(),
        }
    }

    /// Word describing the value's shape, used in error messages.
    pub(crate) fn shape_name(&self) -> &'static str {
        match self {
            Self::One(_) => "single",
            Self::Many(_) => "list",
        }
    }
}

/// One row of rendered report content: the element it answers and the
/// captured input, exactly as entered.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    /// The form element this section answers.
    pub form_element_id: ElementId,
    /// The captured input, projected as-is.
    pub input: CapturedValue,
}
