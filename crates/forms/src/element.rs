//! Form element model: the closed set of field types and the element wire
//! struct.

use crate::FormsError;
use careboard_id::ElementId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Label seeded into the option list of a freshly added choice element.
const DEFAULT_OPTION_LABEL: &str = "Option 1";

/// The closed set of field types a form element can have.
///
/// The type is fixed when the element is created: no editing command can
/// change it afterwards. Wire names are lowercase (`"text"`, `"radio"`, ...).
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormElementKind {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    Textarea,
    /// Calendar date.
    Date,
    /// Single choice from a fixed option list.
    Radio,
    /// Multiple choices from a fixed option list.
    Checkbox,
}

impl FormElementKind {
    /// Returns the lowercase wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Date => "date",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// True for types that carry a fixed option list (radio and checkbox).
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }

    /// True for types whose captured value is a list rather than a single
    /// entry. Only checkboxes accept more than one value.
    pub fn allows_multiple_values(&self) -> bool {
        matches!(self, Self::Checkbox)
    }

    /// Returns the option list a freshly added element of this type starts
    /// with: a single placeholder for choice types, nothing for the rest.
    pub fn seed_options(&self) -> Option<Vec<String>> {
        if self.is_choice() {
            Some(vec![DEFAULT_OPTION_LABEL.to_string()])
        } else {
            None
        }
    }
}

impl fmt::Display for FormElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FormElementKind {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "textarea" => Ok(Self::Textarea),
            "date" => Ok(Self::Date),
            "radio" => Ok(Self::Radio),
            "checkbox" => Ok(Self::Checkbox),
            other => Err(FormsError::UnknownElementKind(other.to_string())),
        }
    }
}

/// A single field definition within a form document.
///
/// Invariant: `options` is present exactly when the type is a choice type.
/// Non-choice elements do not carry an empty list; they carry no list at all,
/// and the field stays off the wire entirely.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormElement {
    /// Canonical identifier, unique within the owning document.
    pub element_id: ElementId,
    /// Field type, fixed at creation.
    #[serde(rename = "type")]
    pub kind: FormElementKind,
    /// Caption shown to the person filling the form. Empty on a fresh
    /// element.
    pub label: String,
    /// Supporting text shown under the label. Empty on a fresh element.
    pub helptext: String,
    /// Whether a published report must carry a value for this element.
    pub required: bool,
    /// Fixed option list for choice types, absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FormElement {
    /// Creates a fresh element of the given type with editor defaults: empty
    /// label and helptext, not required, and the seed option list for choice
    /// types.
    pub fn new(element_id: ElementId, kind: FormElementKind) -> Self {
        Self {
            element_id,
            kind,
            label: String::new(),
            helptext: String::new(),
            required: false,
            options: kind.seed_options(),
        }
    }

    /// True when the options field agrees with the element type: present on
    /// choice elements, absent on the rest.
    pub fn options_match_kind(&self) -> bool {
        self.kind.is_choice() == self.options.is_some()
    }
}
