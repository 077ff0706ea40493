//! Form document model and JSON wire helpers.

use crate::element::FormElement;
use crate::{FormsError, FormsResult};
use careboard_id::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete form definition, as edited in the builder and persisted by the
/// store.
///
/// Element order is meaningful: reports render their sections in document
/// order. Every `element_id` is unique within `elements`.
///
/// All fields default when missing from the wire, so a partial document (for
/// example a bare `{"title": "..."}`) loads as that field over an otherwise
/// empty form.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormDocument {
    /// Heading shown above the rendered form.
    #[serde(default)]
    pub title: String,
    /// Introductory text shown under the title.
    #[serde(default)]
    pub description: String,
    /// Ordered field definitions.
    #[serde(default)]
    pub elements: Vec<FormElement>,
}

impl FormDocument {
    /// Returns the element with the given id, if present.
    pub fn element(&self, element_id: &ElementId) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.element_id == *element_id)
    }

    /// True when an element with the given id exists in the document.
    pub fn contains_element(&self, element_id: &ElementId) -> bool {
        self.element(element_id).is_some()
    }

    /// Checks the document's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::DuplicateElementId`] when two elements share an
    /// id, or [`FormsError::OptionsMismatch`] when an element's options field
    /// disagrees with its type.
    pub fn validate(&self) -> FormsResult<()> {
        let mut seen = HashSet::new();
        for element in &self.elements {
            if !seen.insert(&element.element_id) {
                return Err(FormsError::DuplicateElementId(
                    element.element_id.to_string(),
                ));
            }
            if !element.options_match_kind() {
                return Err(FormsError::OptionsMismatch(element.element_id.to_string()));
            }
        }
        Ok(())
    }
}

/// Parse a form document from JSON text.
///
/// This uses `serde_path_to_error` to surface a best-effort "path" (for
/// example `elements[2].type`) to the failing field when the JSON does not
/// match the document wire schema. Structural invariants are checked after
/// parsing.
///
/// # Arguments
///
/// * `json_text` - JSON text expected to represent a form document object.
///
/// # Errors
///
/// Returns [`FormsError`] if:
/// - the JSON does not represent a form document object,
/// - any field has an unexpected type,
/// - any unknown keys are present (due to `#[serde(deny_unknown_fields)]`),
/// - the parsed document violates a structural invariant.
pub fn document_from_json(json_text: &str) -> FormsResult<FormDocument> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, FormDocument>(&mut deserializer) {
        Ok(parsed) => {
            parsed.validate()?;
            Ok(parsed)
        }
        Err(err) => Err(crate::schema_mismatch("Form document", err)),
    }
}

/// Render a form document as pretty-printed JSON text.
///
/// # Errors
///
/// Returns [`FormsError::InvalidJson`] if serialisation fails.
pub fn document_to_json(document: &FormDocument) -> FormsResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::FormElementKind;

    fn sample_document() -> FormDocument {
        let mut incident = FormElement::new(
            ElementId::parse("11111111111111111111111111111111").expect("canonical id"),
            FormElementKind::Textarea,
        );
        incident.label = "What happened?".to_string();
        incident.required = true;

        let mut severity = FormElement::new(
            ElementId::parse("22222222222222222222222222222222").expect("canonical id"),
            FormElementKind::Radio,
        );
        severity.label = "Severity".to_string();
        severity.options = Some(vec!["Minor".to_string(), "Major".to_string()]);

        FormDocument {
            title: "Incident report".to_string(),
            description: "Filled in after any resident incident".to_string(),
            elements: vec![incident, severity],
        }
    }

    #[test]
    fn round_trips_sample_document() {
        let original = sample_document();
        let json = document_to_json(&original).expect("renders");
        let back = document_from_json(&json).expect("parses");

        assert_eq!(original, back);
    }

    #[test]
    fn missing_fields_default_to_an_empty_document() {
        let parsed = document_from_json("{\"title\": \"Night checks\"}").expect("parses");

        assert_eq!(parsed.title, "Night checks");
        assert_eq!(parsed.description, "");
        assert!(parsed.elements.is_empty());
    }

    #[test]
    fn strict_parse_rejects_unknown_keys() {
        let result = document_from_json("{\"title\": \"x\", \"colour\": \"blue\"}");

        match result {
            Err(FormsError::Translation(msg)) => {
                assert!(msg.contains("schema mismatch"));
            }
            other => panic!("expected translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_parse_rejects_wrong_types() {
        let result = document_from_json("{\"elements\": 5}");

        match result {
            Err(FormsError::Translation(msg)) => {
                assert!(msg.contains("schema mismatch at elements"));
            }
            other => panic!("expected translation error, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_duplicate_element_ids() {
        let mut document = sample_document();
        let clone_id = document.elements[0].clone();
        document.elements.push(clone_id);
        let json = document_to_json(&document).expect("renders");

        let result = document_from_json(&json);
        assert!(matches!(result, Err(FormsError::DuplicateElementId(_))));
    }

    #[test]
    fn validate_rejects_options_on_non_choice_elements() {
        let mut document = sample_document();
        document.elements[0].options = Some(vec!["stray".to_string()]);

        let result = document.validate();
        assert!(matches!(result, Err(FormsError::OptionsMismatch(_))));
    }

    #[test]
    fn element_lookup_finds_by_id() {
        let document = sample_document();
        let id = document.elements[1].element_id.clone();

        assert!(document.contains_element(&id));
        assert_eq!(
            document.element(&id).map(|e| e.label.as_str()),
            Some("Severity")
        );

        let absent = ElementId::parse("99999999999999999999999999999999").expect("canonical id");
        assert!(!document.contains_element(&absent));
    }
}
