//! Projection of captured values into ordered report content.

use crate::section::{CapturedValue, ReportSection};
use crate::{ReportError, ReportResult};
use careboard_forms::{FormDocument, FormElement};
use careboard_id::ElementId;
use std::collections::BTreeMap;

/// Captured values keyed by the element they answer.
///
/// The ordered map keeps iteration (and therefore error selection when more
/// than one entry is faulty) deterministic.
pub type CapturedValues = BTreeMap<ElementId, CapturedValue>;

/// Projects captured values into report sections, in document element order.
///
/// This is the strict projection used for published reports. Nothing is
/// silently repaired:
///
/// - a required element with no entry, an empty string, or an empty list
///   fails with [`ReportError::RequiredValueMissing`];
/// - a value whose shape does not fit its element (a list for anything but a
///   checkbox, a single value for a checkbox) fails with
///   [`ReportError::ShapeMismatch`];
/// - an entry keyed by an element the form does not define fails with
///   [`ReportError::UnknownElement`].
///
/// Optional elements with no entry simply produce no section. Values are
/// projected exactly as captured.
///
/// # Arguments
///
/// * `document` - The form definition the report answers.
/// * `values` - Captured values keyed by element id.
///
/// # Returns
///
/// Returns the ordered section list on success.
pub fn report_content(
    document: &FormDocument,
    values: &CapturedValues,
) -> ReportResult<Vec<ReportSection>> {
    project_content(document, values, true)
}

/// Draft-mode projection: identical to [`report_content`] except that
/// required elements are not enforced. Shape and unknown-element failures
/// still apply; a draft may be incomplete but never structurally wrong.
pub(crate) fn draft_content(
    document: &FormDocument,
    values: &CapturedValues,
) -> ReportResult<Vec<ReportSection>> {
    project_content(document, values, false)
}

fn project_content(
    document: &FormDocument,
    values: &CapturedValues,
    enforce_required: bool,
) -> ReportResult<Vec<ReportSection>> {
    // Entries that answer nothing in the form are an error, not noise to
    // drop: they usually mean the form changed under the person filling it.
    for element_id in values.keys() {
        if !document.contains_element(element_id) {
            return Err(ReportError::UnknownElement(element_id.to_string()));
        }
    }

    let mut sections = Vec::new();
    for element in &document.elements {
        match values.get(&element.element_id) {
            Some(value) => {
                check_shape(element, value)?;
                if enforce_required && element.required && value.is_empty() {
                    return Err(required_value_missing(element));
                }
                sections.push(ReportSection {
                    form_element_id: element.element_id.clone(),
                    input: value.clone(),
                });
            }
            None => {
                if enforce_required && element.required {
                    return Err(required_value_missing(element));
                }
            }
        }
    }
    Ok(sections)
}

fn check_shape(element: &FormElement, value: &CapturedValue) -> ReportResult<()> {
    let fits = match value {
        CapturedValue::One(_) => !element.kind.allows_multiple_values(),
        CapturedValue::Many(_) => element.kind.allows_multiple_values(),
    };
    if fits {
        return Ok(());
    }
    Err(ReportError::ShapeMismatch {
        element_id: element.element_id.to_string(),
        kind: element.kind.as_str().to_string(),
        given: value.shape_name(),
    })
}

fn required_value_missing(element: &FormElement) -> ReportError {
    ReportError::RequiredValueMissing {
        element_id: element.element_id.to_string(),
        label: element.label.clone(),
    }
}

/// Parse captured values from JSON text: an object keyed by canonical element
/// id, each value a string or an array of strings.
///
/// # Errors
///
/// Returns [`ReportError::Translation`] with the failing path when the JSON
/// does not match that shape.
pub fn values_from_json(json_text: &str) -> ReportResult<CapturedValues> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, CapturedValues>(&mut deserializer) {
        Ok(values) => Ok(values),
        Err(err) => Err(crate::schema_mismatch("Captured values", err)),
    }
}
