//! Pure transition function for form-builder editing sessions.
//!
//! The builder holds no mutable state of its own: every edit is a [`Command`]
//! applied to the current [`FormDocument`], producing the next document while
//! leaving the input untouched. Replaying the same commands over the same
//! starting document (with the same identifier source) always reproduces the
//! same result, which is what makes editing sessions auditable.
//!
//! Unknown command kinds and commands that name an element the document does
//! not contain are deliberately quiet: they reduce to the identity rather
//! than failing, so a stale client cannot wedge an editing session.

use crate::document::FormDocument;
use crate::element::{FormElement, FormElementKind};
use crate::FormsResult;
use careboard_id::ElementId;
use serde::{Deserialize, Serialize};

/// Maximum number of identifier draws attempted when adding an element.
///
/// Collisions are effectively impossible with a real generator; the bound
/// exists so a misbehaving source cannot loop forever.
const MAX_ID_ATTEMPTS: usize = 5;

/// An editing command, as received from a builder session.
///
/// Wire shape is `{"kind": "...", "payload": ...}` with SCREAMING_SNAKE_CASE
/// kinds, for example:
///
/// ```json
/// {"kind": "ADD_ELEMENT", "payload": "radio"}
/// ```
///
/// Kinds outside the supported set deserialise to [`Command::Unrecognised`],
/// which applies as the identity. New command kinds can therefore roll out to
/// clients before every consumer understands them.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Replace the whole working document.
    SetForm(FormDocument),
    /// Replace the document title.
    UpdateTitle(String),
    /// Replace the document description.
    UpdateDescription(String),
    /// Append a fresh element of the given type to the end of the document.
    AddElement(FormElementKind),
    /// Merge a partial update into the element with the given id.
    UpdateElement {
        element_id: ElementId,
        updated: ElementPatch,
    },
    /// Remove the element with the given id.
    RemoveElement { element_id: ElementId },
    /// Any command kind this editor does not recognise.
    #[serde(other)]
    Unrecognised,
}

/// Partial update for a single element.
///
/// Only the fields present in the patch are touched. The element id and type
/// are not part of the patch, so no update can move an element or change what
/// kind of field it is.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helptext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Applies a command to a document, allocating any fresh element identifiers
/// from the process-wide generator.
///
/// See [`apply_with`] for the full transition semantics.
pub fn apply(current: &FormDocument, command: Command) -> FormDocument {
    apply_with(current, command, ElementId::generate)
}

/// Applies a command to a document, drawing fresh element identifiers from
/// `id_source`.
///
/// The transition is pure: `current` is never mutated, and the returned
/// document is the complete next state. Commands that do not match anything
/// (an unknown element id, an unrecognised kind) return a document equal to
/// the input.
///
/// # Arguments
///
/// * `current` - The document the editing session currently holds.
/// * `command` - The edit to apply.
/// * `id_source` - Generator for fresh element identifiers. Draws are retried
///   up to five times when a drawn id already exists in the document; if every
///   draw collides, the document is returned unchanged.
///
/// # Returns
///
/// Returns the next document state.
pub fn apply_with(
    current: &FormDocument,
    command: Command,
    id_source: impl FnMut() -> ElementId,
) -> FormDocument {
    match command {
        Command::SetForm(next) => next,
        Command::UpdateTitle(title) => {
            let mut next = current.clone();
            next.title = title;
            next
        }
        Command::UpdateDescription(description) => {
            let mut next = current.clone();
            next.description = description;
            next
        }
        Command::AddElement(kind) => add_element(current, kind, id_source),
        Command::UpdateElement {
            element_id,
            updated,
        } => update_element(current, &element_id, updated),
        Command::RemoveElement { element_id } => remove_element(current, &element_id),
        Command::Unrecognised => current.clone(),
    }
}

/// Parse a command from JSON text.
///
/// Uses `serde_path_to_error` to surface the failing field when a payload
/// does not match its command kind. An unknown kind is not a failure; it
/// parses as [`Command::Unrecognised`].
///
/// # Errors
///
/// Returns [`crate::FormsError::Translation`] when the JSON is not a command
/// object or a payload has the wrong shape.
pub fn command_from_json(json_text: &str) -> FormsResult<Command> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, Command>(&mut deserializer) {
        Ok(command) => Ok(command),
        Err(err) => Err(crate::schema_mismatch("Command", err)),
    }
}

fn add_element(
    current: &FormDocument,
    kind: FormElementKind,
    mut id_source: impl FnMut() -> ElementId,
) -> FormDocument {
    for _attempt in 0..MAX_ID_ATTEMPTS {
        let candidate = id_source();
        if current.contains_element(&candidate) {
            continue;
        }
        let mut next = current.clone();
        next.elements.push(FormElement::new(candidate, kind));
        return next;
    }
    // Every draw collided; leave the document as it was.
    current.clone()
}

fn update_element(
    current: &FormDocument,
    element_id: &ElementId,
    patch: ElementPatch,
) -> FormDocument {
    let mut next = current.clone();
    if let Some(element) = next
        .elements
        .iter_mut()
        .find(|e| e.element_id == *element_id)
    {
        if let Some(label) = patch.label {
            element.label = label;
        }
        if let Some(helptext) = patch.helptext {
            element.helptext = helptext;
        }
        if let Some(required) = patch.required {
            element.required = required;
        }
        if let Some(options) = patch.options {
            // Options only exist on choice elements; a patch against any
            // other type is dropped so the invariant survives every command.
            if element.kind.is_choice() {
                element.options = Some(options);
            }
        }
    }
    next
}

fn remove_element(current: &FormDocument, element_id: &ElementId) -> FormDocument {
    let mut next = current.clone();
    next.elements.retain(|e| e.element_id != *element_id);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn id(hex: &str) -> ElementId {
        ElementId::parse(hex).expect("canonical id")
    }

    fn document_with_two_elements() -> FormDocument {
        let mut first = FormElement::new(
            id("11111111111111111111111111111111"),
            FormElementKind::Text,
        );
        first.label = "Resident name".to_string();
        first.required = true;

        let mut second = FormElement::new(
            id("22222222222222222222222222222222"),
            FormElementKind::Radio,
        );
        second.label = "Shift".to_string();
        second.options = Some(vec!["Day".to_string(), "Night".to_string()]);

        FormDocument {
            title: "Handover notes".to_string(),
            description: "Completed at the end of every shift".to_string(),
            elements: vec![first, second],
        }
    }

    mod set_form {
        use super::*;

        #[test]
        fn replaces_the_whole_document() {
            let current = document_with_two_elements();
            let replacement = FormDocument {
                title: "Fresh start".to_string(),
                ..FormDocument::default()
            };

            let next = apply(&current, Command::SetForm(replacement.clone()));

            assert_eq!(next, replacement);
        }
    }

    mod titles {
        use super::*;

        #[test]
        fn update_title_touches_only_the_title() {
            let current = document_with_two_elements();

            let next = apply(&current, Command::UpdateTitle("Night handover".to_string()));

            assert_eq!(next.title, "Night handover");
            assert_eq!(next.description, current.description);
            assert_eq!(next.elements, current.elements);
        }

        #[test]
        fn update_description_touches_only_the_description() {
            let current = document_with_two_elements();

            let next = apply(
                &current,
                Command::UpdateDescription("Use full sentences".to_string()),
            );

            assert_eq!(next.description, "Use full sentences");
            assert_eq!(next.title, current.title);
            assert_eq!(next.elements, current.elements);
        }
    }

    mod add_element {
        use super::*;

        #[test]
        fn appends_a_fresh_element_with_defaults() {
            let current = document_with_two_elements();
            let fresh = id("33333333333333333333333333333333");
            let mut source = vec![fresh.clone()].into_iter();

            let next = apply_with(
                &current,
                Command::AddElement(FormElementKind::Text),
                move || source.next().expect("enough ids"),
            );

            assert_eq!(next.elements.len(), 3);
            let added = next.elements.last().expect("appended element");
            assert_eq!(added.element_id, fresh);
            assert_eq!(added.kind, FormElementKind::Text);
            assert_eq!(added.label, "");
            assert_eq!(added.helptext, "");
            assert!(!added.required);
            assert_eq!(added.options, None);
        }

        #[test]
        fn radio_elements_are_seeded_with_one_option() {
            let current = FormDocument::default();

            let next = apply(&current, Command::AddElement(FormElementKind::Radio));

            let added = next.elements.last().expect("appended element");
            assert_eq!(added.options, Some(vec!["Option 1".to_string()]));
        }

        #[test]
        fn retries_when_a_drawn_id_already_exists() {
            let current = document_with_two_elements();
            let colliding = id("11111111111111111111111111111111");
            let fresh = id("44444444444444444444444444444444");
            let mut source = vec![colliding, fresh.clone()].into_iter();

            let next = apply_with(
                &current,
                Command::AddElement(FormElementKind::Date),
                move || source.next().expect("enough ids"),
            );

            assert_eq!(next.elements.len(), 3);
            assert_eq!(next.elements[2].element_id, fresh);
        }

        #[test]
        fn gives_up_after_five_colliding_draws() {
            let current = document_with_two_elements();
            let draws = Cell::new(0u32);

            let next = apply_with(
                &current,
                Command::AddElement(FormElementKind::Text),
                || {
                    draws.set(draws.get() + 1);
                    id("11111111111111111111111111111111")
                },
            );

            assert_eq!(draws.get(), 5);
            assert_eq!(next, current);
        }

        #[test]
        fn generated_ids_are_unique_across_additions() {
            let mut document = FormDocument::default();
            for _ in 0..4 {
                document = apply(&document, Command::AddElement(FormElementKind::Checkbox));
            }

            assert_eq!(document.elements.len(), 4);
            assert!(document.validate().is_ok());
        }
    }

    mod update_element {
        use super::*;

        #[test]
        fn merges_only_the_patched_fields() {
            let current = document_with_two_elements();
            let target = id("11111111111111111111111111111111");

            let next = apply(
                &current,
                Command::UpdateElement {
                    element_id: target.clone(),
                    updated: ElementPatch {
                        label: Some("Full resident name".to_string()),
                        ..ElementPatch::default()
                    },
                },
            );

            let updated = next.element(&target).expect("element still present");
            assert_eq!(updated.label, "Full resident name");
            assert_eq!(updated.helptext, "");
            assert!(updated.required);
            assert_eq!(updated.kind, FormElementKind::Text);
        }

        #[test]
        fn unknown_id_leaves_the_document_identical() {
            let current = document_with_two_elements();

            let next = apply(
                &current,
                Command::UpdateElement {
                    element_id: id("99999999999999999999999999999999"),
                    updated: ElementPatch {
                        label: Some("never lands".to_string()),
                        ..ElementPatch::default()
                    },
                },
            );

            assert_eq!(next, current);
        }

        #[test]
        fn options_patch_on_a_text_element_is_dropped() {
            let current = document_with_two_elements();
            let target = id("11111111111111111111111111111111");

            let next = apply(
                &current,
                Command::UpdateElement {
                    element_id: target.clone(),
                    updated: ElementPatch {
                        options: Some(vec!["Yes".to_string(), "No".to_string()]),
                        ..ElementPatch::default()
                    },
                },
            );

            assert_eq!(next.element(&target).expect("present").options, None);
            assert!(next.validate().is_ok());
        }

        #[test]
        fn options_patch_replaces_the_list_on_a_radio_element() {
            let current = document_with_two_elements();
            let target = id("22222222222222222222222222222222");

            let next = apply(
                &current,
                Command::UpdateElement {
                    element_id: target.clone(),
                    updated: ElementPatch {
                        options: Some(vec![
                            "Day".to_string(),
                            "Night".to_string(),
                            "Weekend".to_string(),
                        ]),
                        ..ElementPatch::default()
                    },
                },
            );

            assert_eq!(
                next.element(&target).expect("present").options,
                Some(vec![
                    "Day".to_string(),
                    "Night".to_string(),
                    "Weekend".to_string()
                ])
            );
        }

        #[test]
        fn required_can_be_cleared() {
            let current = document_with_two_elements();
            let target = id("11111111111111111111111111111111");

            let next = apply(
                &current,
                Command::UpdateElement {
                    element_id: target.clone(),
                    updated: ElementPatch {
                        required: Some(false),
                        ..ElementPatch::default()
                    },
                },
            );

            assert!(!next.element(&target).expect("present").required);
        }
    }

    mod remove_element {
        use super::*;

        #[test]
        fn removes_the_named_element_and_keeps_order() {
            let current = document_with_two_elements();

            let next = apply(
                &current,
                Command::RemoveElement {
                    element_id: id("11111111111111111111111111111111"),
                },
            );

            assert_eq!(next.elements.len(), 1);
            assert_eq!(
                next.elements[0].element_id,
                id("22222222222222222222222222222222")
            );
        }

        #[test]
        fn unknown_id_leaves_the_document_identical() {
            let current = document_with_two_elements();

            let next = apply(
                &current,
                Command::RemoveElement {
                    element_id: id("99999999999999999999999999999999"),
                },
            );

            assert_eq!(next, current);
        }

        #[test]
        fn middle_removal_preserves_surrounding_order() {
            let mut current = document_with_two_elements();
            current.elements.push(FormElement::new(
                id("33333333333333333333333333333333"),
                FormElementKind::Date,
            ));

            let next = apply(
                &current,
                Command::RemoveElement {
                    element_id: id("22222222222222222222222222222222"),
                },
            );

            let remaining: Vec<_> = next
                .elements
                .iter()
                .map(|e| e.element_id.to_string())
                .collect();
            assert_eq!(
                remaining,
                vec![
                    "11111111111111111111111111111111".to_string(),
                    "33333333333333333333333333333333".to_string()
                ]
            );
        }
    }

    mod purity {
        use super::*;

        #[test]
        fn the_input_document_is_never_mutated() {
            let current = document_with_two_elements();
            let snapshot = current.clone();

            let _ = apply(&current, Command::UpdateTitle("changed".to_string()));
            let _ = apply(&current, Command::AddElement(FormElementKind::Checkbox));
            let _ = apply(
                &current,
                Command::RemoveElement {
                    element_id: id("11111111111111111111111111111111"),
                },
            );

            assert_eq!(current, snapshot);
        }

        #[test]
        fn unrecognised_commands_apply_as_the_identity() {
            let current = document_with_two_elements();

            let next = apply(&current, Command::Unrecognised);

            assert_eq!(next, current);
        }

        #[test]
        fn replaying_the_same_session_reproduces_the_same_document() {
            let commands = || {
                vec![
                    Command::UpdateTitle("Falls log".to_string()),
                    Command::AddElement(FormElementKind::Textarea),
                    Command::AddElement(FormElementKind::Radio),
                    Command::UpdateDescription("Record every fall".to_string()),
                ]
            };
            let ids = || {
                vec![
                    id("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
                    id("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
                ]
            };

            let run = |mut source: std::vec::IntoIter<ElementId>| {
                let mut document = FormDocument::default();
                for command in commands() {
                    document = apply_with(&document, command, || {
                        source.next().expect("enough ids")
                    });
                }
                document
            };

            let first = run(ids().into_iter());
            let second = run(ids().into_iter());

            assert_eq!(first, second);
        }
    }

    mod wire {
        use super::*;

        #[test]
        fn parses_an_add_element_command() {
            let command = command_from_json("{\"kind\": \"ADD_ELEMENT\", \"payload\": \"radio\"}")
                .expect("parses");

            assert_eq!(command, Command::AddElement(FormElementKind::Radio));
        }

        #[test]
        fn parses_an_update_element_command() {
            let json = r#"{
                "kind": "UPDATE_ELEMENT",
                "payload": {
                    "element_id": "11111111111111111111111111111111",
                    "updated": {"label": "Resident", "required": true}
                }
            }"#;

            let command = command_from_json(json).expect("parses");

            assert_eq!(
                command,
                Command::UpdateElement {
                    element_id: id("11111111111111111111111111111111"),
                    updated: ElementPatch {
                        label: Some("Resident".to_string()),
                        required: Some(true),
                        ..ElementPatch::default()
                    },
                }
            );
        }

        #[test]
        fn unknown_kinds_parse_as_unrecognised() {
            let command =
                command_from_json("{\"kind\": \"ROTATE_ELEMENTS\"}").expect("parses");

            assert_eq!(command, Command::Unrecognised);
        }

        #[test]
        fn patch_naming_the_element_id_is_rejected() {
            let json = r#"{
                "kind": "UPDATE_ELEMENT",
                "payload": {
                    "element_id": "11111111111111111111111111111111",
                    "updated": {"element_id": "22222222222222222222222222222222"}
                }
            }"#;

            let result = command_from_json(json);

            match result {
                Err(crate::FormsError::Translation(msg)) => {
                    assert!(msg.contains("schema mismatch"));
                }
                other => panic!("expected translation error, got {other:?}"),
            }
        }

        #[test]
        fn malformed_payload_reports_the_failing_path() {
            let result = command_from_json("{\"kind\": \"ADD_ELEMENT\", \"payload\": 7}");

            match result {
                Err(crate::FormsError::Translation(msg)) => {
                    assert!(msg.contains("schema mismatch"));
                }
                other => panic!("expected translation error, got {other:?}"),
            }
        }

        #[test]
        fn command_wire_round_trip() {
            let original = Command::RemoveElement {
                element_id: id("22222222222222222222222222222222"),
            };

            let json = serde_json::to_string(&original).expect("serialises");
            assert!(json.contains("\"REMOVE_ELEMENT\""));

            let back = command_from_json(&json).expect("parses");
            assert_eq!(original, back);
        }
    }
}
