//! Tolerant parsing and classification of unmarked legacy records.

use crate::record::MedicalRecord;
use crate::{RecordError, RecordResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A medical record as older exports shaped it: a flat bag of optional
/// fields with no type marker.
///
/// Parsing is deliberately tolerant. Unknown keys are ignored and every field
/// may be absent; nothing is judged until [`classify`] runs. The only thing
/// the wire schema insists on is field types (dates must be ISO `YYYY-MM-DD`
/// days).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LegacyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosed_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illness_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administered_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booster_due: Option<NaiveDate>,
}

/// Classifies a legacy record into the typed union.
///
/// The decision checks one discriminating field at a time, in fixed priority
/// order: `condition_name`, then `allergen`, `illness_name`, `procedure`,
/// `vaccine`. The first discriminator carrying visible text wins and the
/// rest are never consulted, so a record that happens to carry several still
/// classifies the same way every time. Blank strings count as absent.
///
/// # Errors
///
/// Returns [`RecordError::UnknownShape`] when no discriminator is present.
/// That record cannot be displayed and the caller decides what to do with
/// it; classification itself never guesses.
pub fn classify(legacy: LegacyRecord) -> RecordResult<MedicalRecord> {
    let LegacyRecord {
        condition_name,
        diagnosed_on,
        notes,
        allergen,
        reaction,
        severity,
        illness_name,
        since,
        management,
        procedure,
        performed_on,
        vaccine,
        administered_on,
        booster_due,
    } = legacy;

    if let Some(condition_name) = non_blank(condition_name) {
        return Ok(MedicalRecord::Condition {
            condition_name,
            diagnosed_on,
            notes,
        });
    }
    if let Some(allergen) = non_blank(allergen) {
        return Ok(MedicalRecord::Allergy {
            allergen,
            reaction,
            severity,
        });
    }
    if let Some(illness_name) = non_blank(illness_name) {
        return Ok(MedicalRecord::ChronicIllness {
            illness_name,
            since,
            management,
        });
    }
    if let Some(procedure) = non_blank(procedure) {
        return Ok(MedicalRecord::Surgical {
            procedure,
            performed_on,
            notes,
        });
    }
    if let Some(vaccine) = non_blank(vaccine) {
        return Ok(MedicalRecord::Immunization {
            vaccine,
            administered_on,
            booster_due,
        });
    }
    Err(RecordError::UnknownShape)
}

/// Parse a legacy record from JSON text and classify it.
///
/// # Errors
///
/// Returns [`RecordError::Translation`] with the failing path when a field
/// has the wrong type, or [`RecordError::UnknownShape`] when the parsed
/// record carries no discriminator.
pub fn classify_json(json_text: &str) -> RecordResult<MedicalRecord> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, LegacyRecord>(&mut deserializer) {
        Ok(legacy) => classify(legacy),
        Err(err) => Err(crate::schema_mismatch("Legacy record", err)),
    }
}

/// Treats empty and whitespace-only strings the way the old exports meant
/// them: as absent.
fn non_blank(field: Option<String>) -> Option<String> {
    field.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
