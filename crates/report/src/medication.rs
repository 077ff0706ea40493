//! Medication record schema and validation.

use crate::{ReportError, ReportResult};
use careboard_types::NonEmptyText;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single medication line on a resident's plan.
///
/// The name, dosage and frequency must be non-blank; that is enforced at
/// parse time through [`NonEmptyText`], so a record that deserialises is
/// already usable. Date ordering is checked separately by
/// [`MedicationRecord::validate`] because the wire schema cannot express it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MedicationRecord {
    /// Medication name, for example "Paracetamol".
    pub medication: NonEmptyText,
    /// Dose per administration, for example "500 mg".
    pub dosage: NonEmptyText,
    /// Administration schedule, for example "twice daily".
    pub frequency: NonEmptyText,
    /// First day of the course, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the course, when known. Never earlier than `start_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Free-text administration notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl MedicationRecord {
    /// Checks cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidDateRange`] when both dates are present
    /// and the end date is earlier than the start date.
    pub fn validate(&self) -> ReportResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ReportError::InvalidDateRange(format!(
                    "end date {end} is before start date {start}"
                )));
            }
        }
        Ok(())
    }
}

/// Parse a medication record from JSON text and check its cross-field rules.
///
/// # Errors
///
/// Returns [`ReportError::Translation`] with the failing path when the JSON
/// does not match the schema (including blank name, dosage or frequency), or
/// [`ReportError::InvalidDateRange`] when the dates are impossibly ordered.
pub fn medication_from_json(json_text: &str) -> ReportResult<MedicationRecord> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, MedicationRecord>(&mut deserializer) {
        Ok(record) => {
            record.validate()?;
            Ok(record)
        }
        Err(err) => Err(crate::schema_mismatch("Medication record", err)),
    }
}
