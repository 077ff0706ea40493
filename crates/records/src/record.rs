//! The typed medical-record family.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A medical record with its kind made explicit.
///
/// The `record_type` marker is part of the wire shape, so a serialised record
/// can never lose its classification. Construction happens at ingestion:
/// either directly from marked JSON, or through
/// [`crate::classify`] for legacy exports.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "record_type", rename_all = "snake_case")]
pub enum MedicalRecord {
    /// A diagnosed condition.
    Condition {
        condition_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        diagnosed_on: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    /// A known allergy.
    Allergy {
        allergen: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reaction: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<String>,
    },
    /// A long-running illness under management.
    ChronicIllness {
        illness_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        since: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        management: Option<String>,
    },
    /// A surgical procedure in the resident's history.
    Surgical {
        procedure: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        performed_on: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    /// A vaccination, with the next booster when scheduled.
    Immunization {
        vaccine: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        administered_on: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        booster_due: Option<NaiveDate>,
    },
}

/// Display pair for a record: a one-line title and supporting detail.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecordSummary {
    pub title: String,
    /// Joined detail parts; empty when the record carries nothing beyond its
    /// principal field.
    pub detail: String,
}

impl MedicalRecord {
    /// Renders the record for list views: what it is, then whatever detail
    /// the record actually carries.
    pub fn summary(&self) -> RecordSummary {
        match self {
            Self::Condition {
                condition_name,
                diagnosed_on,
                notes,
            } => {
                let mut parts = Vec::new();
                if let Some(date) = diagnosed_on {
                    parts.push(format!("diagnosed: {date}"));
                }
                if let Some(notes) = notes {
                    parts.push(notes.clone());
                }
                RecordSummary {
                    title: format!("Condition: {condition_name}"),
                    detail: parts.join("; "),
                }
            }
            Self::Allergy {
                allergen,
                reaction,
                severity,
            } => {
                let mut parts = Vec::new();
                if let Some(reaction) = reaction {
                    parts.push(format!("reaction: {reaction}"));
                }
                if let Some(severity) = severity {
                    parts.push(format!("severity: {severity}"));
                }
                RecordSummary {
                    title: format!("Allergy: {allergen}"),
                    detail: parts.join("; "),
                }
            }
            Self::ChronicIllness {
                illness_name,
                since,
                management,
            } => {
                let mut parts = Vec::new();
                if let Some(date) = since {
                    parts.push(format!("since: {date}"));
                }
                if let Some(management) = management {
                    parts.push(format!("management: {management}"));
                }
                RecordSummary {
                    title: format!("Chronic illness: {illness_name}"),
                    detail: parts.join("; "),
                }
            }
            Self::Surgical {
                procedure,
                performed_on,
                notes,
            } => {
                let mut parts = Vec::new();
                if let Some(date) = performed_on {
                    parts.push(format!("performed: {date}"));
                }
                if let Some(notes) = notes {
                    parts.push(notes.clone());
                }
                RecordSummary {
                    title: format!("Surgery: {procedure}"),
                    detail: parts.join("; "),
                }
            }
            Self::Immunization {
                vaccine,
                administered_on,
                booster_due,
            } => {
                let mut parts = Vec::new();
                if let Some(date) = administered_on {
                    parts.push(format!("administered: {date}"));
                }
                if let Some(date) = booster_due {
                    parts.push(format!("booster due: {date}"));
                }
                RecordSummary {
                    title: format!("Immunisation: {vaccine}"),
                    detail: parts.join("; "),
                }
            }
        }
    }
}
