//! Incident report composition and the draft/published policy split.

use crate::content::{draft_content, report_content, CapturedValues};
use crate::section::ReportSection;
use crate::{ReportError, ReportResult};
use careboard_forms::FormDocument;
use careboard_types::NonEmptyText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a composed report.
///
/// Drafts are working copies: carers save them mid-shift with whatever has
/// been captured so far. Publication is the point where completeness rules
/// apply.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ReportStatus {
    Draft,
    Published,
}

/// People the report is about.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportTags {
    /// Resident the report is primarily about. Must be non-blank to publish.
    #[serde(default)]
    pub primary_resident: String,
    /// Other residents involved, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub involved_residents: Vec<String>,
    /// Caregivers involved, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub involved_caregivers: Vec<String>,
}

/// A composed incident report, ready for storage or review.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IncidentReport {
    /// Title of the form the report answers.
    pub title: String,
    pub status: ReportStatus,
    /// When the incident happened, as recorded by the reporter.
    pub occurred_at: DateTime<Utc>,
    pub tags: ReportTags,
    /// Ordered report content.
    pub sections: Vec<ReportSection>,
}

impl IncidentReport {
    /// Composes a report from a form definition and the values captured
    /// against it.
    ///
    /// The rules depend on the target status:
    ///
    /// - `Published` applies the full projection: every required element must
    ///   carry a usable value, and `tags.primary_resident` must be non-blank.
    /// - `Draft` skips the required-element and tag rules entirely. Shape
    ///   mismatches and values for unknown elements still fail; a draft may
    ///   be incomplete but never structurally wrong.
    ///
    /// # Arguments
    ///
    /// * `document` - The form definition the report answers.
    /// * `values` - Captured values keyed by element id.
    /// * `status` - Target lifecycle state.
    /// * `tags` - People the report is about.
    /// * `occurred_at` - When the incident happened.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] describing the first rule the input breaks.
    pub fn compose(
        document: &FormDocument,
        values: &CapturedValues,
        status: ReportStatus,
        tags: ReportTags,
        occurred_at: DateTime<Utc>,
    ) -> ReportResult<Self> {
        let sections = match status {
            ReportStatus::Published => {
                validate_publish_tags(&tags)?;
                report_content(document, values)?
            }
            ReportStatus::Draft => draft_content(document, values)?,
        };

        Ok(Self {
            title: document.title.clone(),
            status,
            occurred_at,
            tags,
            sections,
        })
    }
}

fn validate_publish_tags(tags: &ReportTags) -> ReportResult<()> {
    NonEmptyText::new(&tags.primary_resident).map_err(|_| {
        ReportError::MissingTag("primary_resident must name a resident".to_string())
    })?;
    Ok(())
}

/// Render a composed report as pretty-printed JSON text.
///
/// # Errors
///
/// Returns [`ReportError::InvalidJson`] if serialisation fails.
pub fn report_to_json(report: &IncidentReport) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
