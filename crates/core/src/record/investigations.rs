//! Investigations slice: tracked investigations and their results.
//!
//! Status moves forward only:
//!
//! ```text
//! ordered → scheduled → in-progress → completed → reported
//!                                   ↘ cancelled → reported
//! ```

use crate::record::orders::{InvestigationKind, Priority};
use chrono::{DateTime, Utc};
use hims_types::NonEmptyText;
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestigationsSlice {
    pub investigations: Vec<Investigation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestigationStatus {
    Ordered,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Reported,
}

impl InvestigationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvestigationStatus::Ordered => "ordered",
            InvestigationStatus::Scheduled => "scheduled",
            InvestigationStatus::InProgress => "in-progress",
            InvestigationStatus::Completed => "completed",
            InvestigationStatus::Cancelled => "cancelled",
            InvestigationStatus::Reported => "reported",
        }
    }

    /// Whether `next` is the legal successor of `self`.
    pub fn can_transition_to(self, next: InvestigationStatus) -> bool {
        use InvestigationStatus::*;

        matches!(
            (self, next),
            (Ordered, Scheduled)
                | (Scheduled, InProgress)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (Completed, Reported)
                | (Cancelled, Reported)
        )
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investigation {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: InvestigationKind,
    pub name: NonEmptyText,
    pub status: InvestigationStatus,
    #[serde(default)]
    pub priority: Priority,
    pub ordered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<InvestigationResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultStatus {
    Normal,
    Abnormal,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterFlag {
    Normal,
    High,
    Low,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultParameter {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub reference_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<ParameterFlag>,
}

/// A file attached to a result. `url` is whatever the attachment port returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: EntityId,
    pub url: String,
    pub file_name: String,
    pub media_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationResult {
    pub status: ResultStatus,
    #[serde(default)]
    pub parameters: Vec<ResultParameter>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<DateTime<Utc>>,
}

impl InvestigationResult {
    /// Parameters flagged anything other than normal.
    pub fn flagged_parameters(&self) -> impl Iterator<Item = &ResultParameter> {
        self.parameters
            .iter()
            .filter(|p| p.flag.is_some_and(|flag| flag != ParameterFlag::Normal))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum InvestigationsChange {
    Investigations(Vec<Investigation>),
}

impl InvestigationsChange {
    pub const FIELDS: &'static [&'static str] = &["investigations"];
}

impl InvestigationsSlice {
    pub fn with_change(self, change: InvestigationsChange) -> Self {
        match change {
            InvestigationsChange::Investigations(investigations) => Self { investigations },
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Investigation> {
        self.investigations.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InvestigationStatus::*;

    const ALL: [InvestigationStatus; 6] =
        [Ordered, Scheduled, InProgress, Completed, Cancelled, Reported];

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(Ordered.can_transition_to(Scheduled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Reported));

        assert!(!Ordered.can_transition_to(Completed));
        assert!(!Reported.can_transition_to(Ordered));
        assert!(!Completed.can_transition_to(InProgress));
        for status in ALL {
            assert!(!status.can_transition_to(status), "{status} -> {status}");
            assert!(!Reported.can_transition_to(status));
        }
    }

    #[test]
    fn status_display_matches_wire_form() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn flagged_parameters_skip_normal_and_unflagged() {
        let parameter = |name: &str, flag| ResultParameter {
            name: name.into(),
            value: "1".into(),
            unit: String::new(),
            reference_range: String::new(),
            flag,
        };
        let result = InvestigationResult {
            status: ResultStatus::Abnormal,
            parameters: vec![
                parameter("WBC", Some(ParameterFlag::High)),
                parameter("Hb", Some(ParameterFlag::Normal)),
                parameter("PLT", None),
            ],
            attachments: vec![],
            summary: String::new(),
            reported_at: None,
        };
        let names: Vec<&str> = result.flagged_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["WBC"]);
    }
}
