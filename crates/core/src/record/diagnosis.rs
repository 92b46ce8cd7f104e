//! Diagnosis slice: an ordered list of diagnoses.
//!
//! `order` is a dense 1-based priority index. The editor maintains it; the slice itself only
//! replaces the list.

use chrono::{DateTime, NaiveDate, Utc};
use hims_types::NonEmptyText;
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosisSlice {
    pub diagnoses: Vec<Diagnosis>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosisType {
    Primary,
    Secondary,
    Differential,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Certainty {
    Confirmed,
    Suspected,
    #[serde(alias = "rule_out")]
    RuleOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosisStatus {
    #[default]
    Active,
    Resolved,
    Chronic,
    Recurrent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub id: EntityId,
    #[serde(alias = "description")]
    pub name: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: DiagnosisType,
    pub certainty: Certainty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: DiagnosisStatus,
    #[serde(default)]
    pub reasoning: String,
    pub order: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}. {} ({code})", self.order, self.name),
            None => write!(f, "{}. {}", self.order, self.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DiagnosisChange {
    Diagnoses(Vec<Diagnosis>),
}

impl DiagnosisChange {
    pub const FIELDS: &'static [&'static str] = &["diagnoses"];
}

impl DiagnosisSlice {
    pub fn with_change(self, change: DiagnosisChange) -> Self {
        match change {
            DiagnosisChange::Diagnoses(diagnoses) => Self { diagnoses },
        }
    }

    pub fn primary_count(&self) -> usize {
        self.diagnoses
            .iter()
            .filter(|d| d.kind == DiagnosisType::Primary)
            .count()
    }
}
