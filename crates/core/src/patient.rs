//! Patient summary as received from the registry.
//!
//! The encounter session copies a [`Patient`] in when it starts and never writes it back,
//! apart from the chief complaint dual-write.

use crate::record::examination::VitalSigns;
use chrono::NaiveDate;
use hims_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitType {
    New,
    Return,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    pub age: u16,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<VisitType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,
}

/// The identity of a patient as stored with an encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
}

impl From<&Patient> for PatientRef {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_summary_with_defaults() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": "P-0001",
            "name": "张伟",
            "age": 42,
            "gender": "male",
            "visitType": "return",
            "chiefComplaint": "头痛三天",
            "lastVisit": "2025-12-01",
            "vitalSigns": {"temperature": 36.9}
        }))
        .unwrap();

        assert_eq!(patient.visit_type, Some(VisitType::Return));
        assert_eq!(patient.chief_complaint.as_deref(), Some("头痛三天"));
        assert!(patient.allergies.is_empty());
        assert_eq!(
            patient.vital_signs.and_then(|v| v.temperature),
            Some(36.9)
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = serde_json::from_value::<Patient>(serde_json::json!({
            "id": "P-0002", "name": " ", "age": 30, "gender": "female"
        }));
        assert!(result.is_err());
    }
}
