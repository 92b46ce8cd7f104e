//! Completion rules and advisories.
//!
//! Blocking rules run only when an encounter is completed. They are evaluated in order and the
//! first failure is reported together with the section the operator has to go back to.
//! Advisories are computed on demand and never block anything.

use crate::constants::{DIAGNOSIS_PRESENT_RULE, PRESENT_ILLNESS_RULE};
use crate::record::diagnosis::DiagnosisType;
use crate::record::{ConsultationRecord, SectionId};
use hims_types::is_blank;
use serde::Serialize;

/// One blocking completion rule.
#[derive(Clone, Debug)]
pub struct CompletionRule {
    pub id: &'static str,
    pub section: SectionId,
    pub message: &'static str,
    pub passes: fn(&ConsultationRecord) -> bool,
}

/// The first rule that failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{section}: {message}")]
pub struct ValidationFailure {
    pub rule_id: &'static str,
    pub section: SectionId,
    pub message: &'static str,
}

impl From<&CompletionRule> for ValidationFailure {
    fn from(rule: &CompletionRule) -> Self {
        Self {
            rule_id: rule.id,
            section: rule.section,
            message: rule.message,
        }
    }
}

/// Ordered, fail-fast list of completion rules.
#[derive(Clone, Debug)]
pub struct ValidationGate {
    rules: Vec<CompletionRule>,
}

impl Default for ValidationGate {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValidationGate {
    pub fn new(rules: Vec<CompletionRule>) -> Self {
        Self { rules }
    }

    /// Present illness first, then at least one diagnosis.
    pub fn standard() -> Self {
        Self::new(vec![
            CompletionRule {
                id: PRESENT_ILLNESS_RULE,
                section: SectionId::History,
                message: "Present illness is required",
                passes: |record| !is_blank(&record.history.present_illness),
            },
            CompletionRule {
                id: DIAGNOSIS_PRESENT_RULE,
                section: SectionId::Diagnosis,
                message: "At least one diagnosis is required",
                passes: |record| !record.diagnosis.diagnoses.is_empty(),
            },
        ])
    }

    pub fn rules(&self) -> &[CompletionRule] {
        &self.rules
    }

    pub fn evaluate(&self, record: &ConsultationRecord) -> Result<(), ValidationFailure> {
        match self.rules.iter().find(|rule| !(rule.passes)(record)) {
            Some(rule) => Err(rule.into()),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvisoryKind {
    DiagnosisWithoutReasoning,
    MultiplePrimaryDiagnoses,
    NoPrimaryDiagnosis,
    MedicationWithoutDosage,
    AppointmentWithoutPlan,
    NoVitalSigns,
}

/// A non-blocking completeness signal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub section: SectionId,
    pub message: String,
}

impl Advisory {
    fn new(kind: AdvisoryKind, section: SectionId, message: impl Into<String>) -> Self {
        Self {
            kind,
            section,
            message: message.into(),
        }
    }
}

/// Everything that looks incomplete in `record`, in section order.
pub fn advisories(record: &ConsultationRecord) -> Vec<Advisory> {
    let mut out = Vec::new();

    if !record.examination.has_vital_signs() {
        out.push(Advisory::new(
            AdvisoryKind::NoVitalSigns,
            SectionId::Examination,
            "No vital signs recorded",
        ));
    }

    let diagnoses = &record.diagnosis.diagnoses;
    for diagnosis in diagnoses.iter().filter(|d| is_blank(&d.reasoning)) {
        out.push(Advisory::new(
            AdvisoryKind::DiagnosisWithoutReasoning,
            SectionId::Diagnosis,
            format!("Diagnosis '{}' has no reasoning", diagnosis.name),
        ));
    }
    if !diagnoses.is_empty() {
        match record.diagnosis.primary_count() {
            0 => out.push(Advisory::new(
                AdvisoryKind::NoPrimaryDiagnosis,
                SectionId::Diagnosis,
                "No primary diagnosis",
            )),
            1 => {}
            n => out.push(Advisory::new(
                AdvisoryKind::MultiplePrimaryDiagnoses,
                SectionId::Diagnosis,
                format!("{n} diagnoses are marked primary"),
            )),
        }
    }

    for medication in record
        .orders
        .medications
        .iter()
        .filter(|m| is_blank(&m.dosage))
    {
        out.push(Advisory::new(
            AdvisoryKind::MedicationWithoutDosage,
            SectionId::Orders,
            format!("Medication '{}' has no dosage", medication.name),
        ));
    }

    let follow_up = &record.follow_up;
    if follow_up.next_appointment.is_some() && is_blank(&follow_up.plan) {
        out.push(Advisory::new(
            AdvisoryKind::AppointmentWithoutPlan,
            SectionId::FollowUp,
            "Follow-up appointment has no plan",
        ));
    }

    out
}
