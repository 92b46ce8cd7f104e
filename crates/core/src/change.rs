//! The uniform change protocol between section editors and the encounter session.

use crate::error::{ChangeError, ChangeResult};
use crate::record::diagnosis::DiagnosisChange;
use crate::record::examination::ExaminationChange;
use crate::record::follow_up::FollowUpChange;
use crate::record::history::HistoryChange;
use crate::record::investigations::InvestigationsChange;
use crate::record::orders::OrdersChange;
use crate::record::SectionId;
use hims_uuid::EntityId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A field-level change addressed to one record slice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "change", rename_all = "kebab-case")]
pub enum SectionChange {
    History(HistoryChange),
    Examination(ExaminationChange),
    Diagnosis(DiagnosisChange),
    Orders(OrdersChange),
    Investigations(InvestigationsChange),
    FollowUp(FollowUpChange),
}

impl SectionChange {
    pub fn section(&self) -> SectionId {
        match self {
            SectionChange::History(_) => SectionId::History,
            SectionChange::Examination(_) => SectionId::Examination,
            SectionChange::Diagnosis(_) => SectionId::Diagnosis,
            SectionChange::Orders(_) => SectionId::Orders,
            SectionChange::Investigations(_) => SectionId::Investigations,
            SectionChange::FollowUp(_) => SectionId::FollowUp,
        }
    }

    /// Field names accepted by `section`.
    pub fn fields(section: SectionId) -> &'static [&'static str] {
        match section {
            SectionId::History => HistoryChange::FIELDS,
            SectionId::Examination => ExaminationChange::FIELDS,
            SectionId::Diagnosis => DiagnosisChange::FIELDS,
            SectionId::Orders => OrdersChange::FIELDS,
            SectionId::Investigations => InvestigationsChange::FIELDS,
            SectionId::FollowUp => FollowUpChange::FIELDS,
        }
    }

    /// Builds a change from an untyped `(section, field, value)` triple.
    ///
    /// # Errors
    ///
    /// - [`ChangeError::UnknownField`] if `field` is not a field of `section`.
    /// - [`ChangeError::InvalidValue`] if `value` does not have the field's shape.
    /// - [`ChangeError::DuplicateId`] or [`ChangeError::OrderOutOfSequence`] if a list is
    ///   well-typed but breaks its keying rules (see [`SectionChange::check`]).
    pub fn from_parts(
        section: SectionId,
        field: &str,
        value: serde_json::Value,
    ) -> ChangeResult<Self> {
        if !Self::fields(section).iter().any(|known| *known == field) {
            return Err(ChangeError::UnknownField {
                section,
                field: field.to_owned(),
            });
        }

        let tagged = serde_json::json!({ "field": field, "value": value });
        let change = match section {
            SectionId::History => parse(section, field, tagged).map(SectionChange::History),
            SectionId::Examination => {
                parse(section, field, tagged).map(SectionChange::Examination)
            }
            SectionId::Diagnosis => parse(section, field, tagged).map(SectionChange::Diagnosis),
            SectionId::Orders => parse(section, field, tagged).map(SectionChange::Orders),
            SectionId::Investigations => {
                parse(section, field, tagged).map(SectionChange::Investigations)
            }
            SectionId::FollowUp => parse(section, field, tagged).map(SectionChange::FollowUp),
        }?;
        change.check()?;
        Ok(change)
    }

    /// Checks list invariants that types alone cannot express.
    ///
    /// Every id-keyed list must hold each id once, and diagnosis `order` must be `1..=n` in
    /// list order. Editors always produce lists that pass; changes built from client input
    /// may not.
    pub fn check(&self) -> ChangeResult<()> {
        let section = self.section();
        match self {
            SectionChange::History(HistoryChange::FamilyMembers(members)) => {
                unique_ids(section, "familyMembers", members.iter().map(|m| m.id))
            }
            SectionChange::Diagnosis(DiagnosisChange::Diagnoses(diagnoses)) => {
                unique_ids(section, "diagnoses", diagnoses.iter().map(|d| d.id))?;
                for (position, diagnosis) in (1u32..).zip(diagnoses) {
                    if diagnosis.order != position {
                        return Err(ChangeError::OrderOutOfSequence {
                            position,
                            order: diagnosis.order,
                        });
                    }
                }
                Ok(())
            }
            SectionChange::Orders(OrdersChange::Medications(medications)) => {
                unique_ids(section, "medications", medications.iter().map(|m| m.id))
            }
            SectionChange::Orders(OrdersChange::InvestigationOrders(orders)) => {
                unique_ids(section, "investigationOrders", orders.iter().map(|o| o.id))
            }
            SectionChange::Investigations(InvestigationsChange::Investigations(investigations)) => {
                unique_ids(
                    section,
                    "investigations",
                    investigations.iter().map(|i| i.id),
                )?;
                for result in investigations.iter().filter_map(|i| i.result.as_ref()) {
                    unique_ids(
                        section,
                        "investigations.attachments",
                        result.attachments.iter().map(|a| a.id),
                    )?;
                }
                Ok(())
            }
            SectionChange::FollowUp(FollowUpChange::EmergencyContacts(contacts)) => {
                unique_ids(section, "emergencyContacts", contacts.iter().map(|c| c.id))
            }
            _ => Ok(()),
        }
    }
}

fn unique_ids(
    section: SectionId,
    field: &str,
    ids: impl Iterator<Item = EntityId>,
) -> ChangeResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ChangeError::DuplicateId {
                section,
                field: field.to_owned(),
                id,
            });
        }
    }
    Ok(())
}

fn parse<T: DeserializeOwned>(
    section: SectionId,
    field: &str,
    tagged: serde_json::Value,
) -> ChangeResult<T> {
    serde_json::from_value(tagged).map_err(|source| ChangeError::InvalidValue {
        section,
        field: field.to_owned(),
        source,
    })
}

impl From<HistoryChange> for SectionChange {
    fn from(change: HistoryChange) -> Self {
        SectionChange::History(change)
    }
}

impl From<ExaminationChange> for SectionChange {
    fn from(change: ExaminationChange) -> Self {
        SectionChange::Examination(change)
    }
}

impl From<DiagnosisChange> for SectionChange {
    fn from(change: DiagnosisChange) -> Self {
        SectionChange::Diagnosis(change)
    }
}

impl From<OrdersChange> for SectionChange {
    fn from(change: OrdersChange) -> Self {
        SectionChange::Orders(change)
    }
}

impl From<InvestigationsChange> for SectionChange {
    fn from(change: InvestigationsChange) -> Self {
        SectionChange::Investigations(change)
    }
}

impl From<FollowUpChange> for SectionChange {
    fn from(change: FollowUpChange) -> Self {
        SectionChange::FollowUp(change)
    }
}
