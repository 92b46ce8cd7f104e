//! The consultation record and its six slices.
//!
//! A [`ConsultationRecord`] is owned by exactly one encounter session. Each slice is a plain
//! value with a `with_change` function that takes the whole slice and returns a new whole
//! slice. The record routes a [`SectionChange`] to the right slice by name and nothing else.

pub mod diagnosis;
pub mod examination;
pub mod follow_up;
pub mod history;
pub mod investigations;
pub mod orders;

use crate::change::SectionChange;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub use diagnosis::DiagnosisSlice;
pub use examination::ExaminationSlice;
pub use follow_up::FollowUpSlice;
pub use history::HistorySlice;
pub use investigations::InvestigationsSlice;
pub use orders::OrdersSlice;

/// Name of a record slice. Also the target of a failed completion rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    History,
    Examination,
    Diagnosis,
    Orders,
    Investigations,
    FollowUp,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::History,
        SectionId::Examination,
        SectionId::Diagnosis,
        SectionId::Orders,
        SectionId::Investigations,
        SectionId::FollowUp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::History => "history",
            SectionId::Examination => "examination",
            SectionId::Diagnosis => "diagnosis",
            SectionId::Orders => "orders",
            SectionId::Investigations => "investigations",
            SectionId::FollowUp => "follow-up",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown record section: '{s}'"))
    }
}

/// The mutable aggregate edited during a consultation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRecord {
    pub history: HistorySlice,
    pub examination: ExaminationSlice,
    pub diagnosis: DiagnosisSlice,
    pub orders: OrdersSlice,
    pub investigations: InvestigationsSlice,
    pub follow_up: FollowUpSlice,
}

impl ConsultationRecord {
    /// Replaces the slice named by `change` with its merged successor.
    pub fn apply(self, change: SectionChange) -> Self {
        match change {
            SectionChange::History(change) => Self {
                history: self.history.with_change(change),
                ..self
            },
            SectionChange::Examination(change) => Self {
                examination: self.examination.with_change(change),
                ..self
            },
            SectionChange::Diagnosis(change) => Self {
                diagnosis: self.diagnosis.with_change(change),
                ..self
            },
            SectionChange::Orders(change) => Self {
                orders: self.orders.with_change(change),
                ..self
            },
            SectionChange::Investigations(change) => Self {
                investigations: self.investigations.with_change(change),
                ..self
            },
            SectionChange::FollowUp(change) => Self {
                follow_up: self.follow_up.with_change(change),
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::examination::{ExaminationChange, VitalSigns};
    use crate::record::history::HistoryChange;

    #[test]
    fn section_ids_parse_back() {
        for section in SectionId::ALL {
            assert_eq!(section.as_str().parse::<SectionId>().unwrap(), section);
            let json = serde_json::to_string(&section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.as_str()));
        }
        assert!("billing".parse::<SectionId>().is_err());
    }

    #[test]
    fn apply_touches_only_the_named_slice() {
        let record = ConsultationRecord::default().apply(
            HistoryChange::PresentIllness("Headache for three days".into()).into(),
        );
        let before = record.clone();

        let vitals = VitalSigns {
            temperature: Some(37.2),
            ..VitalSigns::default()
        };
        let after = record.apply(ExaminationChange::VitalSigns(Some(vitals.clone())).into());

        assert_eq!(after.examination.vital_signs, Some(vitals));
        assert_eq!(after.history, before.history);
        assert_eq!(after.diagnosis, before.diagnosis);
        assert_eq!(after.follow_up, before.follow_up);
    }
}
