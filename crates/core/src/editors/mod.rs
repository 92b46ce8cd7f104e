//! Section editors.
//!
//! An editor is built from a borrow of the one slice it owns and turns an operator action into
//! a typed change for that slice. It never sees the rest of the record and never mutates
//! anything: the caller hands the change to
//! [`EncounterSession::apply_change`](crate::EncounterSession::apply_change).
//!
//! Collection edits compute the complete new list (append, filter by id, map by id) so the
//! session can replace the list wholesale. Entries are matched by `id` only.

mod diagnosis;
mod examination;
mod follow_up;
mod history;
mod investigations;
mod orders;

pub use diagnosis::{DiagnosisDraft, DiagnosisEditor};
pub use examination::ExaminationEditor;
pub use follow_up::{EmergencyContactDraft, FollowUpEditor};
pub use history::HistoryEditor;
pub use investigations::{InvestigationDraft, InvestigationsEditor, ResultDraft};
pub use orders::{InvestigationOrderDraft, MedicationDraft, OrdersEditor};

use crate::error::{EditorError, EditorResult};
use crate::record::diagnosis::Diagnosis;
use crate::record::follow_up::EmergencyContact;
use crate::record::history::FamilyMember;
use crate::record::investigations::Investigation;
use crate::record::orders::{InvestigationOrder, MedicationOrder};
use crate::record::SectionId;
use chrono::{DateTime, Utc};
use hims_uuid::EntityId;

/// Who made an edit and when. Stamped onto audited entities such as diagnoses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditStamp {
    pub by: String,
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    pub fn now(by: impl Into<String>) -> Self {
        Self {
            by: by.into(),
            at: Utc::now(),
        }
    }
}

trait Identified {
    fn entity_id(&self) -> EntityId;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn entity_id(&self) -> EntityId {
                self.id
            }
        })*
    };
}

identified!(
    Diagnosis,
    EmergencyContact,
    FamilyMember,
    Investigation,
    InvestigationOrder,
    MedicationOrder,
);

/// The list with the entry `id` removed.
fn without<T: Identified + Clone>(
    items: &[T],
    id: EntityId,
    section: SectionId,
) -> EditorResult<Vec<T>> {
    if !items.iter().any(|item| item.entity_id() == id) {
        return Err(EditorError::UnknownId { section, id });
    }
    Ok(items
        .iter()
        .filter(|item| item.entity_id() != id)
        .cloned()
        .collect())
}

/// The list with the entry `id` passed through `update`.
fn with_updated<T: Identified + Clone>(
    items: &[T],
    id: EntityId,
    section: SectionId,
    update: impl FnOnce(T) -> EditorResult<T>,
) -> EditorResult<Vec<T>> {
    let index = items
        .iter()
        .position(|item| item.entity_id() == id)
        .ok_or(EditorError::UnknownId { section, id })?;

    let mut next = items.to_vec();
    next[index] = update(items[index].clone())?;
    Ok(next)
}
