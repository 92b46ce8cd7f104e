use super::{with_updated, without, AuditStamp};
use crate::error::{EditorError, EditorResult};
use crate::record::diagnosis::{
    Certainty, Diagnosis, DiagnosisChange, DiagnosisSlice, DiagnosisStatus, DiagnosisType,
    Severity,
};
use crate::record::SectionId;
use chrono::NaiveDate;
use hims_types::NonEmptyText;
use hims_uuid::EntityId;

/// The operator-editable part of a diagnosis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosisDraft {
    pub name: NonEmptyText,
    pub code: Option<String>,
    pub kind: DiagnosisType,
    pub certainty: Certainty,
    pub severity: Option<Severity>,
    pub onset_date: Option<NaiveDate>,
    pub status: DiagnosisStatus,
    pub reasoning: String,
}

impl DiagnosisDraft {
    /// A confirmed, active diagnosis with nothing else filled in.
    pub fn new(name: &str, kind: DiagnosisType) -> EditorResult<Self> {
        Ok(Self {
            name: NonEmptyText::new(name)?,
            code: None,
            kind,
            certainty: Certainty::Confirmed,
            severity: None,
            onset_date: None,
            status: DiagnosisStatus::Active,
            reasoning: String::new(),
        })
    }
}

impl From<&Diagnosis> for DiagnosisDraft {
    fn from(d: &Diagnosis) -> Self {
        Self {
            name: d.name.clone(),
            code: d.code.clone(),
            kind: d.kind,
            certainty: d.certainty,
            severity: d.severity,
            onset_date: d.onset_date,
            status: d.status,
            reasoning: d.reasoning.clone(),
        }
    }
}

/// Edits the diagnosis list and keeps `order` dense and 1-based.
pub struct DiagnosisEditor<'a> {
    slice: &'a DiagnosisSlice,
}

impl<'a> DiagnosisEditor<'a> {
    pub fn new(slice: &'a DiagnosisSlice) -> Self {
        Self { slice }
    }

    /// Appends a diagnosis with `order = len + 1`.
    pub fn add(&self, draft: DiagnosisDraft, stamp: &AuditStamp) -> DiagnosisChange {
        let mut diagnoses = self.slice.diagnoses.clone();
        diagnoses.push(created(draft, next_order(&diagnoses), stamp));
        DiagnosisChange::Diagnoses(diagnoses)
    }

    /// Appends a copy of `id` under a fresh id, stamped as a new entry.
    pub fn duplicate(&self, id: EntityId, stamp: &AuditStamp) -> EditorResult<DiagnosisChange> {
        let source = self
            .slice
            .diagnoses
            .iter()
            .find(|d| d.id == id)
            .ok_or(EditorError::UnknownId {
                section: SectionId::Diagnosis,
                id,
            })?;

        let mut diagnoses = self.slice.diagnoses.clone();
        diagnoses.push(created(source.into(), next_order(&diagnoses), stamp));
        Ok(DiagnosisChange::Diagnoses(diagnoses))
    }

    pub fn update(
        &self,
        id: EntityId,
        draft: DiagnosisDraft,
        stamp: &AuditStamp,
    ) -> EditorResult<DiagnosisChange> {
        with_updated(&self.slice.diagnoses, id, SectionId::Diagnosis, |existing| {
            Ok(Diagnosis {
                name: draft.name,
                code: draft.code,
                kind: draft.kind,
                certainty: draft.certainty,
                severity: draft.severity,
                onset_date: draft.onset_date,
                status: draft.status,
                reasoning: draft.reasoning,
                modified_by: Some(stamp.by.clone()),
                modified_at: Some(stamp.at),
                ..existing
            })
        })
        .map(DiagnosisChange::Diagnoses)
    }

    /// Removes `id` and closes the gap it leaves in `order`.
    pub fn remove(&self, id: EntityId) -> EditorResult<DiagnosisChange> {
        let remaining = without(&self.slice.diagnoses, id, SectionId::Diagnosis)?;
        Ok(DiagnosisChange::Diagnoses(renumbered(remaining)))
    }

    /// Moves `id` to 1-based `position` (clamped to the list) and renumbers.
    pub fn move_to(&self, id: EntityId, position: u32) -> EditorResult<DiagnosisChange> {
        let mut diagnoses = self.slice.diagnoses.clone();
        let from = diagnoses
            .iter()
            .position(|d| d.id == id)
            .ok_or(EditorError::UnknownId {
                section: SectionId::Diagnosis,
                id,
            })?;

        let entry = diagnoses.remove(from);
        let to = (position.max(1) as usize - 1).min(diagnoses.len());
        diagnoses.insert(to, entry);
        Ok(DiagnosisChange::Diagnoses(renumbered(diagnoses)))
    }
}

fn next_order(diagnoses: &[Diagnosis]) -> u32 {
    u32::try_from(diagnoses.len()).map_or(u32::MAX, |len| len.saturating_add(1))
}

fn created(draft: DiagnosisDraft, order: u32, stamp: &AuditStamp) -> Diagnosis {
    Diagnosis {
        id: EntityId::new(),
        name: draft.name,
        code: draft.code,
        kind: draft.kind,
        certainty: draft.certainty,
        severity: draft.severity,
        onset_date: draft.onset_date,
        status: draft.status,
        reasoning: draft.reasoning,
        order,
        created_by: stamp.by.clone(),
        created_at: stamp.at,
        modified_by: None,
        modified_at: None,
    }
}

fn renumbered(diagnoses: Vec<Diagnosis>) -> Vec<Diagnosis> {
    diagnoses
        .into_iter()
        .zip(1..)
        .map(|(diagnosis, order)| Diagnosis { order, ..diagnosis })
        .collect()
}
