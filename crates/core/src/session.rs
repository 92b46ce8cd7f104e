//! The encounter session: one operator, one patient, one consultation record at a time.
//!
//! ```text
//! Empty ──start──▶ Seeded ──change──▶ Dirty ◀──change── Saved
//!                                       │ ──save──────────▶ │
//!                                       └──complete──▶ Completed
//! ```
//!
//! `Completed` is terminal: the patient is deselected and the record dropped. A fresh session
//! is needed for the next encounter.

use crate::change::SectionChange;
use crate::error::{EditorResult, EncounterError, EncounterResult};
use crate::patient::{Patient, PatientRef};
use crate::record::history::HistoryChange;
use crate::record::{ConsultationRecord, SectionId};
use crate::store::{EncounterDocument, EncounterStore};
use crate::validation::{advisories, Advisory, ValidationGate};
use chrono::{DateTime, Utc};
use hims_uuid::EncounterId;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// No patient selected.
    Empty,
    /// Patient selected, record seeded, nothing edited yet.
    Seeded,
    /// Edited since the last save.
    Dirty,
    Saved,
    Completed,
}

struct ActiveEncounter {
    id: EncounterId,
    patient: Patient,
    record: ConsultationRecord,
}

/// Owns the active patient and consultation record for one operator.
pub struct EncounterSession {
    store: Arc<dyn EncounterStore>,
    gate: ValidationGate,
    author: String,
    state: SessionState,
    active: Option<ActiveEncounter>,
    last_encounter: Option<EncounterId>,
}

impl EncounterSession {
    /// `author` is the display name stamped on saved documents.
    pub fn new(store: Arc<dyn EncounterStore>, author: impl Into<String>) -> Self {
        Self {
            store,
            gate: ValidationGate::standard(),
            author: author.into(),
            state: SessionState::Empty,
            active: None,
            last_encounter: None,
        }
    }

    pub fn with_gate(self, gate: ValidationGate) -> Self {
        Self { gate, ..self }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn gate(&self) -> &ValidationGate {
        &self.gate
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.active.as_ref().map(|a| &a.patient)
    }

    pub fn record(&self) -> Option<&ConsultationRecord> {
        self.active.as_ref().map(|a| &a.record)
    }

    pub fn encounter_id(&self) -> Option<&EncounterId> {
        self.active.as_ref().map(|a| &a.id)
    }

    /// Selects `patient` and seeds a fresh record from its summary.
    ///
    /// `None` does nothing. Any encounter already open is torn down first and its unsaved
    /// edits are lost.
    pub fn start(&mut self, patient: Option<Patient>) -> EncounterResult<()> {
        let Some(patient) = patient else {
            tracing::debug!("start without a patient ignored");
            return Ok(());
        };
        if self.state == SessionState::Completed {
            return Err(EncounterError::SessionCompleted);
        }

        self.close();

        let id = EncounterId::generate(self.last_encounter.as_ref());
        let record = seeded_record(&patient);
        tracing::info!(encounter_id = %id, patient_id = %patient.id, "encounter started");

        self.last_encounter = Some(id.clone());
        self.active = Some(ActiveEncounter {
            id,
            patient,
            record,
        });
        self.state = SessionState::Seeded;
        Ok(())
    }

    /// Drops the open encounter without completing it.
    pub fn close(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if self.state == SessionState::Dirty {
            tracing::warn!(encounter_id = %active.id, "discarding unsaved encounter changes");
        } else {
            tracing::info!(encounter_id = %active.id, "encounter closed");
        }
        self.state = SessionState::Empty;
    }

    /// Merges `change` into the slice it names and marks the session dirty.
    pub fn apply_change(&mut self, change: SectionChange) -> EncounterResult<()> {
        let section = change.section();
        let active = self.active_mut()?;
        let record = std::mem::take(&mut active.record);
        active.record = record.apply(change);
        self.state = SessionState::Dirty;
        tracing::debug!(%section, "record changed");
        Ok(())
    }

    /// [`apply_change`](Self::apply_change) for an untyped `(section, field, value)` triple.
    pub fn apply_raw(
        &mut self,
        section: SectionId,
        field: &str,
        value: serde_json::Value,
    ) -> EncounterResult<()> {
        let change = SectionChange::from_parts(section, field, value)?;
        self.apply_change(change)
    }

    /// Runs an editor against the record as it is now and applies what it returns.
    pub fn edit<C: Into<SectionChange>>(
        &mut self,
        edit: impl FnOnce(&ConsultationRecord) -> EditorResult<C>,
    ) -> EncounterResult<()> {
        let change = edit(&self.active_ref()?.record)?;
        self.apply_change(change.into())
    }

    /// Writes the chief complaint to the patient summary and the present illness together.
    pub fn update_chief_complaint(&mut self, text: &str) -> EncounterResult<()> {
        let active = self.active_mut()?;
        active.patient.chief_complaint = Some(text.to_owned());
        let record = std::mem::take(&mut active.record);
        active.record = record.apply(HistoryChange::PresentIllness(text.to_owned()).into());
        self.state = SessionState::Dirty;
        Ok(())
    }

    /// Persists the draft if anything changed since the last save.
    ///
    /// Returns whether a write happened. A failed write leaves the session dirty.
    pub fn save(&mut self) -> EncounterResult<bool> {
        match self.state {
            SessionState::Dirty => {}
            SessionState::Completed => return Err(EncounterError::SessionCompleted),
            SessionState::Empty | SessionState::Seeded | SessionState::Saved => return Ok(false),
        }

        let document = self.document(None)?;
        self.store.save_draft(&document)?;
        self.state = SessionState::Saved;
        tracing::info!(encounter_id = %document.encounter_id, "encounter draft saved");
        Ok(true)
    }

    /// Validates, saves, and commits the encounter, then ends the session.
    ///
    /// On a validation failure nothing changes and the first failing rule is returned. A failed
    /// commit leaves the session open.
    pub fn complete(&mut self) -> EncounterResult<EncounterDocument> {
        let active = self.active_ref()?;
        if let Err(failure) = self.gate.evaluate(&active.record) {
            tracing::warn!(
                encounter_id = %active.id,
                rule = failure.rule_id,
                section = %failure.section,
                "encounter completion blocked"
            );
            return Err(failure.into());
        }

        self.save()?;
        let document = self.document(Some(Utc::now()))?;
        self.store.commit(&document)?;

        self.active = None;
        self.state = SessionState::Completed;
        tracing::info!(encounter_id = %document.encounter_id, "encounter completed");
        Ok(document)
    }

    /// Non-blocking completeness signals for the open record.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.record().map(advisories).unwrap_or_default()
    }

    fn active_ref(&self) -> EncounterResult<&ActiveEncounter> {
        if self.state == SessionState::Completed {
            return Err(EncounterError::SessionCompleted);
        }
        self.active.as_ref().ok_or(EncounterError::NoActiveEncounter)
    }

    fn active_mut(&mut self) -> EncounterResult<&mut ActiveEncounter> {
        if self.state == SessionState::Completed {
            return Err(EncounterError::SessionCompleted);
        }
        self.active.as_mut().ok_or(EncounterError::NoActiveEncounter)
    }

    fn document(&self, completed_at: Option<DateTime<Utc>>) -> EncounterResult<EncounterDocument> {
        let active = self.active_ref()?;
        Ok(EncounterDocument {
            encounter_id: active.id.clone(),
            patient: PatientRef::from(&active.patient),
            record: active.record.clone(),
            author: self.author.clone(),
            saved_at: Utc::now(),
            completed_at,
        })
    }
}

fn seeded_record(patient: &Patient) -> ConsultationRecord {
    let mut record = ConsultationRecord::default();
    record.history.present_illness = patient.chief_complaint.clone().unwrap_or_default();
    record.examination.vital_signs = patient
        .vital_signs
        .clone()
        .map(|vitals| vitals.with_derived_bmi());
    record
}
