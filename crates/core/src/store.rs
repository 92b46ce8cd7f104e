//! Persistence seam for encounter documents.
//!
//! Only an in-memory implementation ships with this crate. Durable storage is provided by
//! whatever implements [`EncounterStore`] at the deployment boundary.

use crate::patient::PatientRef;
use crate::record::ConsultationRecord;
use chrono::{DateTime, Utc};
use hims_uuid::EncounterId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The persisted shape of an encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterDocument {
    pub encounter_id: EncounterId,
    pub patient: PatientRef,
    pub record: ConsultationRecord,
    /// Display name of the operator who authored the encounter.
    pub author: String,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("encounter store unavailable: {0}")]
    Unavailable(String),
    #[error("encounter {0} is already completed")]
    AlreadyCompleted(String),
    #[error("completed document for {0} has no completion timestamp")]
    MissingCompletion(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Where drafts and completed encounters go.
pub trait EncounterStore: Send + Sync {
    /// Writes (or overwrites) the draft for `document.encounter_id`.
    fn save_draft(&self, document: &EncounterDocument) -> StoreResult<()>;

    /// Writes the final document. `document.completed_at` is always set.
    fn commit(&self, document: &EncounterDocument) -> StoreResult<()>;
}

#[derive(Default)]
struct Inner {
    drafts: HashMap<String, EncounterDocument>,
    completed: BTreeMap<String, EncounterDocument>,
    draft_writes: usize,
}

/// Process-local store. Completed encounters are kept in id (and therefore time) order.
#[derive(Default)]
pub struct InMemoryEncounterStore {
    inner: Mutex<Inner>,
}

impl InMemoryEncounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn draft(&self, id: &EncounterId) -> Option<EncounterDocument> {
        self.lock().drafts.get(&id.to_string()).cloned()
    }

    pub fn completed(&self, id: &EncounterId) -> Option<EncounterDocument> {
        self.lock().completed.get(&id.to_string()).cloned()
    }

    pub fn completed_documents(&self) -> Vec<EncounterDocument> {
        self.lock().completed.values().cloned().collect()
    }

    /// Number of successful draft writes since the store was created.
    pub fn draft_writes(&self) -> usize {
        self.lock().draft_writes
    }
}

impl EncounterStore for InMemoryEncounterStore {
    fn save_draft(&self, document: &EncounterDocument) -> StoreResult<()> {
        let key = document.encounter_id.to_string();
        let mut inner = self.lock();
        if inner.completed.contains_key(&key) {
            return Err(StoreError::AlreadyCompleted(key));
        }
        inner.drafts.insert(key, document.clone());
        inner.draft_writes += 1;
        Ok(())
    }

    fn commit(&self, document: &EncounterDocument) -> StoreResult<()> {
        let key = document.encounter_id.to_string();
        if document.completed_at.is_none() {
            return Err(StoreError::MissingCompletion(key));
        }
        let mut inner = self.lock();
        if inner.completed.contains_key(&key) {
            return Err(StoreError::AlreadyCompleted(key));
        }
        inner.drafts.remove(&key);
        inner.completed.insert(key, document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hims_types::NonEmptyText;

    fn document(previous: Option<&EncounterId>) -> EncounterDocument {
        EncounterDocument {
            encounter_id: EncounterId::generate(previous),
            patient: PatientRef {
                id: NonEmptyText::new("P-0001").unwrap(),
                name: NonEmptyText::new("张伟").unwrap(),
            },
            record: ConsultationRecord::default(),
            author: "Dr Li Wei".into(),
            saved_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn drafts_overwrite_and_commit_moves_to_completed() {
        let store = InMemoryEncounterStore::new();
        let mut doc = document(None);

        store.save_draft(&doc).unwrap();
        store.save_draft(&doc).unwrap();
        assert_eq!(store.draft_writes(), 2);
        assert!(store.draft(&doc.encounter_id).is_some());

        assert_eq!(
            store.commit(&doc).unwrap_err(),
            StoreError::MissingCompletion(doc.encounter_id.to_string())
        );

        doc.completed_at = Some(Utc::now());
        store.commit(&doc).unwrap();
        assert!(store.draft(&doc.encounter_id).is_none());
        assert_eq!(store.completed(&doc.encounter_id), Some(doc.clone()));

        assert!(matches!(store.commit(&doc), Err(StoreError::AlreadyCompleted(_))));
        assert!(matches!(store.save_draft(&doc), Err(StoreError::AlreadyCompleted(_))));
    }

    #[test]
    fn completed_documents_are_time_ordered() {
        let store = InMemoryEncounterStore::new();
        let mut first = document(None);
        let mut second = document(Some(&first.encounter_id));
        first.completed_at = Some(Utc::now());
        second.completed_at = Some(Utc::now());

        store.commit(&second).unwrap();
        store.commit(&first).unwrap();

        let ids: Vec<EncounterId> = store
            .completed_documents()
            .into_iter()
            .map(|d| d.encounter_id)
            .collect();
        assert_eq!(ids, vec![first.encounter_id, second.encounter_id]);
    }

    #[test]
    fn document_serialises_camel_case() {
        let doc = document(None);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("encounterId").is_some());
        assert!(json.get("savedAt").is_some());
        assert!(json.get("completedAt").is_none());
        assert_eq!(json["record"]["history"]["presentIllness"], "");
    }
}
