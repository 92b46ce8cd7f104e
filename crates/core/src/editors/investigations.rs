use super::{with_updated, without};
use crate::error::{EditorError, EditorResult};
use crate::record::investigations::{
    Attachment, Investigation, InvestigationResult, InvestigationStatus, InvestigationsChange,
    InvestigationsSlice, ResultParameter, ResultStatus,
};
use crate::record::orders::{InvestigationKind, InvestigationOrder, Priority};
use crate::record::SectionId;
use chrono::{DateTime, Utc};
use hims_types::NonEmptyText;
use hims_uuid::EntityId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvestigationDraft {
    pub kind: InvestigationKind,
    pub name: NonEmptyText,
    pub priority: Priority,
    pub notes: String,
}

impl From<&InvestigationOrder> for InvestigationDraft {
    fn from(order: &InvestigationOrder) -> Self {
        Self {
            kind: order.kind,
            name: order.name.clone(),
            priority: order.urgency,
            notes: order.instructions.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultDraft {
    pub status: ResultStatus,
    pub parameters: Vec<ResultParameter>,
    pub summary: String,
}

/// Tracks investigations through their status lifecycle.
pub struct InvestigationsEditor<'a> {
    slice: &'a InvestigationsSlice,
}

impl<'a> InvestigationsEditor<'a> {
    pub fn new(slice: &'a InvestigationsSlice) -> Self {
        Self { slice }
    }

    /// Starts tracking an investigation in the `ordered` state.
    pub fn order(&self, draft: InvestigationDraft, now: DateTime<Utc>) -> InvestigationsChange {
        let mut investigations = self.slice.investigations.clone();
        investigations.push(Investigation {
            id: EntityId::new(),
            kind: draft.kind,
            name: draft.name,
            status: InvestigationStatus::Ordered,
            priority: draft.priority,
            ordered_at: now,
            scheduled_for: None,
            notes: draft.notes,
            result: None,
        });
        InvestigationsChange::Investigations(investigations)
    }

    pub fn schedule(&self, id: EntityId, at: DateTime<Utc>) -> EditorResult<InvestigationsChange> {
        self.update(id, |investigation| {
            let investigation = advanced(investigation, InvestigationStatus::Scheduled)?;
            Ok(Investigation {
                scheduled_for: Some(at),
                ..investigation
            })
        })
    }

    /// Moves `id` to `next`, which must be the legal successor of its current status.
    pub fn transition(
        &self,
        id: EntityId,
        next: InvestigationStatus,
    ) -> EditorResult<InvestigationsChange> {
        self.update(id, |investigation| advanced(investigation, next))
    }

    /// Records the result of a completed investigation and marks it reported.
    pub fn record_result(
        &self,
        id: EntityId,
        draft: ResultDraft,
        now: DateTime<Utc>,
    ) -> EditorResult<InvestigationsChange> {
        self.update(id, |investigation| {
            if investigation.status != InvestigationStatus::Completed {
                return Err(EditorError::IllegalTransition {
                    from: investigation.status,
                    to: InvestigationStatus::Reported,
                });
            }
            let investigation = advanced(investigation, InvestigationStatus::Reported)?;
            Ok(Investigation {
                result: Some(InvestigationResult {
                    status: draft.status,
                    parameters: draft.parameters,
                    attachments: Vec::new(),
                    summary: draft.summary,
                    reported_at: Some(now),
                }),
                ..investigation
            })
        })
    }

    /// Appends an uploaded file to the result of `id`.
    ///
    /// Call this with the slice as it is when the upload resolves, not as it was when the upload
    /// started.
    pub fn attach(&self, id: EntityId, attachment: Attachment) -> EditorResult<InvestigationsChange> {
        self.update(id, |mut investigation| {
            let result = investigation
                .result
                .as_mut()
                .ok_or(EditorError::NoResult(id))?;
            result.attachments.push(attachment);
            Ok(investigation)
        })
    }

    pub fn detach(&self, id: EntityId, attachment_id: EntityId) -> EditorResult<InvestigationsChange> {
        self.update(id, |mut investigation| {
            let result = investigation
                .result
                .as_mut()
                .ok_or(EditorError::NoResult(id))?;
            let before = result.attachments.len();
            result.attachments.retain(|a| a.id != attachment_id);
            if result.attachments.len() == before {
                return Err(EditorError::UnknownId {
                    section: SectionId::Investigations,
                    id: attachment_id,
                });
            }
            Ok(investigation)
        })
    }

    pub fn set_notes(&self, id: EntityId, notes: impl Into<String>) -> EditorResult<InvestigationsChange> {
        let notes = notes.into();
        self.update(id, |investigation| Ok(Investigation { notes, ..investigation }))
    }

    pub fn remove(&self, id: EntityId) -> EditorResult<InvestigationsChange> {
        without(&self.slice.investigations, id, SectionId::Investigations)
            .map(InvestigationsChange::Investigations)
    }

    fn update(
        &self,
        id: EntityId,
        update: impl FnOnce(Investigation) -> EditorResult<Investigation>,
    ) -> EditorResult<InvestigationsChange> {
        with_updated(
            &self.slice.investigations,
            id,
            SectionId::Investigations,
            update,
        )
        .map(InvestigationsChange::Investigations)
    }
}

fn advanced(investigation: Investigation, next: InvestigationStatus) -> EditorResult<Investigation> {
    if !investigation.status.can_transition_to(next) {
        return Err(EditorError::IllegalTransition {
            from: investigation.status,
            to: next,
        });
    }
    Ok(Investigation {
        status: next,
        ..investigation
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::investigations::ParameterFlag;

    fn draft() -> InvestigationDraft {
        InvestigationDraft {
            kind: InvestigationKind::Laboratory,
            name: NonEmptyText::new("Full blood count").unwrap(),
            priority: Priority::Urgent,
            notes: String::new(),
        }
    }

    fn step(
        slice: InvestigationsSlice,
        edit: impl FnOnce(&InvestigationsEditor<'_>) -> EditorResult<InvestigationsChange>,
    ) -> EditorResult<InvestigationsSlice> {
        let change = edit(&InvestigationsEditor::new(&slice))?;
        Ok(slice.with_change(change))
    }

    fn result() -> ResultDraft {
        ResultDraft {
            status: ResultStatus::Abnormal,
            parameters: vec![ResultParameter {
                name: "WBC".into(),
                value: "14.2".into(),
                unit: "10^9/L".into(),
                reference_range: "4.0-10.0".into(),
                flag: Some(ParameterFlag::High),
            }],
            summary: "Leukocytosis".into(),
        }
    }

    fn ordered() -> (InvestigationsSlice, EntityId) {
        let slice = InvestigationsSlice::default();
        let slice = slice
            .clone()
            .with_change(InvestigationsEditor::new(&slice).order(draft(), Utc::now()));
        let id = slice.investigations[0].id;
        (slice, id)
    }

    #[test]
    fn full_lifecycle_to_reported() {
        let (slice, id) = ordered();
        let when = Utc::now();
        let slice = step(slice, |e| e.schedule(id, when)).unwrap();
        assert_eq!(slice.investigations[0].scheduled_for, Some(when));

        let slice = step(slice, |e| e.transition(id, InvestigationStatus::InProgress)).unwrap();
        let slice = step(slice, |e| e.transition(id, InvestigationStatus::Completed)).unwrap();
        let slice = step(slice, |e| e.record_result(id, result(), Utc::now())).unwrap();

        let investigation = slice.get(id).unwrap();
        assert_eq!(investigation.status, InvestigationStatus::Reported);
        let result = investigation.result.as_ref().unwrap();
        assert_eq!(result.summary, "Leukocytosis");
        assert!(result.reported_at.is_some());
    }

    #[test]
    fn skipping_a_step_is_rejected() {
        let (slice, id) = ordered();
        let editor = InvestigationsEditor::new(&slice);
        assert_eq!(
            editor.transition(id, InvestigationStatus::Completed).unwrap_err(),
            EditorError::IllegalTransition {
                from: InvestigationStatus::Ordered,
                to: InvestigationStatus::Completed,
            }
        );
        assert!(matches!(
            editor.record_result(id, result(), Utc::now()),
            Err(EditorError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn cancelled_investigation_cannot_take_a_result() {
        let (slice, id) = ordered();
        let slice = step(slice, |e| e.schedule(id, Utc::now())).unwrap();
        let slice = step(slice, |e| e.transition(id, InvestigationStatus::InProgress)).unwrap();
        let slice = step(slice, |e| e.transition(id, InvestigationStatus::Cancelled)).unwrap();

        let err = step(slice, |e| e.record_result(id, result(), Utc::now())).unwrap_err();
        assert_eq!(
            err,
            EditorError::IllegalTransition {
                from: InvestigationStatus::Cancelled,
                to: InvestigationStatus::Reported,
            }
        );
    }

    #[test]
    fn attachments_need_a_result_and_stack_up() {
        let (slice, id) = ordered();
        let attachment = |name: &str| Attachment {
            id: EntityId::new(),
            url: format!("https://files.example/{name}"),
            file_name: name.into(),
            media_type: "image/png".into(),
        };

        assert_eq!(
            InvestigationsEditor::new(&slice)
                .attach(id, attachment("early.png"))
                .unwrap_err(),
            EditorError::NoResult(id)
        );

        let slice = step(slice, |e| e.schedule(id, Utc::now())).unwrap();
        let slice = step(slice, |e| e.transition(id, InvestigationStatus::InProgress)).unwrap();
        let slice = step(slice, |e| e.transition(id, InvestigationStatus::Completed)).unwrap();
        let slice = step(slice, |e| e.record_result(id, result(), Utc::now())).unwrap();

        // Two uploads resolving one after the other, each against the slice current at the time.
        let slice = step(slice, |e| e.attach(id, attachment("a.png"))).unwrap();
        let slice = step(slice, |e| e.attach(id, attachment("b.png"))).unwrap();
        let attachments = &slice.get(id).unwrap().result.as_ref().unwrap().attachments;
        let names: Vec<&str> = attachments.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let first = attachments[0].id;
        let slice = step(slice, |e| e.detach(id, first)).unwrap();
        assert_eq!(slice.get(id).unwrap().result.as_ref().unwrap().attachments.len(), 1);
        assert!(step(slice, |e| e.detach(id, first)).is_err());
    }

    #[test]
    fn draft_from_order_carries_kind_and_urgency() {
        let order = InvestigationOrder {
            id: EntityId::new(),
            kind: InvestigationKind::Imaging,
            name: NonEmptyText::new("Chest X-ray").unwrap(),
            urgency: Priority::Stat,
            instructions: "PA view".into(),
        };
        let draft = InvestigationDraft::from(&order);
        assert_eq!(draft.kind, InvestigationKind::Imaging);
        assert_eq!(draft.priority, Priority::Stat);
        assert_eq!(draft.notes, "PA view");
    }
}
