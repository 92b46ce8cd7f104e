use super::{with_updated, without};
use crate::error::EditorResult;
use crate::record::orders::{
    InvestigationKind, InvestigationOrder, MedicationOrder, OrdersChange, OrdersSlice, Priority,
};
use crate::record::SectionId;
use hims_types::NonEmptyText;
use hims_uuid::EntityId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MedicationDraft {
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: String,
    pub instructions: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvestigationOrderDraft {
    pub kind: InvestigationKind,
    pub name: NonEmptyText,
    pub urgency: Priority,
    pub instructions: String,
}

pub struct OrdersEditor<'a> {
    slice: &'a OrdersSlice,
}

impl<'a> OrdersEditor<'a> {
    pub fn new(slice: &'a OrdersSlice) -> Self {
        Self { slice }
    }

    pub fn add_medication(&self, name: &str, draft: MedicationDraft) -> EditorResult<OrdersChange> {
        let mut medications = self.slice.medications.clone();
        medications.push(MedicationOrder {
            id: EntityId::new(),
            name: NonEmptyText::new(name)?,
            dosage: draft.dosage,
            frequency: draft.frequency,
            duration: draft.duration,
            route: draft.route,
            instructions: draft.instructions,
        });
        Ok(OrdersChange::Medications(medications))
    }

    /// Replaces the prescription details of `id`, keeping its name.
    pub fn update_medication(
        &self,
        id: EntityId,
        draft: MedicationDraft,
    ) -> EditorResult<OrdersChange> {
        with_updated(&self.slice.medications, id, SectionId::Orders, |existing| {
            Ok(MedicationOrder {
                dosage: draft.dosage,
                frequency: draft.frequency,
                duration: draft.duration,
                route: draft.route,
                instructions: draft.instructions,
                ..existing
            })
        })
        .map(OrdersChange::Medications)
    }

    pub fn remove_medication(&self, id: EntityId) -> EditorResult<OrdersChange> {
        without(&self.slice.medications, id, SectionId::Orders).map(OrdersChange::Medications)
    }

    pub fn add_investigation_order(&self, draft: InvestigationOrderDraft) -> OrdersChange {
        let mut orders = self.slice.investigation_orders.clone();
        orders.push(InvestigationOrder {
            id: EntityId::new(),
            kind: draft.kind,
            name: draft.name,
            urgency: draft.urgency,
            instructions: draft.instructions,
        });
        OrdersChange::InvestigationOrders(orders)
    }

    pub fn remove_investigation_order(&self, id: EntityId) -> EditorResult<OrdersChange> {
        without(&self.slice.investigation_orders, id, SectionId::Orders)
            .map(OrdersChange::InvestigationOrders)
    }

    pub fn set_general_instructions(&self, text: impl Into<String>) -> OrdersChange {
        OrdersChange::GeneralInstructions(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    #[test]
    fn medications_are_edited_by_id() {
        let slice = OrdersSlice::default();
        let draft = MedicationDraft {
            dosage: "400 mg".into(),
            frequency: "tid".into(),
            ..MedicationDraft::default()
        };
        let slice = slice
            .clone()
            .with_change(OrdersEditor::new(&slice).add_medication("Ibuprofen", draft).unwrap());
        let slice = slice.clone().with_change(
            OrdersEditor::new(&slice)
                .add_medication("Omeprazole", MedicationDraft::default())
                .unwrap(),
        );
        let ibuprofen = slice.medications[0].id;

        let slice = slice.clone().with_change(
            OrdersEditor::new(&slice)
                .update_medication(
                    ibuprofen,
                    MedicationDraft {
                        dosage: "200 mg".into(),
                        ..MedicationDraft::default()
                    },
                )
                .unwrap(),
        );
        assert_eq!(slice.medications[0].name, "Ibuprofen");
        assert_eq!(slice.medications[0].dosage, "200 mg");
        assert!(slice.medications[1].dosage.is_empty());

        let slice = slice
            .clone()
            .with_change(OrdersEditor::new(&slice).remove_medication(ibuprofen).unwrap());
        assert_eq!(slice.medications.len(), 1);
        assert_eq!(slice.medications[0].name, "Omeprazole");
    }

    #[test]
    fn blank_medication_name_is_rejected() {
        let slice = OrdersSlice::default();
        assert!(matches!(
            OrdersEditor::new(&slice).add_medication(" ", MedicationDraft::default()),
            Err(EditorError::Text(_))
        ));
    }

    #[test]
    fn investigation_orders_append_and_remove() {
        let slice = OrdersSlice::default();
        let change = OrdersEditor::new(&slice).add_investigation_order(InvestigationOrderDraft {
            kind: InvestigationKind::Laboratory,
            name: NonEmptyText::new("Full blood count").unwrap(),
            urgency: Priority::Routine,
            instructions: String::new(),
        });
        let slice = slice.clone().with_change(change);
        let id = slice.investigation_orders[0].id;

        let editor = OrdersEditor::new(&slice);
        assert!(editor.remove_investigation_order(EntityId::new()).is_err());
        assert_eq!(
            editor.remove_investigation_order(id).unwrap(),
            OrdersChange::InvestigationOrders(vec![])
        );
    }
}
