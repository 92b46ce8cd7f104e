//! Orders slice: medications, investigation orders, general instructions.

use hims_types::NonEmptyText;
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrdersSlice {
    pub medications: Vec<MedicationOrder>,
    pub investigation_orders: Vec<InvestigationOrder>,
    pub general_instructions: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationOrder {
    pub id: EntityId,
    pub name: NonEmptyText,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub instructions: String,
}

/// Kind of investigation, shared by orders and the investigation tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestigationKind {
    Laboratory,
    Imaging,
    Pathology,
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    Routine,
    Urgent,
    Stat,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationOrder {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: InvestigationKind,
    pub name: NonEmptyText,
    #[serde(default)]
    pub urgency: Priority,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum OrdersChange {
    Medications(Vec<MedicationOrder>),
    InvestigationOrders(Vec<InvestigationOrder>),
    GeneralInstructions(String),
}

impl OrdersChange {
    pub const FIELDS: &'static [&'static str] =
        &["medications", "investigationOrders", "generalInstructions"];
}

impl OrdersSlice {
    pub fn with_change(self, change: OrdersChange) -> Self {
        match change {
            OrdersChange::Medications(medications) => Self {
                medications,
                ..self
            },
            OrdersChange::InvestigationOrders(investigation_orders) => Self {
                investigation_orders,
                ..self
            },
            OrdersChange::GeneralInstructions(general_instructions) => Self {
                general_instructions,
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medication_defaults_optional_text() {
        let order: MedicationOrder = serde_json::from_value(serde_json::json!({
            "id": "550e8400e29b41d4a716446655440000",
            "name": "Ibuprofen"
        }))
        .unwrap();
        assert!(order.dosage.is_empty());
        assert_eq!(order.name, "Ibuprofen");
    }

    #[test]
    fn investigation_order_uses_type_on_the_wire() {
        let order = InvestigationOrder {
            id: EntityId::new(),
            kind: InvestigationKind::Imaging,
            name: NonEmptyText::new("Head CT").unwrap(),
            urgency: Priority::Urgent,
            instructions: String::new(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], "imaging");
        assert_eq!(json["urgency"], "urgent");
    }
}
