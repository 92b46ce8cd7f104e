//! History slice: narrative history, family members, symptom tags, social history.

use chrono::NaiveDate;
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySlice {
    pub present_illness: String,
    pub past_history: String,
    pub family_history: String,
    pub family_members: Vec<FamilyMember>,
    pub symptom_tags: Vec<String>,
    pub social_history: SocialHistory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: EntityId,
    pub relation: String,
    pub condition: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialHistory {
    pub occupation: String,
    pub smoking: String,
    pub alcohol: String,
    pub marital_status: String,
    pub diet: String,
    pub exercise: String,
    pub sleep: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menstrual_history: Option<MenstrualHistory>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenstrualHistory {
    pub menarche_age: Option<u8>,
    pub cycle_days: Option<u8>,
    pub period_days: Option<u8>,
    pub last_period: Option<NaiveDate>,
    pub menopausal: bool,
}

/// Field-level change to the history slice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum HistoryChange {
    PresentIllness(String),
    PastHistory(String),
    FamilyHistory(String),
    FamilyMembers(Vec<FamilyMember>),
    SymptomTags(Vec<String>),
    SocialHistory(SocialHistory),
}

impl HistoryChange {
    pub const FIELDS: &'static [&'static str] = &[
        "presentIllness",
        "pastHistory",
        "familyHistory",
        "familyMembers",
        "symptomTags",
        "socialHistory",
    ];
}

impl HistorySlice {
    pub fn with_change(self, change: HistoryChange) -> Self {
        match change {
            HistoryChange::PresentIllness(present_illness) => Self {
                present_illness,
                ..self
            },
            HistoryChange::PastHistory(past_history) => Self {
                past_history,
                ..self
            },
            HistoryChange::FamilyHistory(family_history) => Self {
                family_history,
                ..self
            },
            HistoryChange::FamilyMembers(family_members) => Self {
                family_members,
                ..self
            },
            HistoryChange::SymptomTags(symptom_tags) => Self {
                symptom_tags,
                ..self
            },
            HistoryChange::SocialHistory(social_history) => Self {
                social_history,
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_wire_form_is_field_and_value() {
        let change = HistoryChange::PresentIllness("头痛三天".into());
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json, serde_json::json!({"field": "presentIllness", "value": "头痛三天"}));
    }

    #[test]
    fn fields_list_matches_variants() {
        let samples = [
            HistoryChange::PresentIllness(String::new()),
            HistoryChange::PastHistory(String::new()),
            HistoryChange::FamilyHistory(String::new()),
            HistoryChange::FamilyMembers(vec![]),
            HistoryChange::SymptomTags(vec![]),
            HistoryChange::SocialHistory(SocialHistory::default()),
        ];
        let names: Vec<String> = samples
            .iter()
            .map(|c| serde_json::to_value(c).unwrap()["field"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, HistoryChange::FIELDS);
    }

    #[test]
    fn with_change_replaces_collections_wholesale() {
        let slice = HistorySlice {
            symptom_tags: vec!["fever".into(), "cough".into()],
            past_history: "appendectomy 2010".into(),
            ..HistorySlice::default()
        };
        let next = slice.with_change(HistoryChange::SymptomTags(vec!["rash".into()]));
        assert_eq!(next.symptom_tags, vec!["rash".to_owned()]);
        assert_eq!(next.past_history, "appendectomy 2010");
    }
}
