use super::without;
use crate::error::{EditorError, EditorResult};
use crate::record::follow_up::{
    Channel, EmergencyContact, FollowUpChange, FollowUpInterval, FollowUpSlice, IntervalUnit,
    ReviewFlags,
};
use crate::record::SectionId;
use chrono::{DateTime, Utc};
use hims_types::{normalise_entry, NonEmptyText};
use hims_uuid::EntityId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmergencyContactDraft {
    pub name: NonEmptyText,
    pub relation: String,
    pub phone: String,
}

pub struct FollowUpEditor<'a> {
    slice: &'a FollowUpSlice,
}

impl<'a> FollowUpEditor<'a> {
    pub fn new(slice: &'a FollowUpSlice) -> Self {
        Self { slice }
    }

    pub fn set_plan(&self, text: impl Into<String>) -> FollowUpChange {
        FollowUpChange::Plan(text.into())
    }

    pub fn set_next_appointment(&self, at: Option<DateTime<Utc>>) -> FollowUpChange {
        FollowUpChange::NextAppointment(at)
    }

    pub fn set_channel(&self, channel: Option<Channel>) -> FollowUpChange {
        FollowUpChange::Channel(channel)
    }

    pub fn set_interval(&self, value: u32, unit: IntervalUnit) -> EditorResult<FollowUpChange> {
        if value == 0 {
            return Err(EditorError::OutOfRange {
                field: "interval",
                value: 0.0,
            });
        }
        Ok(FollowUpChange::Interval(Some(FollowUpInterval { value, unit })))
    }

    pub fn clear_interval(&self) -> FollowUpChange {
        FollowUpChange::Interval(None)
    }

    /// Sets the next appointment one interval after `from`.
    pub fn schedule_from_interval(&self, from: DateTime<Utc>) -> EditorResult<FollowUpChange> {
        let interval = self.slice.interval.ok_or(EditorError::BlankEntry("interval"))?;
        let due = interval.due_after(from).ok_or(EditorError::OutOfRange {
            field: "interval",
            value: f64::from(interval.value),
        })?;
        Ok(FollowUpChange::NextAppointment(Some(due)))
    }

    pub fn set_review(&self, review: ReviewFlags) -> FollowUpChange {
        FollowUpChange::Review(review)
    }

    pub fn add_warning_sign(&self, text: &str) -> EditorResult<FollowUpChange> {
        appended(&self.slice.warning_signs, text, "warning sign").map(FollowUpChange::WarningSigns)
    }

    pub fn remove_warning_sign(&self, text: &str) -> FollowUpChange {
        FollowUpChange::WarningSigns(removed(&self.slice.warning_signs, text))
    }

    pub fn add_lifestyle_recommendation(&self, text: &str) -> EditorResult<FollowUpChange> {
        appended(
            &self.slice.lifestyle_recommendations,
            text,
            "lifestyle recommendation",
        )
        .map(FollowUpChange::LifestyleRecommendations)
    }

    pub fn remove_lifestyle_recommendation(&self, text: &str) -> FollowUpChange {
        FollowUpChange::LifestyleRecommendations(removed(
            &self.slice.lifestyle_recommendations,
            text,
        ))
    }

    pub fn add_emergency_contact(&self, draft: EmergencyContactDraft) -> FollowUpChange {
        let mut contacts = self.slice.emergency_contacts.clone();
        contacts.push(EmergencyContact {
            id: EntityId::new(),
            name: draft.name,
            relation: draft.relation.trim().to_owned(),
            phone: draft.phone.trim().to_owned(),
        });
        FollowUpChange::EmergencyContacts(contacts)
    }

    pub fn remove_emergency_contact(&self, id: EntityId) -> EditorResult<FollowUpChange> {
        without(&self.slice.emergency_contacts, id, SectionId::FollowUp)
            .map(FollowUpChange::EmergencyContacts)
    }
}

fn appended(list: &[String], text: &str, what: &'static str) -> EditorResult<Vec<String>> {
    let entry = normalise_entry(text).ok_or(EditorError::BlankEntry(what))?;
    let mut next = list.to_vec();
    if !next.contains(&entry) {
        next.push(entry);
    }
    Ok(next)
}

fn removed(list: &[String], text: &str) -> Vec<String> {
    let text = text.trim();
    list.iter().filter(|entry| entry.as_str() != text).cloned().collect()
}
