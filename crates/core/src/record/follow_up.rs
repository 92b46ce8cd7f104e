//! Follow-up slice: plan, next appointment, review flags, patient guidance, contacts.

use chrono::{DateTime, Duration, Months, Utc};
use hims_types::NonEmptyText;
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowUpSlice {
    pub plan: String,
    pub next_appointment: Option<DateTime<Utc>>,
    pub channel: Option<Channel>,
    pub interval: Option<FollowUpInterval>,
    pub review: ReviewFlags,
    pub warning_signs: Vec<String>,
    pub lifestyle_recommendations: Vec<String>,
    pub emergency_contacts: Vec<EmergencyContact>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    InPerson,
    Phone,
    Video,
    Message,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpInterval {
    pub value: u32,
    pub unit: IntervalUnit,
}

impl FollowUpInterval {
    /// The instant one interval after `from`. `None` on calendar overflow.
    pub fn due_after(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.unit {
            IntervalUnit::Days => from.checked_add_signed(Duration::days(i64::from(self.value))),
            IntervalUnit::Weeks => from.checked_add_signed(Duration::weeks(i64::from(self.value))),
            IntervalUnit::Months => from.checked_add_months(Months::new(self.value)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewFlags {
    pub lab_results: bool,
    pub medication: bool,
    pub imaging: bool,
    pub specialist_referral: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub id: EntityId,
    pub name: NonEmptyText,
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FollowUpChange {
    Plan(String),
    NextAppointment(Option<DateTime<Utc>>),
    Channel(Option<Channel>),
    Interval(Option<FollowUpInterval>),
    Review(ReviewFlags),
    WarningSigns(Vec<String>),
    LifestyleRecommendations(Vec<String>),
    EmergencyContacts(Vec<EmergencyContact>),
}

impl FollowUpChange {
    pub const FIELDS: &'static [&'static str] = &[
        "plan",
        "nextAppointment",
        "channel",
        "interval",
        "review",
        "warningSigns",
        "lifestyleRecommendations",
        "emergencyContacts",
    ];
}

impl FollowUpSlice {
    pub fn with_change(self, change: FollowUpChange) -> Self {
        match change {
            FollowUpChange::Plan(plan) => Self { plan, ..self },
            FollowUpChange::NextAppointment(next_appointment) => Self {
                next_appointment,
                ..self
            },
            FollowUpChange::Channel(channel) => Self { channel, ..self },
            FollowUpChange::Interval(interval) => Self { interval, ..self },
            FollowUpChange::Review(review) => Self { review, ..self },
            FollowUpChange::WarningSigns(warning_signs) => Self {
                warning_signs,
                ..self
            },
            FollowUpChange::LifestyleRecommendations(lifestyle_recommendations) => Self {
                lifestyle_recommendations,
                ..self
            },
            FollowUpChange::EmergencyContacts(emergency_contacts) => Self {
                emergency_contacts,
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn interval_due_dates() {
        let from = Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap();
        let days = FollowUpInterval {
            value: 3,
            unit: IntervalUnit::Days,
        };
        let weeks = FollowUpInterval {
            value: 2,
            unit: IntervalUnit::Weeks,
        };
        let months = FollowUpInterval {
            value: 1,
            unit: IntervalUnit::Months,
        };
        assert_eq!(
            days.due_after(from),
            Some(Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap())
        );
        assert_eq!(
            weeks.due_after(from),
            Some(Utc.with_ymd_and_hms(2026, 2, 14, 9, 0, 0).unwrap())
        );
        // Clamped to the end of February.
        assert_eq!(
            months.due_after(from),
            Some(Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn null_next_appointment_clears_it() {
        let slice = FollowUpSlice {
            next_appointment: Some(Utc::now()),
            ..FollowUpSlice::default()
        };
        let change: FollowUpChange =
            serde_json::from_value(serde_json::json!({"field": "nextAppointment", "value": null}))
                .unwrap();
        assert_eq!(slice.with_change(change).next_appointment, None);
    }
}
