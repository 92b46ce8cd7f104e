//! Request and response bodies.
//!
//! Domain types are passed through as-is; their OpenAPI schema is left as a plain object.

use hims_access::{NavEntry, Role};
use hims_core::record::investigations::Attachment;
use hims_core::record::SectionId;
use hims_core::{Advisory, ConsultationRecord, EncounterSession, Patient, SessionState};
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
    /// Send back in the `x-session-token` header.
    pub token: String,
    pub username: String,
    pub display_name: String,
    #[schema(value_type = String)]
    pub role: Role,
    #[schema(value_type = Vec<Object>)]
    pub navigation: Vec<NavEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationRes {
    #[schema(value_type = String)]
    pub role: Role,
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<NavEntry>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartEncounterReq {
    /// Omitted or null leaves the session as it is.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub patient: Option<Patient>,
}

/// One `(section, field, value)` edit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeReq {
    #[schema(value_type = String, example = "history")]
    pub section: SectionId,
    #[schema(example = "presentIllness")]
    pub field: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChiefComplaintReq {
    pub text: String,
}

/// Snapshot of the caller's encounter session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncounterView {
    #[schema(value_type = String)]
    pub state: SessionState,
    pub dirty: bool,
    pub encounter_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub patient: Option<Patient>,
    #[schema(value_type = Option<Object>)]
    pub record: Option<ConsultationRecord>,
    #[schema(value_type = Vec<Object>)]
    pub advisories: Vec<Advisory>,
}

impl From<&EncounterSession> for EncounterView {
    fn from(session: &EncounterSession) -> Self {
        Self {
            state: session.state(),
            dirty: session.is_dirty(),
            encounter_id: session.encounter_id().map(ToString::to_string),
            patient: session.patient().cloned(),
            record: session.record().cloned(),
            advisories: session.advisories(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveRes {
    /// False when there was nothing to save.
    pub saved: bool,
    pub encounter: EncounterView,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadReq {
    pub file_name: String,
    pub media_type: String,
    /// File content, standard base64.
    pub content: String,
    /// Investigation whose result receives the attachment once the upload succeeds.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub investigation_id: Option<EntityId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadRes {
    pub url: String,
    #[schema(value_type = Option<Object>)]
    pub attachment: Option<Attachment>,
    pub encounter: Option<EncounterView>,
}
