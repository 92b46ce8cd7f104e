//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use hims_access::{AuthError, Section};
use hims_core::{EditorError, EncounterError, StoreError};
use hims_files::UploadError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or unknown `x-session-token`.
    #[error("not signed in")]
    Unauthenticated,
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The operator's role may not enter the section behind this endpoint.
    #[error("{section} is not available to this operator")]
    Denied { section: Section, redirect_to: Section },
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Encounter(#[from] EncounterError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Denied { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Encounter(e) => match e {
                EncounterError::NoActiveEncounter | EncounterError::SessionCompleted => {
                    StatusCode::CONFLICT
                }
                EncounterError::Change(_) => StatusCode::BAD_REQUEST,
                EncounterError::Editor(EditorError::UnknownId { .. }) => StatusCode::NOT_FOUND,
                EncounterError::Editor(_) => StatusCode::BAD_REQUEST,
                EncounterError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EncounterError::Store(StoreError::AlreadyCompleted(_)) => StatusCode::CONFLICT,
                EncounterError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Upload(e) => match e {
                UploadError::Empty | UploadError::InvalidHash(_) => StatusCode::BAD_REQUEST,
                UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                UploadError::UnsupportedType(_) | UploadError::MediaTypeMismatch { .. } => {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                }
                UploadError::NotFound(_) => StatusCode::NOT_FOUND,
                UploadError::InvalidRootDirectory(_) | UploadError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = match &self {
            ApiError::Encounter(EncounterError::Validation(failure)) => json!({
                "error": self.to_string(),
                "ruleId": failure.rule_id,
                "section": failure.section,
                "message": failure.message,
            }),
            ApiError::Denied {
                section,
                redirect_to,
            } => json!({
                "error": self.to_string(),
                "section": section,
                "redirectTo": redirect_to,
            }),
            ApiError::Encounter(EncounterError::Store(_))
            | ApiError::Upload(UploadError::Io(_) | UploadError::InvalidRootDirectory(_)) => {
                json!({ "error": "Internal error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
