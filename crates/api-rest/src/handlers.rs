//! Endpoint handlers.
//!
//! Every handler that touches an encounter goes through
//! [`AppState::with_consultation`], so the role check cannot be skipped.

use crate::dto::{
    ChangeReq, ChiefComplaintReq, EncounterView, HealthRes, LoginReq, LoginRes, NavigationRes,
    SaveRes, StartEncounterReq, UploadReq, UploadRes,
};
use crate::error::{ApiError, ApiResult};
use crate::state::{session_token, AppState};
use axum::extract::{Path as AxumPath, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hims_access::{GuardOutcome, NavigationMenu};
use hims_core::editors::InvestigationsEditor;
use hims_core::record::investigations::Attachment;
use hims_core::EncounterDocument;
use hims_files::{AttachmentFile, UploadError};
use hims_uuid::EntityId;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "HIMS REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed in", body = LoginRes),
        (status = 401, description = "Invalid username or password")
    )
)]
/// Signs an operator in and opens a workstation for them.
///
/// A failed attempt can be repeated immediately; there is no lockout.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> ApiResult<Json<LoginRes>> {
    let operator = state
        .directory()
        .authenticate(&req.username, &req.password)?;
    let navigation = NavigationMenu::for_role(state.gate(), operator.role());

    let res = LoginRes {
        username: operator.username().to_owned(),
        display_name: operator.display_name().to_owned(),
        role: operator.role(),
        navigation,
        token: state.sign_in(operator),
    };
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/logout",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not signed in")
    )
)]
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let token = session_token(&headers).ok_or(ApiError::Unauthenticated)?;
    state.sign_out(token)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/navigation",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    responses(
        (status = 200, description = "Menu entries visible to the operator", body = NavigationRes),
        (status = 401, description = "Not signed in")
    )
)]
#[axum::debug_handler]
pub async fn navigation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<NavigationRes>> {
    state.with_workstation(&headers, |workstation| {
        let role = workstation.operator.role();
        Ok(Json(NavigationRes {
            role,
            entries: NavigationMenu::for_role(state.gate(), role),
        }))
    })
}

#[utoipa::path(
    get,
    path = "/navigate/{path}",
    params(
        ("path" = String, Path, description = "Route path as typed in the address bar"),
        ("x-session-token" = Option<String>, Header, description = "Token from /login")
    ),
    responses(
        (status = 200, description = "Guard outcome: render, render-public, redirect, or redirect-to-login")
    )
)]
/// Resolves a typed or deep-linked path through the access gate.
///
/// A denied section is answered with a redirect outcome, never an error status.
#[axum::debug_handler]
pub async fn navigate(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(path): AxumPath<String>,
) -> Json<GuardOutcome> {
    Json(resolve(&state, &headers, &path))
}

#[axum::debug_handler]
pub async fn navigate_home(State(state): State<AppState>, headers: HeaderMap) -> Json<GuardOutcome> {
    Json(resolve(&state, &headers, ""))
}

fn resolve(state: &AppState, headers: &HeaderMap, path: &str) -> GuardOutcome {
    let operator = session_token(headers).and_then(|token| state.operator(token));
    state.gate().navigate(operator.as_ref(), path)
}

#[utoipa::path(
    get,
    path = "/encounter",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    responses(
        (status = 200, description = "Current encounter", body = EncounterView),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Role may not use the consultation section")
    )
)]
#[axum::debug_handler]
pub async fn encounter(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<EncounterView>> {
    state.with_consultation(&headers, |workstation| {
        Ok(Json(EncounterView::from(&workstation.encounter)))
    })
}

#[utoipa::path(
    post,
    path = "/encounter/start",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    request_body = StartEncounterReq,
    responses(
        (status = 200, description = "Encounter started (or unchanged without a patient)", body = EncounterView),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Role may not use the consultation section")
    )
)]
/// Selects a patient. Any open encounter is discarded, unsaved edits included.
#[axum::debug_handler]
pub async fn start_encounter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<StartEncounterReq>,
) -> ApiResult<Json<EncounterView>> {
    state.with_consultation(&headers, |workstation| {
        if req.patient.is_some() {
            state.renew_if_completed(workstation);
        }
        workstation.encounter.start(req.patient)?;
        Ok(Json(EncounterView::from(&workstation.encounter)))
    })
}

#[utoipa::path(
    post,
    path = "/encounter/changes",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    request_body = ChangeReq,
    responses(
        (status = 200, description = "Change applied", body = EncounterView),
        (status = 400, description = "Unknown field or invalid value"),
        (status = 409, description = "No active encounter")
    )
)]
#[axum::debug_handler]
pub async fn apply_change(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChangeReq>,
) -> ApiResult<Json<EncounterView>> {
    state.with_consultation(&headers, |workstation| {
        workstation
            .encounter
            .apply_raw(req.section, &req.field, req.value)?;
        Ok(Json(EncounterView::from(&workstation.encounter)))
    })
}

#[utoipa::path(
    put,
    path = "/encounter/chief-complaint",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    request_body = ChiefComplaintReq,
    responses(
        (status = 200, description = "Chief complaint and present illness updated", body = EncounterView),
        (status = 409, description = "No active encounter")
    )
)]
#[axum::debug_handler]
pub async fn update_chief_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChiefComplaintReq>,
) -> ApiResult<Json<EncounterView>> {
    state.with_consultation(&headers, |workstation| {
        workstation.encounter.update_chief_complaint(&req.text)?;
        Ok(Json(EncounterView::from(&workstation.encounter)))
    })
}

#[utoipa::path(
    post,
    path = "/encounter/save",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    responses(
        (status = 200, description = "Draft saved, or nothing to save", body = SaveRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn save_encounter(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SaveRes>> {
    state.with_consultation(&headers, |workstation| {
        let saved = workstation.encounter.save()?;
        Ok(Json(SaveRes {
            saved,
            encounter: EncounterView::from(&workstation.encounter),
        }))
    })
}

#[utoipa::path(
    post,
    path = "/encounter/complete",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    responses(
        (status = 200, description = "Encounter completed; body is the committed document"),
        (status = 409, description = "No active encounter"),
        (status = 422, description = "A completion rule failed; body names the rule and section")
    )
)]
#[axum::debug_handler]
pub async fn complete_encounter(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<EncounterDocument>> {
    state.with_consultation(&headers, |workstation| {
        Ok(Json(workstation.encounter.complete()?))
    })
}

#[utoipa::path(
    post,
    path = "/attachments",
    params(("x-session-token" = String, Header, description = "Token from /login")),
    request_body = UploadReq,
    responses(
        (status = 200, description = "File uploaded", body = UploadRes),
        (status = 400, description = "Empty file or invalid base64"),
        (status = 404, description = "Unknown investigation"),
        (status = 413, description = "File too large"),
        (status = 415, description = "Unsupported or mismatched media type")
    )
)]
/// Checks and uploads a file, then attaches it to an investigation result if one is named.
///
/// The attachment is added against the record as it is once the upload resolves. A rejected
/// file leaves the record untouched.
#[axum::debug_handler]
pub async fn upload_attachment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UploadReq>,
) -> ApiResult<Json<UploadRes>> {
    state.with_consultation(&headers, |_| Ok(()))?;

    let bytes = STANDARD
        .decode(req.content.trim())
        .map_err(|e| ApiError::BadRequest(format!("content is not valid base64: {e}")))?;
    let file = AttachmentFile::new(req.file_name, req.media_type.trim().to_ascii_lowercase(), bytes);
    state.upload_policy().check(&file)?;

    let url = state.attachments().upload(&file).await?;

    let Some(investigation_id) = req.investigation_id else {
        return Ok(Json(UploadRes {
            url,
            attachment: None,
            encounter: None,
        }));
    };

    let attachment = Attachment {
        id: EntityId::new(),
        url: url.clone(),
        file_name: file.file_name,
        media_type: file.media_type,
    };
    let encounter = state.with_consultation(&headers, |workstation| {
        workstation.encounter.edit(|record| {
            InvestigationsEditor::new(&record.investigations)
                .attach(investigation_id, attachment.clone())
        })?;
        Ok(EncounterView::from(&workstation.encounter))
    })?;

    Ok(Json(UploadRes {
        url,
        attachment: Some(attachment),
        encounter: Some(encounter),
    }))
}

#[utoipa::path(
    get,
    path = "/files/sha256/{hash}",
    params(("hash" = String, Path, description = "Lowercase hex SHA-256 of the content")),
    responses(
        (status = 200, description = "Stored file content"),
        (status = 400, description = "Malformed hash"),
        (status = 404, description = "Nothing stored under this hash")
    )
)]
/// Serves a file from the content store. Only routed when the content store is in use.
#[axum::debug_handler]
pub async fn stored_file(
    State(state): State<AppState>,
    AxumPath(hash): AxumPath<String>,
) -> ApiResult<impl IntoResponse> {
    let store = state
        .file_store()
        .ok_or_else(|| UploadError::NotFound(hash.clone()))?;
    let bytes = store.read(&hash).await?;
    let media_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, media_type)], bytes))
}
