//! # API REST
//!
//! REST API for HIMS encounter authoring.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Each login opens a workstation (operator session plus encounter session) keyed by the token
//! returned from `POST /login`; clients send it back in the `x-session-token` header.
//! Domain rules live in `hims-access`, `hims-core`, and `hims-files`.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod dto;
pub mod error;
mod handlers;
pub mod state;


use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Workstation, SESSION_TOKEN_HEADER};

/// Headroom over the largest accepted file for base64 expansion and the JSON envelope.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::login,
        handlers::logout,
        handlers::navigation,
        handlers::navigate,
        handlers::encounter,
        handlers::start_encounter,
        handlers::apply_change,
        handlers::update_chief_complaint,
        handlers::save_encounter,
        handlers::complete_encounter,
        handlers::upload_attachment,
        handlers::stored_file,
    ),
    components(schemas(
        dto::HealthRes,
        dto::LoginReq,
        dto::LoginRes,
        dto::NavigationRes,
        dto::StartEncounterReq,
        dto::ChangeReq,
        dto::ChiefComplaintReq,
        dto::EncounterView,
        dto::SaveRes,
        dto::UploadReq,
        dto::UploadRes,
    ))
)]
pub struct ApiDoc;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let policy = state.upload_policy();
    let largest_file = policy.max_image_bytes.max(policy.max_file_bytes);
    let body_limit = usize::try_from(largest_file / 3 * 4)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_OVERHEAD_BYTES);

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/navigation", get(handlers::navigation))
        .route("/navigate", get(handlers::navigate_home))
        .route("/navigate/*path", get(handlers::navigate))
        .route("/encounter", get(handlers::encounter))
        .route("/encounter/start", post(handlers::start_encounter))
        .route("/encounter/changes", post(handlers::apply_change))
        .route(
            "/encounter/chief-complaint",
            put(handlers::update_chief_complaint),
        )
        .route("/encounter/save", post(handlers::save_encounter))
        .route("/encounter/complete", post(handlers::complete_encounter))
        .route("/attachments", post(handlers::upload_attachment))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if state.file_store().is_some() {
        app = app.route("/files/sha256/:hash", get(handlers::stored_file));
    }

    app.layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
