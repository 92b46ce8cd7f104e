use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, ServerConfig};
use hims_access::OperatorDirectory;
use hims_core::InMemoryEncounterStore;
use hims_files::{AttachmentMode, UploadPolicy};

/// Main entry point for the HIMS encounter server
///
/// Resolves configuration once, loads the operator directory, picks the attachment uploader,
/// and serves the REST API.
///
/// # Environment Variables
/// - `HIMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HIMS_OPERATORS_FILE`: YAML operator directory (default: "operators.yaml")
/// - `HIMS_ATTACHMENT_MODE`: `store` (default) or `offline`
/// - `HIMS_ATTACHMENT_DIR`: content store root (default: "attachments")
/// - `HIMS_ATTACHMENT_BASE_URL`: prefix for stored file URLs
/// - `HIMS_MAX_IMAGE_BYTES`: image upload limit (default: 5 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value is invalid,
/// - the operator directory cannot be loaded,
/// - the attachment store cannot be prepared, or
/// - the server address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hims=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;

    let directory = OperatorDirectory::load(&cfg.operators_file)?;
    if directory.is_empty() {
        anyhow::bail!(
            "Operator directory has no operators: {}",
            cfg.operators_file.display()
        );
    }
    tracing::info!(operators = directory.len(), "operator directory loaded");

    let policy = UploadPolicy::default().with_max_image_bytes(cfg.max_image_bytes);
    let store = Arc::new(InMemoryEncounterStore::new());

    let state = match cfg.attachments.mode {
        AttachmentMode::Store => {
            let content_store = Arc::new(cfg.attachments.content_store()?);
            AppState::new(directory, store, content_store.clone(), policy)
                .with_file_store(content_store)
        }
        AttachmentMode::Offline => {
            AppState::new(directory, store, cfg.attachments.build()?, policy)
        }
    };

    tracing::info!("++ Starting HIMS REST on {}", cfg.addr);

    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, api_rest::router(state)).await?;

    Ok(())
}
