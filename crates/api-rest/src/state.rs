//! Shared server state: the gate, the operator directory, and one workstation per login.

use crate::error::{ApiError, ApiResult};
use axum::http::HeaderMap;
use hims_access::{AccessGate, OperatorDirectory, OperatorSession, Section, DEFAULT_SECTION};
use hims_core::{EncounterSession, EncounterStore, InMemoryEncounterStore, SessionState};
use hims_files::{AttachmentPort, ContentStoreUploader, UploadPolicy};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Header carrying the token returned by `POST /login`.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// What one signed-in operator is working on.
pub struct Workstation {
    pub operator: OperatorSession,
    pub encounter: EncounterSession,
}

/// Application state shared across REST handlers.
///
/// The workstation map is behind a plain mutex. Handlers take it, do synchronous work, and
/// release it before any `.await`.
#[derive(Clone)]
pub struct AppState {
    gate: Arc<AccessGate>,
    directory: Arc<OperatorDirectory>,
    store: Arc<InMemoryEncounterStore>,
    attachments: Arc<dyn AttachmentPort>,
    upload_policy: Arc<UploadPolicy>,
    file_store: Option<Arc<ContentStoreUploader>>,
    workstations: Arc<Mutex<HashMap<String, Workstation>>>,
}

impl AppState {
    pub fn new(
        directory: OperatorDirectory,
        store: Arc<InMemoryEncounterStore>,
        attachments: Arc<dyn AttachmentPort>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            gate: Arc::new(AccessGate::default()),
            directory: Arc::new(directory),
            store,
            attachments,
            upload_policy: Arc::new(upload_policy),
            file_store: None,
            workstations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Serves files held by `store` under `/files/sha256/{hash}`.
    pub fn with_file_store(self, store: Arc<ContentStoreUploader>) -> Self {
        Self {
            file_store: Some(store),
            ..self
        }
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn directory(&self) -> &OperatorDirectory {
        &self.directory
    }

    pub fn store(&self) -> &InMemoryEncounterStore {
        &self.store
    }

    pub fn attachments(&self) -> &dyn AttachmentPort {
        self.attachments.as_ref()
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    pub fn file_store(&self) -> Option<&ContentStoreUploader> {
        self.file_store.as_deref()
    }

    /// Opens a workstation for a freshly authenticated operator and returns its token.
    pub fn sign_in(&self, operator: OperatorSession) -> String {
        let token = operator.session_id().to_string();
        let encounter = self.new_encounter_session(&operator);
        self.lock().insert(
            token.clone(),
            Workstation {
                operator,
                encounter,
            },
        );
        token
    }

    /// Drops the workstation behind `token`, closing any open encounter.
    pub fn sign_out(&self, token: &str) -> ApiResult<()> {
        let mut workstation = self.lock().remove(token).ok_or(ApiError::Unauthenticated)?;
        workstation.encounter.close();
        tracing::info!(username = workstation.operator.username(), "operator signed out");
        Ok(())
    }

    /// The operator signed in under `token`, if any.
    pub fn operator(&self, token: &str) -> Option<OperatorSession> {
        self.lock().get(token).map(|w| w.operator.clone())
    }

    /// Runs `f` against the caller's workstation.
    pub fn with_workstation<T>(
        &self,
        headers: &HeaderMap,
        f: impl FnOnce(&mut Workstation) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let token = session_token(headers).ok_or(ApiError::Unauthenticated)?;
        let mut workstations = self.lock();
        let workstation = workstations
            .get_mut(token)
            .ok_or(ApiError::Unauthenticated)?;
        f(workstation)
    }

    /// Like [`with_workstation`](Self::with_workstation), for operators allowed into the
    /// consultation section only.
    pub fn with_consultation<T>(
        &self,
        headers: &HeaderMap,
        f: impl FnOnce(&mut Workstation) -> ApiResult<T>,
    ) -> ApiResult<T> {
        self.with_workstation(headers, |workstation| {
            if !self
                .gate
                .can_access(workstation.operator.role(), Section::Consultation)
            {
                tracing::debug!(
                    role = %workstation.operator.role(),
                    "consultation endpoint denied"
                );
                return Err(ApiError::Denied {
                    section: Section::Consultation,
                    redirect_to: DEFAULT_SECTION,
                });
            }
            f(workstation)
        })
    }

    /// A completed encounter session is terminal; the next patient gets a new one.
    pub fn renew_if_completed(&self, workstation: &mut Workstation) {
        if workstation.encounter.state() == SessionState::Completed {
            workstation.encounter = self.new_encounter_session(&workstation.operator);
        }
    }

    fn new_encounter_session(&self, operator: &OperatorSession) -> EncounterSession {
        let store: Arc<dyn EncounterStore> = self.store.clone();
        EncounterSession::new(store, operator.display_name())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Workstation>> {
        self.workstations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reads the session token header, if present and valid UTF-8.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
