//! # HIMS Core
//!
//! Clinical encounter authoring for the hospital front end.
//!
//! This crate contains the consultation record and everything that edits it:
//! - [`ConsultationRecord`] and its six slices (history, examination, diagnosis, orders,
//!   investigations, follow-up)
//! - Section editors that turn operator actions into typed [`SectionChange`] values
//! - [`EncounterSession`], which owns the active patient and record and runs the
//!   start/save/complete lifecycle
//! - [`ValidationGate`], the ordered completion rules, plus non-blocking advisories
//! - [`EncounterStore`], the persistence seam, with an in-memory implementation
//!
//! **No API concerns**: authentication, HTTP, and file uploads belong in `hims-access`,
//! `api-rest`, and `hims-files`.

pub mod change;
pub mod constants;
pub mod editors;
pub mod error;
pub mod patient;
pub mod record;
pub mod session;
pub mod store;
pub mod validation;

pub use change::SectionChange;
pub use editors::AuditStamp;
pub use error::{
    ChangeError, ChangeResult, EditorError, EditorResult, EncounterError, EncounterResult,
};
pub use patient::{Patient, PatientRef};
pub use record::{ConsultationRecord, SectionId};
pub use session::{EncounterSession, SessionState};
pub use store::{EncounterDocument, EncounterStore, InMemoryEncounterStore, StoreError};
pub use validation::{Advisory, AdvisoryKind, ValidationFailure, ValidationGate};
