//! Identifier types for encounter entities.
//!
//! Every creatable entity in a consultation record (diagnosis, medication order, investigation,
//! family member, emergency contact, attachment) carries an [`EntityId`] generated by the editor
//! that creates it. Collection edits match on this id only, never on list position.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the value produced by `Uuid::new_v4().simple().to_string()`. Identifiers arriving
//! from outside (REST payloads) must already be canonical; hyphenated or uppercase forms are
//! rejected rather than normalised.
//!
//! Encounters themselves use an [`EncounterId`], a time-prefixed identifier
//! (`YYYYMMDDTHHMMSS.mmmZ-<canonical uuid>`) so that persisted encounters sort by creation
//! time.

mod ids;

pub use ids::{EncounterId, EntityId, Uuid};

/// Error type for identifier parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
