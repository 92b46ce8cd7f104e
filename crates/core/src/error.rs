use crate::record::SectionId;
use crate::record::investigations::InvestigationStatus;
use crate::store::StoreError;
use crate::validation::ValidationFailure;
use hims_uuid::EntityId;

/// Errors raised by a section editor. The slice is never touched when one is returned.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EditorError {
    #[error("no {section} entry with id {id}")]
    UnknownId { section: SectionId, id: EntityId },
    #[error("investigation cannot move from {from} to {to}")]
    IllegalTransition {
        from: InvestigationStatus,
        to: InvestigationStatus,
    },
    #[error("investigation {0} has no recorded result")]
    NoResult(EntityId),
    #[error("{0} cannot be blank")]
    BlankEntry(&'static str),
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error(transparent)]
    Text(#[from] hims_types::TextError),
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;

/// Errors building a [`SectionChange`](crate::SectionChange) from a dynamic `(section, field, value)`.
#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    #[error("{section} has no field '{field}'")]
    UnknownField { section: SectionId, field: String },
    #[error("invalid value for {section}.{field}: {source}")]
    InvalidValue {
        section: SectionId,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{section}.{field} lists id {id} more than once")]
    DuplicateId {
        section: SectionId,
        field: String,
        id: EntityId,
    },
    #[error("diagnosis order must run 1..n in list order: position {position} has order {order}")]
    OrderOutOfSequence { position: u32, order: u32 },
}

pub type ChangeResult<T> = std::result::Result<T, ChangeError>;

/// Errors from the encounter session lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum EncounterError {
    #[error("no encounter is active")]
    NoActiveEncounter,
    #[error("encounter session is completed")]
    SessionCompleted,
    #[error(transparent)]
    Change(#[from] ChangeError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("completion blocked: {0}")]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EncounterResult<T> = std::result::Result<T, EncounterError>;
