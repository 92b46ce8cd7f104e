//! Constants used throughout the HIMS core crate.

/// Completion rule: the history slice must carry a present illness.
pub const PRESENT_ILLNESS_RULE: &str = "history.present-illness";

/// Completion rule: the diagnosis list must not be empty.
pub const DIAGNOSIS_PRESENT_RULE: &str = "diagnosis.non-empty";
