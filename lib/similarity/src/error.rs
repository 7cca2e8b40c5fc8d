use thiserror::Error;

/// Errors raised while building, adjusting or ranking over a feature table
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Unknown uid: {0}")]
    UnknownUid(String),

    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No users left after extraction and merge")]
    EmptyTable,

    #[error("Not enough unique uids: need {required}, found {found}")]
    InsufficientUids { required: usize, found: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] brewmatch_core::Error),
}
