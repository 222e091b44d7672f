use thiserror::Error;

use crate::keys::LogicalKey;

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, SoftKeyError>;

/// Failures surfaced by the soft-key engine
///
/// Routine absences (unknown key, blank label, missing optional attribute)
/// are not errors and never show up here.
#[derive(Error, Debug)]
pub enum SoftKeyError {
    #[error("no options menu is open")]
    OverlayNotOpen,
    #[error("menu `{0}` not present")]
    MenuNotFound(String),
    #[error("view tree cannot report mutations, soft keys cannot track bindings")]
    ObservationUnsupported,
    #[error("soft keys are not initialized")]
    NotInitialized,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("physical key `{key}` is mapped to both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: LogicalKey,
        second: LogicalKey,
    },
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
