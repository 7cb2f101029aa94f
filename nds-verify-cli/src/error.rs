use nds_verify_dat::{DatError, HashError};
use nds_verify_lib::{
    ExportError, MalformedLogError, ReconciliationError, SettingsError, ValidationError,
};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Log(#[from] MalformedLogError),

    #[error("Hashing failed: {0}")]
    Hash(#[from] HashError),

    #[error("DAT error: {0}")]
    Dat(#[from] DatError),

    #[error("{0}")]
    Reconcile(#[from] ReconciliationError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Answers file could not be read as TOML
    #[error("Invalid answers file: {0}")]
    Answers(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
