use std::io;

use thiserror::Error;

use crate::ledger::GoalId;

pub type Result<T> = std::result::Result<T, EcoError>;

/// Error type for ledger, goal, and configuration failures.
#[derive(Debug, Error)]
pub enum EcoError {
    #[error("Configuration error: no emission factor for `{0}`")]
    MissingFactor(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl EcoError {
    /// True for failures caused by the factor table or configuration rather than user input.
    pub fn is_configuration(&self) -> bool {
        matches!(self, EcoError::MissingFactor(_) | EcoError::Config(_))
    }

    /// True for failures raised by the validation boundary.
    pub fn is_validation(&self) -> bool {
        matches!(self, EcoError::InvalidInput(_))
    }
}

/// Failures raised by a durable key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Storage quota exceeded writing `{key}`: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EcoError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::Core(EcoError::Storage(err))
    }
}
