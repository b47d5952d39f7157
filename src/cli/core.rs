//! Loop control and error types shared by the shell and command handlers.

use std::io;

use crate::errors::{EcoError, StorageError};

pub use crate::cli::shell_context::{CliMode, ShellContext};
pub use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] EcoError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        CommandError::Core(EcoError::Storage(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Io(inner) => CommandError::Io(inner),
            CliError::Prompt(inner) => CommandError::Dialoguer(inner),
            CliError::Readline(inner) => CommandError::Message(inner.to_string()),
        }
    }
}

/// Arguments shared by every handler: raw tokens after the command word.
pub(crate) fn require_args<'a>(
    args: &'a [&'a str],
    count: usize,
    usage: &str,
) -> Result<&'a [&'a str], CommandError> {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    } else {
        Ok(args)
    }
}

pub(crate) fn parse_number(raw: &str, label: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("{label} must be a number, got `{raw}`")))
}
