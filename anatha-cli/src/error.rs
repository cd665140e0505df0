//! Structured error types for the administration CLI

use std::path::PathBuf;
use thiserror::Error;

use lib_ledger::LedgerError;

/// CLI error types with proper context
#[derive(Error, Debug)]
pub enum CliError {
    #[error("state file not found: {0} (run `init` first)")]
    StateNotFound(PathBuf),

    #[error("state file already exists: {0}")]
    StateExists(PathBuf),

    #[error("failed to access state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed state file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
