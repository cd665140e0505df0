//! Ledger Errors
//!
//! Every precondition violation aborts the whole operation with no partial
//! state change and is surfaced synchronously to the caller; nothing here is
//! retried internally.

use lib_types::Amount;
use thiserror::Error;

use crate::authority::Role;

/// Error during ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transfer to the zero address")]
    InvalidRecipient,

    #[error("approve to the zero address")]
    InvalidSpender,

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("decreased allowance below zero")]
    AllowanceUnderflow,

    #[error("ledger is paused")]
    Paused,

    #[error("ledger is not paused")]
    NotPaused,

    #[error("ledger is already paused")]
    AlreadyPaused,

    #[error("caller lacks the {0} role")]
    Unauthorized(Role),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("ledger is already initialized")]
    AlreadyInitialized,

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot state hash mismatch: expected {expected}, got {actual}")]
    StateHashMismatch { expected: String, actual: String },

    #[error("conservation invariant violated: {0}")]
    ConservationViolated(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
