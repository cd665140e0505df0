//! Wrapped Anatha Token Ledger
//!
//! This crate implements the wANATHA ledger core: balances, allowances,
//! total supply, and a global pause gate, with mint/burn and role-gated
//! administration.
//!
//! Role storage and event delivery are external collaborators consumed
//! through narrow interfaces; the ledger itself never depends on a concrete
//! governance or indexing implementation.
//!
//! # Key Types
//!
//! - [`Ledger`]: the balance/allowance/supply/pause state machine
//! - [`AccessAuthority`]: role-permission oracle consulted before mint and
//!   pause transitions
//! - [`EventSink`]: receiver for Transfer/Approval notifications
//! - [`LedgerSnapshot`]: format-tagged persisted form of the ledger
//!
//! # Execution
//!
//! Every operation is synchronous and all-or-nothing: a precondition
//! violation aborts with no partial state change. Use [`SharedLedger`] when
//! the ledger is shared across threads.

pub mod authority;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod shared;
pub mod snapshot;

pub use authority::{AccessAuthority, AuthoritySet, Role};
pub use errors::{LedgerError, LedgerResult};
pub use events::{EventPublisher, EventSink, LedgerEvent, NullSink, RecordingSink};
pub use ledger::{Ledger, INITIAL_SUPPLY, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
pub use shared::SharedLedger;
pub use snapshot::{migrate, restore, snapshot, LedgerSnapshot};
