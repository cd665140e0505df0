//! Snapshot & Migration
//!
//! The persisted form of the ledger is a format-tagged snapshot with a
//! deterministic state hash. Schema upgrades happen through the explicit
//! [`migrate`] entry point invoked by the administration layer; there is no
//! implicit in-place upgrade path.
//!
//! # Restore Guarantees
//!
//! After `restore()` completes successfully:
//! - The snapshot version was recognized (after migration)
//! - The state hash verified against the snapshot content
//! - Conservation holds: the balance entries sum to the total supply
//! - Zero-valued entries have been dropped

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use lib_types::{Address, Amount};

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

// =============================================================================
// SNAPSHOT STRUCTURE
// =============================================================================

/// A balance entry in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Account address
    pub address: Address,
    /// Balance in base units (never zero in a finalized snapshot)
    pub amount: Amount,
}

/// An allowance entry in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    /// Owner address
    pub owner: Address,
    /// Spender address
    pub spender: Address,
    /// Approved amount (never zero in a finalized snapshot)
    pub amount: Amount,
}

/// Format-tagged ledger snapshot
///
/// # Invariants
///
/// - `state_hash` MUST match `compute_state_hash()` after `finalize`
/// - `balances` and `allowances` are sorted and free of zero entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Snapshot format version (currently 1)
    pub version: u32,

    /// Token name
    pub name: String,

    /// Token symbol
    pub symbol: String,

    /// Display decimals
    pub decimals: u8,

    /// Whether the ledger was initialized
    pub initialized: bool,

    /// Pause gate state at capture time
    pub paused: bool,

    /// Total supply in circulation
    pub total_supply: Amount,

    /// Non-zero balances, sorted by address
    pub balances: Vec<BalanceEntry>,

    /// Non-zero allowances, sorted by (owner, spender)
    pub allowances: Vec<AllowanceEntry>,

    /// Timestamp when the snapshot was created (Unix seconds)
    pub created_at: u64,

    /// Computed state hash for integrity verification
    pub state_hash: [u8; 32],
}

impl LedgerSnapshot {
    /// Current snapshot format version
    pub const VERSION: u32 = 1;

    /// Compute the state hash over the snapshot content.
    ///
    /// The hash covers version, metadata, pause flag, supply, and the sorted
    /// entry vectors. `created_at` is excluded so identical states hash
    /// identically regardless of capture time.
    pub fn compute_state_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        hasher.update(self.version.to_be_bytes());
        hasher.update((self.name.len() as u64).to_be_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update((self.symbol.len() as u64).to_be_bytes());
        hasher.update(self.symbol.as_bytes());
        hasher.update([self.decimals]);
        hasher.update([self.initialized as u8, self.paused as u8]);
        hasher.update(self.total_supply.to_be_bytes());

        let mut balances_sorted = self.balances.clone();
        balances_sorted.sort_by(|a, b| a.address.cmp(&b.address));
        for entry in &balances_sorted {
            hasher.update(entry.address.as_bytes());
            hasher.update(entry.amount.to_be_bytes());
        }

        let mut allowances_sorted = self.allowances.clone();
        allowances_sorted.sort_by(|a, b| (&a.owner, &a.spender).cmp(&(&b.owner, &b.spender)));
        for entry in &allowances_sorted {
            hasher.update(entry.owner.as_bytes());
            hasher.update(entry.spender.as_bytes());
            hasher.update(entry.amount.to_be_bytes());
        }

        hasher.finalize().into()
    }

    /// Verify the stored state hash matches the computed hash
    pub fn verify_state_hash(&self) -> bool {
        self.state_hash == self.compute_state_hash()
    }

    /// Finalize the snapshot by computing and setting the state hash
    pub fn finalize(&mut self) {
        self.state_hash = self.compute_state_hash();
    }
}

// =============================================================================
// SNAPSHOT FUNCTIONS
// =============================================================================

/// Capture the ledger state into a finalized snapshot
pub fn snapshot(ledger: &Ledger) -> LedgerSnapshot {
    let mut balances: Vec<BalanceEntry> = ledger
        .balances()
        .map(|(address, amount)| BalanceEntry {
            address: *address,
            amount,
        })
        .collect();
    balances.sort_by(|a, b| a.address.cmp(&b.address));

    let mut allowances: Vec<AllowanceEntry> = ledger
        .allowances()
        .map(|(owner, spender, amount)| AllowanceEntry {
            owner: *owner,
            spender: *spender,
            amount,
        })
        .collect();
    allowances.sort_by(|a, b| (&a.owner, &a.spender).cmp(&(&b.owner, &b.spender)));

    let mut snap = LedgerSnapshot {
        version: LedgerSnapshot::VERSION,
        name: ledger.name().to_string(),
        symbol: ledger.symbol().to_string(),
        decimals: ledger.decimals(),
        initialized: ledger.is_initialized(),
        paused: ledger.is_paused(),
        total_supply: ledger.total_supply(),
        balances,
        allowances,
        created_at: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        state_hash: [0u8; 32],
    };
    snap.finalize();
    snap
}

/// Migrate a snapshot to the current format version.
///
/// This is the administration layer's explicit schema-upgrade entry point:
/// future format revisions rewrite older snapshots here. Version 1 passes
/// through unchanged; unknown versions are rejected.
pub fn migrate(snap: LedgerSnapshot) -> LedgerResult<LedgerSnapshot> {
    match snap.version {
        LedgerSnapshot::VERSION => Ok(snap),
        other => Err(LedgerError::UnsupportedVersion(other)),
    }
}

/// Rebuild a ledger from a snapshot.
///
/// Runs [`migrate`] first, then verifies the state hash and the
/// conservation invariant before any state is constructed.
pub fn restore(snap: LedgerSnapshot) -> LedgerResult<Ledger> {
    let snap = migrate(snap)?;

    if !snap.verify_state_hash() {
        return Err(LedgerError::StateHashMismatch {
            expected: hex::encode(snap.compute_state_hash()),
            actual: hex::encode(snap.state_hash),
        });
    }

    let ledger = Ledger::from_parts(
        snap.name,
        snap.symbol,
        snap.decimals,
        snap.initialized,
        snap.paused,
        snap.total_supply,
        snap.balances
            .into_iter()
            .map(|entry| (entry.address, entry.amount)),
        snap.allowances
            .into_iter()
            .map(|entry| (entry.owner, entry.spender, entry.amount)),
    );

    // Summing the rebuilt map (rather than the raw entries) also rejects
    // duplicate-address snapshots
    let mut sum: Amount = 0;
    for (_, amount) in ledger.balances() {
        sum = sum.checked_add(amount).ok_or(LedgerError::Overflow)?;
    }
    if sum != ledger.total_supply() {
        return Err(LedgerError::ConservationViolated(format!(
            "balance sum {} != total supply {}",
            sum,
            ledger.total_supply()
        )));
    }

    Ok(ledger)
}
