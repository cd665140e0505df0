//! Ledger Core
//!
//! The canonical wANATHA ledger state machine: balances, allowances, total
//! supply, and the global pause gate.
//!
//! # Invariants
//!
//! - Conservation: the sum of all balances equals `total_supply` at every
//!   observable point.
//! - Non-negativity: balances and allowances never underflow; supply and
//!   balance increases use checked arithmetic and surface `Overflow`.
//! - All-or-nothing: every operation validates all preconditions before the
//!   first write; a failed operation leaves no partial state.
//! - Zero-valued balance/allowance entries are removed on write, so "absent"
//!   and "zero" are the same observable state.
//!
//! Collaborators are injected per call: an [`AccessAuthority`] for the
//! privileged operations and an [`EventSink`] for notifications. Events are
//! emitted after the state change, inside the operation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lib_types::{Address, Amount};

use crate::authority::{AccessAuthority, Role};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::{EventSink, LedgerEvent};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Token name, fixed at initialization
pub const TOKEN_NAME: &str = "Wrapped Anatha";

/// Token symbol, fixed at initialization
pub const TOKEN_SYMBOL: &str = "wANATHA";

/// Display decimals (metadata only, never enforced arithmetically)
pub const TOKEN_DECIMALS: u8 = 8;

/// Initial supply minted to the initial holder (500 million, 8 decimals)
pub const INITIAL_SUPPLY: Amount = 50_000_000_000_000_000;

// =============================================================================
// LEDGER STATE
// =============================================================================

/// The wANATHA ledger
///
/// All mutation goes through the operations below; the maps are never
/// exposed mutably. State is single-writer by construction (`&mut self`);
/// wrap in [`crate::SharedLedger`] for concurrent hosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Human-readable token name
    name: String,
    /// Token symbol
    symbol: String,
    /// Display decimals
    decimals: u8,
    /// One-time initialization guard
    initialized: bool,
    /// Global pause gate
    paused: bool,
    /// Total supply in circulation
    total_supply: Amount,
    /// Account balances; absent entry means zero
    balances: HashMap<Address, Amount>,
    /// Allowances keyed by (owner, spender); absent entry means zero
    allowances: HashMap<(Address, Address), Amount>,
}

impl Ledger {
    /// Create an empty, uninitialized ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// One-time setup: fixes metadata and mints the full initial supply to
    /// `initial_holder`.
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` on a second call
    /// - `InvalidRecipient` if `initial_holder` is the zero address
    pub fn initialize(
        &mut self,
        initial_holder: Address,
        events: &mut dyn EventSink,
    ) -> LedgerResult<()> {
        if self.initialized {
            return Err(LedgerError::AlreadyInitialized);
        }
        if initial_holder.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }

        self.name = TOKEN_NAME.to_string();
        self.symbol = TOKEN_SYMBOL.to_string();
        self.decimals = TOKEN_DECIMALS;
        self.paused = false;
        self.total_supply = INITIAL_SUPPLY;
        self.set_balance(initial_holder, INITIAL_SUPPLY);
        self.initialized = true;

        let _ = events.on_event(LedgerEvent::Transfer {
            from: Address::zero(),
            to: initial_holder,
            amount: INITIAL_SUPPLY,
        });
        Ok(())
    }

    // =========================================================================
    // QUERIES (permitted in both Active and Paused states)
    // =========================================================================

    /// Token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display decimals
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Total supply in circulation
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Whether the pause gate is engaged
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Balance of an account (zero when absent)
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining allowance from `owner` to `spender` (zero when absent)
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate non-zero balances
    pub fn balances(&self) -> impl Iterator<Item = (&Address, Amount)> {
        self.balances.iter().map(|(addr, amt)| (addr, *amt))
    }

    /// Iterate non-zero allowances as (owner, spender, amount)
    pub fn allowances(&self) -> impl Iterator<Item = (&Address, &Address, Amount)> {
        self.allowances
            .iter()
            .map(|((owner, spender), amt)| (owner, spender, *amt))
    }

    // =========================================================================
    // TRANSFERS
    // =========================================================================

    /// Move `amount` from `from` to `to`.
    ///
    /// Check order: recipient, pause gate, balance. A zero-address recipient
    /// is rejected regardless of pause state or balance.
    pub fn transfer(
        &mut self,
        events: &mut dyn EventSink,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.require_active()?;
        self.move_balance(from, to, amount)?;

        let _ = events.on_event(LedgerEvent::Transfer { from, to, amount });
        Ok(())
    }

    /// Spend `spender`'s allowance from `from` to move `amount` to `to`.
    ///
    /// The allowance is always decremented; there is no unlimited-allowance
    /// sentinel. Check order: recipient, pause gate, balance, allowance.
    pub fn transfer_from(
        &mut self,
        events: &mut dyn EventSink,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.require_active()?;

        let have = self.balance_of(&from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        let allowed = self.allowance(&from, &spender);
        let remaining =
            allowed
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientAllowance {
                    have: allowed,
                    need: amount,
                })?;

        self.move_balance(from, to, amount)?;
        self.set_allowance_entry(from, spender, remaining);

        let _ = events.on_event(LedgerEvent::Transfer { from, to, amount });
        let _ = events.on_event(LedgerEvent::Approval {
            owner: from,
            spender,
            amount: remaining,
        });
        Ok(())
    }

    // =========================================================================
    // ALLOWANCES (not pause-gated; only balance-moving operations are)
    // =========================================================================

    /// Set the allowance from `owner` to `spender` to an absolute `amount`
    pub fn approve(
        &mut self,
        events: &mut dyn EventSink,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.set_approval(events, owner, spender, amount)
    }

    /// Raise the allowance by `delta`, returning the resulting value
    pub fn increase_allowance(
        &mut self,
        events: &mut dyn EventSink,
        owner: Address,
        spender: Address,
        delta: Amount,
    ) -> LedgerResult<Amount> {
        let updated = self
            .allowance(&owner, &spender)
            .checked_add(delta)
            .ok_or(LedgerError::Overflow)?;
        self.set_approval(events, owner, spender, updated)?;
        Ok(updated)
    }

    /// Lower the allowance by `delta`, returning the resulting value.
    ///
    /// Decreasing to exactly zero is the defined full-revocation path. The
    /// underflow check runs before spender validation, so a zero spender
    /// with a positive delta reports `AllowanceUnderflow` (its allowance is
    /// necessarily zero).
    pub fn decrease_allowance(
        &mut self,
        events: &mut dyn EventSink,
        owner: Address,
        spender: Address,
        delta: Amount,
    ) -> LedgerResult<Amount> {
        let updated = self
            .allowance(&owner, &spender)
            .checked_sub(delta)
            .ok_or(LedgerError::AllowanceUnderflow)?;
        self.set_approval(events, owner, spender, updated)?;
        Ok(updated)
    }

    // =========================================================================
    // SUPPLY
    // =========================================================================

    /// Mint `amount` new units to `to`. Requires the `Minter` role.
    ///
    /// Check order: authority, recipient, pause gate, overflow.
    pub fn mint(
        &mut self,
        authority: &dyn AccessAuthority,
        events: &mut dyn EventSink,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if !authority.is_authorized(&caller, Role::Minter) {
            return Err(LedgerError::Unauthorized(Role::Minter));
        }
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.require_active()?;

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.total_supply = new_supply;
        self.set_balance(to, new_balance);

        let _ = events.on_event(LedgerEvent::Transfer {
            from: Address::zero(),
            to,
            amount,
        });
        Ok(())
    }

    /// Burn `amount` units from `owner`'s own balance.
    ///
    /// Check order: pause gate, balance.
    pub fn burn(
        &mut self,
        events: &mut dyn EventSink,
        owner: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.require_active()?;
        self.burn_balance(owner, amount)?;

        let _ = events.on_event(LedgerEvent::Transfer {
            from: owner,
            to: Address::zero(),
            amount,
        });
        Ok(())
    }

    /// Burn `amount` units from `owner`, spending `caller`'s allowance.
    ///
    /// Check order: allowance, pause gate, balance.
    pub fn burn_from(
        &mut self,
        events: &mut dyn EventSink,
        caller: Address,
        owner: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        let allowed = self.allowance(&owner, &caller);
        let remaining =
            allowed
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientAllowance {
                    have: allowed,
                    need: amount,
                })?;
        self.require_active()?;

        // Validate the burn before writing the reduced allowance
        let have = self.balance_of(&owner);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }

        self.set_allowance_entry(owner, caller, remaining);
        self.burn_balance(owner, amount)?;

        let _ = events.on_event(LedgerEvent::Approval {
            owner,
            spender: caller,
            amount: remaining,
        });
        let _ = events.on_event(LedgerEvent::Transfer {
            from: owner,
            to: Address::zero(),
            amount,
        });
        Ok(())
    }

    // =========================================================================
    // PAUSE GATE
    // =========================================================================

    /// Engage the pause gate. Requires the `Pauser` role.
    pub fn pause(
        &mut self,
        authority: &dyn AccessAuthority,
        events: &mut dyn EventSink,
        caller: Address,
    ) -> LedgerResult<()> {
        if !authority.is_authorized(&caller, Role::Pauser) {
            return Err(LedgerError::Unauthorized(Role::Pauser));
        }
        if self.paused {
            return Err(LedgerError::AlreadyPaused);
        }
        self.paused = true;

        let _ = events.on_event(LedgerEvent::Paused { by: caller });
        Ok(())
    }

    /// Release the pause gate. Requires the `Pauser` role.
    pub fn unpause(
        &mut self,
        authority: &dyn AccessAuthority,
        events: &mut dyn EventSink,
        caller: Address,
    ) -> LedgerResult<()> {
        if !authority.is_authorized(&caller, Role::Pauser) {
            return Err(LedgerError::Unauthorized(Role::Pauser));
        }
        if !self.paused {
            return Err(LedgerError::NotPaused);
        }
        self.paused = false;

        let _ = events.on_event(LedgerEvent::Unpaused { by: caller });
        Ok(())
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn require_active(&self) -> LedgerResult<()> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    /// Debit `from` and credit `to`, validating both sides before either
    /// write so the pair applies atomically.
    fn move_balance(&mut self, from: Address, to: Address, amount: Amount) -> LedgerResult<()> {
        let have = self.balance_of(&from);
        let new_from = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance { have, need: amount })?;

        if from == to {
            // Self-transfer: the credit lands on the debited balance
            let restored = new_from.checked_add(amount).ok_or(LedgerError::Overflow)?;
            self.set_balance(to, restored);
            return Ok(());
        }

        let new_to = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.set_balance(from, new_from);
        self.set_balance(to, new_to);
        Ok(())
    }

    /// Remove `amount` from `owner` and from the total supply
    fn burn_balance(&mut self, owner: Address, amount: Amount) -> LedgerResult<()> {
        let have = self.balance_of(&owner);
        let new_balance = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance { have, need: amount })?;
        let new_supply = self.total_supply.checked_sub(amount).ok_or_else(|| {
            LedgerError::ConservationViolated(format!(
                "burn of {} exceeds total supply {}",
                amount, self.total_supply
            ))
        })?;

        self.set_balance(owner, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    /// Absolute allowance write shared by approve/increase/decrease
    fn set_approval(
        &mut self,
        events: &mut dyn EventSink,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if spender.is_zero() {
            return Err(LedgerError::InvalidSpender);
        }
        self.set_allowance_entry(owner, spender, amount);

        let _ = events.on_event(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
        Ok(())
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance_entry(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Rebuild a ledger from restored parts. Callers are responsible for
    /// having validated conservation; zero entries are dropped here.
    pub(crate) fn from_parts(
        name: String,
        symbol: String,
        decimals: u8,
        initialized: bool,
        paused: bool,
        total_supply: Amount,
        balances: impl IntoIterator<Item = (Address, Amount)>,
        allowances: impl IntoIterator<Item = (Address, Address, Amount)>,
    ) -> Self {
        let mut ledger = Ledger {
            name,
            symbol,
            decimals,
            initialized,
            paused,
            total_supply,
            ..Ledger::default()
        };
        for (address, amount) in balances {
            ledger.set_balance(address, amount);
        }
        for (owner, spender, amount) in allowances {
            ledger.set_allowance_entry(owner, spender, amount);
        }
        ledger
    }
}
