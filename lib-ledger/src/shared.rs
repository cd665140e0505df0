//! Shared Ledger Handle
//!
//! The ledger executes under a serialized model: no two mutating operations
//! may interleave at sub-operation granularity. On a concurrent host that
//! discipline comes from a single exclusive lock; every operation runs whole
//! while the lock is held.

use std::sync::{Arc, Mutex};

use crate::ledger::Ledger;

/// Cloneable handle serializing all access to a [`Ledger`] behind one lock
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    /// Wrap a ledger for shared use
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run a read-only closure under the lock
    pub fn with<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        // Operations never leave partial state, so a poisoned lock still
        // guards a consistent ledger
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }

    /// Run a mutating closure under the lock.
    ///
    /// The whole closure executes atomically with respect to every other
    /// access through any clone of this handle.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Take the ledger back out of the handle, if this is the last clone
    pub fn try_unwrap(self) -> Result<Ledger, SharedLedger> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| match mutex.into_inner() {
                Ok(ledger) => ledger,
                Err(poisoned) => poisoned.into_inner(),
            })
            .map_err(|inner| SharedLedger { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::ledger::INITIAL_SUPPLY;
    use lib_types::{Address, Amount};
    use std::thread;

    #[test]
    fn concurrent_transfers_conserve_supply() {
        let holder = Address::new([1u8; 32]);
        let mut ledger = Ledger::new();
        ledger
            .initialize(holder, &mut RecordingSink::new())
            .unwrap();
        let shared = SharedLedger::new(ledger);

        let mut handles = Vec::new();
        for worker in 0..8u8 {
            let shared = shared.clone();
            handles.push(thread::spawn(move || {
                let target = Address::new([worker + 10; 32]);
                for _ in 0..100 {
                    shared.with_mut(|ledger| {
                        let mut sink = RecordingSink::new();
                        ledger.transfer(&mut sink, holder, target, 1).unwrap();
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        shared.with(|ledger| {
            let sum: Amount = ledger.balances().map(|(_, amount)| amount).sum();
            assert_eq!(sum, ledger.total_supply());
            assert_eq!(ledger.total_supply(), INITIAL_SUPPLY);
            assert_eq!(ledger.balance_of(&holder), INITIAL_SUPPLY - 800);
        });
    }

    #[test]
    fn try_unwrap_returns_ledger_when_sole_owner() {
        let shared = SharedLedger::new(Ledger::new());
        let clone = shared.clone();
        assert!(clone.try_unwrap().is_err());
        assert!(shared.try_unwrap().is_ok());
    }
}
