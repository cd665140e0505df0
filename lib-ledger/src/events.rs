//! Ledger Event Emission
//!
//! Mutating ledger operations produce ordered notifications consumed by
//! external indexers and tests. Events are emitted after the state change
//! inside the same operation, so observers see them at least once and in
//! execution order. A failing sink never undoes a completed operation.

use serde::{Deserialize, Serialize};

use lib_types::{Address, Amount};

// ============================================================================
// EVENT TYPES
// ============================================================================

/// Ledger-level events observable by external consumers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Balance moved between accounts. Mints use the zero address as `from`,
    /// burns use it as `to`.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },

    /// Allowance set to an absolute value
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },

    /// Pause gate engaged
    Paused { by: Address },

    /// Pause gate released
    Unpaused { by: Address },
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerEvent::Transfer { from, to, amount } => {
                write!(f, "Transfer({:?} -> {:?}, {})", from, to, amount)
            }
            LedgerEvent::Approval {
                owner,
                spender,
                amount,
            } => write!(f, "Approval({:?} -> {:?}, {})", owner, spender, amount),
            LedgerEvent::Paused { by } => write!(f, "Paused({:?})", by),
            LedgerEvent::Unpaused { by } => write!(f, "Unpaused({:?})", by),
        }
    }
}

// ============================================================================
// EVENT SINK TRAIT
// ============================================================================

/// Receiver for ledger events
pub trait EventSink: Send {
    /// Called once per event, in execution order.
    ///
    /// Errors are reported to the caller's supervisor (see
    /// [`EventPublisher`]) but do not roll back the operation that produced
    /// the event.
    fn on_event(&mut self, event: LedgerEvent) -> anyhow::Result<()>;
}

// ============================================================================
// EVENT PUBLISHER
// ============================================================================

/// Fan-out publisher delivering each event to every registered sink
#[derive(Default)]
pub struct EventPublisher {
    sinks: Vec<Box<dyn EventSink>>,
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventPublisher {
    /// Create a publisher with no sinks
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl EventSink for EventPublisher {
    fn on_event(&mut self, event: LedgerEvent) -> anyhow::Result<()> {
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.on_event(event.clone()) {
                tracing::warn!("event sink error: {}", e);
                // Keep notifying the remaining sinks
            }
        }
        Ok(())
    }
}

// ============================================================================
// SINK IMPLEMENTATIONS
// ============================================================================

/// Sink that discards every event
#[derive(Debug, Default, Clone)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: LedgerEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Sink that captures events in order, for tests and inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Events captured, oldest first
    pub events: Vec<LedgerEvent>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent event, if any
    pub fn last(&self) -> Option<&LedgerEvent> {
        self.events.last()
    }

    /// Drop captured events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: LedgerEvent) -> anyhow::Result<()> {
        self.events.push(event);
        Ok(())
    }
}
