//! Per-invocation transaction context
//!
//! The host dispatches one operation at a time and hands it a context:
//! a unique transaction id, the invocation timestamp, and the world
//! state to operate against. Keeping both the id and the clock
//! host-supplied makes every engine operation a pure function of
//! `(state snapshot, inputs)` and lets a replaying host reproduce
//! identical records.

use crate::state::WorldState;
use chrono::{DateTime, Utc};

/// Context of a single host invocation
pub struct TxContext<'a> {
    tx_id: String,
    timestamp: DateTime<Utc>,
    state: &'a dyn WorldState,
}

impl<'a> TxContext<'a> {
    /// Create a context for one invocation.
    ///
    /// `tx_id` must be unique per invocation; the host owns that
    /// guarantee.
    pub fn new(
        tx_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        state: &'a dyn WorldState,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            state,
        }
    }

    /// Host-supplied transaction id
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Host-supplied invocation timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// World state for this invocation
    pub fn state(&self) -> &dyn WorldState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Keyspace, MemoryState};

    #[test]
    fn test_context_accessors() {
        let state = MemoryState::new();
        let timestamp: DateTime<Utc> = "2026-01-01T00:00:00Z".parse().unwrap();
        let ctx = TxContext::new("tx-42", timestamp, &state);

        assert_eq!(ctx.tx_id(), "tx-42");
        assert_eq!(ctx.timestamp(), timestamp);
        assert_eq!(ctx.state().get(Keyspace::Accounts, "none").unwrap(), None);
    }
}
