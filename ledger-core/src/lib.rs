//! CBDC Ledger Core
//!
//! Deterministic business-logic core of a two-tier digital-currency
//! ledger: named accounts with exact-decimal balances, atomic
//! peer-to-peer transfers, and an immutable, queryable transfer
//! history.
//!
//! # Architecture
//!
//! - **World state**: typed get/put/range-scan contract injected per
//!   invocation; memory and RocksDB implementations ship here
//! - **Ledger engine**: seeding, transfers, balance/account queries;
//!   owns the value-conservation and non-negative-balance invariants
//! - **History index**: participant-filtered range scan over the
//!   transaction records
//!
//! The execution host dispatches one operation at a time with a
//! [`TxContext`] (unique transaction id, invocation timestamp, world
//! state) and commits or discards each invocation's writes as a unit.
//! The core performs no internal scheduling, locking, or retries.
//!
//! # Invariants
//!
//! - Value conservation: a transfer moves value, never creates it
//! - Non-negative balances: `balance >= 0` after every commit
//! - Append-only history: records never modified or deleted
//!
//! # Example
//!
//! ```
//! use cbdc_ledger::{HistoryIndex, LedgerEngine, MemoryState, TxContext};
//! use chrono::Utc;
//!
//! # fn main() -> cbdc_ledger::Result<()> {
//! let state = MemoryState::new();
//! let engine = LedgerEngine::new();
//!
//! let ctx = TxContext::new("tx-0", Utc::now(), &state);
//! engine.init_ledger(&ctx)?;
//!
//! let ctx = TxContext::new("tx-1", Utc::now(), &state);
//! engine.transfer(&ctx, "BankA", "BankB", "100")?;
//!
//! let ctx = TxContext::new("tx-2", Utc::now(), &state);
//! let history = HistoryIndex::new().query_history(&ctx, "BankA")?;
//! assert_eq!(history.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod history;
pub mod metrics;
pub mod state;
pub mod types;

// Re-exports
pub use config::Config;
pub use context::TxContext;
pub use engine::{LedgerEngine, GENESIS_ACCOUNTS};
pub use error::{Error, Result};
pub use history::HistoryIndex;
pub use metrics::Metrics;
pub use state::{Keyspace, MemoryState, RocksState, WorldState};
pub use types::{Account, TransactionRecord};
