//! Core entity types for the ledger
//!
//! Both types persist as field-keyed JSON so the records stay readable
//! by anything that already holds ledger contents:
//! - Account: `{"name": "BankA", "balance": 1000000.0}`
//! - TransactionRecord: `{"tx_id": "...", "sender": "...", "receiver": "...",
//!   "amount": 100.0, "timestamp": "2026-01-01T00:00:00Z"}`
//!
//! Money is `rust_decimal::Decimal` in memory (exact arithmetic) and a
//! plain JSON number on disk.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named account with a non-negative balance.
///
/// The name doubles as the primary key in the accounts keyspace.
/// Accounts are seeded by `init_ledger`, mutated only by `transfer`,
/// and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account name
    pub name: String,

    /// Current balance, `>= 0` after every committed operation
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Account {
    /// Create a new account
    pub fn new(name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }
}

/// Immutable record of one successful transfer.
///
/// Written exactly once per transfer under the transactions-keyspace
/// key [`TransactionRecord::key`], never mutated or deleted. References
/// accounts by name only (no foreign-key enforcement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Host-supplied transaction id, unique per invocation
    pub tx_id: String,

    /// Debited account name
    pub sender: String,

    /// Credited account name
    pub receiver: String,

    /// Transferred amount (always positive)
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Invocation timestamp (RFC 3339 on the wire)
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Key of this record within the transactions keyspace.
    ///
    /// `<sender>_<tx_id>` keeps range scans ordered by sender, then
    /// transaction id.
    pub fn key(&self) -> String {
        transaction_key(&self.sender, &self.tx_id)
    }

    /// True if `account` participated in this transfer on either side.
    pub fn involves(&self, account: &str) -> bool {
        self.sender == account || self.receiver == account
    }
}

/// Build a transactions-keyspace key for a (sender, tx id) pair.
pub fn transaction_key(sender: &str, tx_id: &str) -> String {
    format!("{}_{}", sender, tx_id)
}
