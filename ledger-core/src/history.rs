//! History index: participant-filtered transaction queries
//!
//! Scans the whole transactions keyspace and filters in memory. The
//! cost grows with total history, not with the queried account's share
//! of it; a secondary index by participant is the natural evolution if
//! that ever matters (see DESIGN.md).

use crate::{
    context::TxContext,
    error::{Error, Result},
    metrics::Metrics,
    state::Keyspace,
    types::TransactionRecord,
};

/// Read-only index over the transactions keyspace
#[derive(Default)]
pub struct HistoryIndex {
    /// Metrics handle (if enabled)
    metrics: Option<Metrics>,
}

impl HistoryIndex {
    /// Create a new index
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Return every record in which `account` is sender or receiver,
    /// in key order (by sender, then tx id - not chronological).
    ///
    /// An account with no history yields an empty vector, not an error.
    pub fn query_history(
        &self,
        ctx: &TxContext<'_>,
        account: &str,
    ) -> Result<Vec<TransactionRecord>> {
        let iter = ctx.state().range_scan(Keyspace::Transactions, "", None)?;

        let mut records = Vec::new();
        for item in iter {
            let (_, bytes) = item?;
            let record: TransactionRecord =
                serde_json::from_slice(&bytes).map_err(Error::Deserialization)?;
            if record.involves(account) {
                records.push(record);
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_history_query();
        }

        tracing::debug!(account, matched = records.len(), "history queried");
        Ok(records)
    }
}
