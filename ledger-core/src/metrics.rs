//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `ledger_transfers_total` - Committed transfers
//! - `ledger_transfers_rejected_total` - Transfers rejected with an error
//! - `ledger_transfer_duration_seconds` - Histogram of transfer latencies
//! - `ledger_history_queries_total` - History queries served

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Committed transfers
    pub transfers_total: IntCounter,

    /// Rejected transfers
    pub transfers_rejected_total: IntCounter,

    /// Transfer latency histogram
    pub transfer_duration: Histogram,

    /// History queries served
    pub history_queries_total: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total = IntCounter::with_opts(Opts::new(
            "ledger_transfers_total",
            "Committed transfers",
        ))?;
        registry.register(Box::new(transfers_total.clone()))?;

        let transfers_rejected_total = IntCounter::with_opts(Opts::new(
            "ledger_transfers_rejected_total",
            "Transfers rejected with an error",
        ))?;
        registry.register(Box::new(transfers_rejected_total.clone()))?;

        let transfer_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_transfer_duration_seconds",
                "Histogram of transfer latencies",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100]),
        )?;
        registry.register(Box::new(transfer_duration.clone()))?;

        let history_queries_total = IntCounter::with_opts(Opts::new(
            "ledger_history_queries_total",
            "History queries served",
        ))?;
        registry.register(Box::new(history_queries_total.clone()))?;

        Ok(Self {
            transfers_total,
            transfers_rejected_total,
            transfer_duration,
            history_queries_total,
            registry,
        })
    }

    /// Record a committed transfer and its latency
    pub fn record_transfer(&self, duration_seconds: f64) {
        self.transfers_total.inc();
        self.transfer_duration.observe(duration_seconds);
    }

    /// Record a rejected transfer
    pub fn record_transfer_rejected(&self) {
        self.transfers_rejected_total.inc();
    }

    /// Record a history query
    pub fn record_history_query(&self) {
        self.history_queries_total.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.transfers_total.get(), 0);
        assert_eq!(metrics.transfers_rejected_total.get(), 0);
    }

    #[test]
    fn test_record_transfer() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transfer(0.002);
        metrics.record_transfer(0.004);
        assert_eq!(metrics.transfers_total.get(), 2);
    }

    #[test]
    fn test_record_transfer_rejected() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transfer_rejected();
        assert_eq!(metrics.transfers_rejected_total.get(), 1);
        assert_eq!(metrics.transfers_total.get(), 0);
    }

    #[test]
    fn test_record_history_query() {
        let metrics = Metrics::new().unwrap();
        metrics.record_history_query();
        metrics.record_history_query();
        assert_eq!(metrics.history_queries_total.get(), 2);
    }
}
