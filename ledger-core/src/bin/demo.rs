//! Standalone driver that plays the execution host
//!
//! Opens a RocksDB world state, seeds the ledger on first run, performs
//! one transfer, and prints balances plus the sender's history. Each
//! operation gets a fresh context with a unique transaction id, the way
//! the real host dispatches invocations.

use cbdc_ledger::{Config, HistoryIndex, LedgerEngine, Metrics, RocksState, TxContext};
use chrono::Utc;
use prometheus::{Encoder, TextEncoder};
use uuid::Uuid;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(data_dir = ?config.data_dir, "starting ledger demo");

    let state = RocksState::open(&config)?;
    let metrics = Metrics::new()?;
    let engine = LedgerEngine::new().with_metrics(metrics.clone());
    let index = HistoryIndex::new().with_metrics(metrics.clone());

    // Seed only on first run
    let ctx = TxContext::new(new_tx_id(), Utc::now(), &state);
    if engine.query_account(&ctx, "BankA").is_err() {
        let ctx = TxContext::new(new_tx_id(), Utc::now(), &state);
        engine.init_ledger(&ctx)?;
    }

    let ctx = TxContext::new(new_tx_id(), Utc::now(), &state);
    engine.transfer(&ctx, "BankA", "BankB", "100")?;

    let ctx = TxContext::new(new_tx_id(), Utc::now(), &state);
    println!("BankA balance: {}", engine.query_balance(&ctx, "BankA")?);
    println!("BankB balance: {}", engine.query_balance(&ctx, "BankB")?);

    let ctx = TxContext::new(new_tx_id(), Utc::now(), &state);
    let history = index.query_history(&ctx, "BankA")?;
    println!("BankA history ({} records):", history.len());
    for record in &history {
        println!(
            "  {} {} -> {} amount {} at {}",
            record.tx_id, record.sender, record.receiver, record.amount, record.timestamp
        );
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry().gather(), &mut buffer)?;
    println!("{}", String::from_utf8(buffer)?);

    Ok(())
}

/// Per-invocation unique transaction id, as the host would supply.
fn new_tx_id() -> String {
    Uuid::now_v7().to_string()
}
