//! Ledger engine: seeding, transfers, and account queries
//!
//! The engine is stateless; every operation takes a [`TxContext`] and
//! runs synchronously to completion. Atomicity across the multi-key
//! writes of a transfer is the host's commit, not ours - the engine
//! stages writes through the context's world state and never rolls
//! back.

use crate::{
    context::TxContext,
    error::{Error, Result},
    metrics::Metrics,
    state::Keyspace,
    types::{Account, TransactionRecord},
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Instant;

/// Accounts seeded by [`LedgerEngine::init_ledger`]
pub const GENESIS_ACCOUNTS: [(&str, i64); 2] = [("BankA", 1_000_000), ("BankB", 500_000)];

/// Stateless ledger engine
#[derive(Default)]
pub struct LedgerEngine {
    /// Metrics handle (if enabled)
    metrics: Option<Metrics>,
}

impl LedgerEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Seed the ledger with the genesis accounts.
    ///
    /// Any write failure aborts the call; partial seeding is covered by
    /// the host's all-or-nothing commit.
    pub fn init_ledger(&self, ctx: &TxContext<'_>) -> Result<()> {
        for (name, balance) in GENESIS_ACCOUNTS {
            let account = Account::new(name, Decimal::from(balance));
            self.put_account(ctx, &account)?;
        }

        tracing::info!(accounts = GENESIS_ACCOUNTS.len(), "ledger seeded");
        Ok(())
    }

    /// Read an account record.
    ///
    /// Absent keys and store read faults both surface as
    /// [`Error::AccountNotFound`]; a read fault is logged before being
    /// folded. Bytes that do not decode as an Account surface as
    /// [`Error::Deserialization`].
    pub fn query_account(&self, ctx: &TxContext<'_>, name: &str) -> Result<Account> {
        let bytes = match ctx.state().get(Keyspace::Accounts, name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Err(Error::AccountNotFound(name.to_string())),
            Err(e) => {
                tracing::warn!(account = name, error = %e, "state read failed during lookup");
                return Err(Error::AccountNotFound(name.to_string()));
            }
        };

        serde_json::from_slice(&bytes).map_err(Error::Deserialization)
    }

    /// Read an account's balance.
    pub fn query_balance(&self, ctx: &TxContext<'_>, name: &str) -> Result<Decimal> {
        Ok(self.query_account(ctx, name)?.balance)
    }

    /// Move `amount_text` worth of value from `sender` to `receiver`
    /// and record the transfer in the history keyspace.
    ///
    /// A failure writing the history record fails the whole transfer;
    /// the host then discards the balance writes with it, so balances
    /// and history cannot diverge.
    pub fn transfer(
        &self,
        ctx: &TxContext<'_>,
        sender: &str,
        receiver: &str,
        amount_text: &str,
    ) -> Result<()> {
        let started = Instant::now();
        let result = self.execute_transfer(ctx, sender, receiver, amount_text);

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(()) => metrics.record_transfer(started.elapsed().as_secs_f64()),
                Err(_) => metrics.record_transfer_rejected(),
            }
        }

        result
    }

    fn execute_transfer(
        &self,
        ctx: &TxContext<'_>,
        sender: &str,
        receiver: &str,
        amount_text: &str,
    ) -> Result<()> {
        let amount = parse_amount(amount_text)?;

        let mut sender_account = self
            .query_account(ctx, sender)
            .map_err(|e| Error::sender_not_found(sender, e))?;
        let mut receiver_account = self
            .query_account(ctx, receiver)
            .map_err(|e| Error::receiver_not_found(receiver, e))?;

        if sender_account.balance < amount {
            return Err(Error::InsufficientBalance {
                account: sender.to_string(),
                available: sender_account.balance,
                requested: amount,
            });
        }

        if sender == receiver {
            // Self-transfer: debit and credit land on the same account
            // value, so the committed balance is unchanged.
            sender_account.balance -= amount;
            sender_account.balance += amount;
            self.put_account(ctx, &sender_account)?;
        } else {
            sender_account.balance -= amount;
            receiver_account.balance += amount;
            self.put_account(ctx, &sender_account)?;
            self.put_account(ctx, &receiver_account)?;
        }

        let record = TransactionRecord {
            tx_id: ctx.tx_id().to_string(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount,
            timestamp: ctx.timestamp(),
        };
        let bytes = serde_json::to_vec(&record).map_err(Error::Serialization)?;
        ctx.state()
            .put(Keyspace::Transactions, &record.key(), &bytes)?;

        tracing::info!(
            tx_id = ctx.tx_id(),
            sender,
            receiver,
            amount = %amount,
            "transfer recorded"
        );

        Ok(())
    }

    fn put_account(&self, ctx: &TxContext<'_>, account: &Account) -> Result<()> {
        let bytes = serde_json::to_vec(account).map_err(Error::Serialization)?;
        ctx.state().put(Keyspace::Accounts, &account.name, &bytes)
    }
}

/// Parse a transfer amount, rejecting anything non-positive.
fn parse_amount(text: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(text).map_err(|_| Error::InvalidAmount(text.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(text.to_string()));
    }
    Ok(amount)
}
