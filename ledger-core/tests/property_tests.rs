//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Value conservation: transfers move value, never create it
//! - Non-negative balances at all observable times
//! - Rejected transfers leave every balance untouched
//! - History completeness: every transfer is visible to both parties

use cbdc_ledger::{
    Account, Error, HistoryIndex, Keyspace, LedgerEngine, MemoryState, TxContext, WorldState,
};
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

const ACCOUNTS: [&str; 4] = ["BankA", "BankB", "BankC", "BankD"];

fn ts() -> DateTime<Utc> {
    "2026-01-01T00:00:00Z".parse().unwrap()
}

/// Seed one account per name with the given balance in cents.
fn seed(balances_cents: &[u64]) -> MemoryState {
    let state = MemoryState::new();
    for (name, cents) in ACCOUNTS.iter().zip(balances_cents) {
        let account = Account::new(*name, Decimal::new(*cents as i64, 2));
        let bytes = serde_json::to_vec(&account).unwrap();
        state.put(Keyspace::Accounts, name, &bytes).unwrap();
    }
    state
}

fn total_balance(engine: &LedgerEngine, state: &MemoryState) -> Decimal {
    let ctx = TxContext::new("tx-sum", ts(), state);
    ACCOUNTS
        .iter()
        .map(|name| engine.query_balance(&ctx, name).unwrap())
        .sum()
}

/// Strategy for initial balances (cents)
fn balances_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..10_000_00, ACCOUNTS.len())
}

/// Strategy for a transfer instruction: (sender, receiver, amount cents)
fn transfer_strategy() -> impl Strategy<Value = (usize, usize, u64)> {
    (0..ACCOUNTS.len(), 0..ACCOUNTS.len(), 1u64..5_000_00)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: any mix of accepted and rejected transfers conserves
    /// total value and never drives a balance negative
    #[test]
    fn prop_conservation_and_nonnegative(
        balances in balances_strategy(),
        transfers in prop::collection::vec(transfer_strategy(), 1..30),
    ) {
        let state = seed(&balances);
        let engine = LedgerEngine::new();
        let initial_total = total_balance(&engine, &state);

        for (i, (from, to, cents)) in transfers.iter().enumerate() {
            let amount = Decimal::new(*cents as i64, 2).to_string();
            let ctx = TxContext::new(format!("tx-{i:04}"), ts(), &state);
            // Insufficient-balance rejections are expected here
            let _ = engine.transfer(&ctx, ACCOUNTS[*from], ACCOUNTS[*to], &amount);
        }

        prop_assert_eq!(total_balance(&engine, &state), initial_total);

        let ctx = TxContext::new("tx-check", ts(), &state);
        for name in ACCOUNTS {
            prop_assert!(engine.query_balance(&ctx, name).unwrap() >= Decimal::ZERO);
        }
    }

    /// Property: non-positive amounts always fail with InvalidAmount
    /// and change nothing
    #[test]
    fn prop_nonpositive_amount_rejected(
        balances in balances_strategy(),
        cents in 0i64..1_000_000,
    ) {
        let state = seed(&balances);
        let engine = LedgerEngine::new();
        let before = total_balance(&engine, &state);

        let amount = Decimal::new(-cents, 2).to_string();
        let ctx = TxContext::new("tx-neg", ts(), &state);
        let err = engine.transfer(&ctx, "BankA", "BankB", &amount).unwrap_err();

        prop_assert!(matches!(err, Error::InvalidAmount(_)));
        prop_assert_eq!(total_balance(&engine, &state), before);
    }

    /// Property: unparseable amounts always fail with InvalidAmount
    #[test]
    fn prop_garbage_amount_rejected(raw in "[a-zA-Z#%]{1,12}") {
        let state = seed(&[100_00, 100_00, 100_00, 100_00]);
        let engine = LedgerEngine::new();

        let ctx = TxContext::new("tx-garbage", ts(), &state);
        let err = engine.transfer(&ctx, "BankA", "BankB", &raw).unwrap_err();
        prop_assert!(matches!(err, Error::InvalidAmount(_)));
    }

    /// Property: over-drawing fails with InsufficientBalance and leaves
    /// both balances untouched
    #[test]
    fn prop_overdraw_rejected(
        balance_cents in 0u64..1_000_00,
        excess_cents in 1u64..1_000_00,
    ) {
        let state = seed(&[balance_cents, 0, 0, 0]);
        let engine = LedgerEngine::new();

        let amount = Decimal::new((balance_cents + excess_cents) as i64, 2).to_string();
        let ctx = TxContext::new("tx-over", ts(), &state);
        let err = engine.transfer(&ctx, "BankA", "BankB", &amount).unwrap_err();
        prop_assert!(
            matches!(err, Error::InsufficientBalance { .. }),
            "expected InsufficientBalance, got {:?}",
            err
        );

        let ctx = TxContext::new("tx-check", ts(), &state);
        prop_assert_eq!(
            engine.query_balance(&ctx, "BankA").unwrap(),
            Decimal::new(balance_cents as i64, 2)
        );
        prop_assert_eq!(engine.query_balance(&ctx, "BankB").unwrap(), Decimal::ZERO);
    }

    /// Property: history returns exactly the records each participant
    /// was part of, and repeated queries agree
    #[test]
    fn prop_history_complete(
        transfers in prop::collection::vec(transfer_strategy(), 1..25),
    ) {
        // Balances large enough that every transfer succeeds
        let state = seed(&[u32::MAX as u64; 4]);
        let engine = LedgerEngine::new();
        let index = HistoryIndex::new();

        for (i, (from, to, cents)) in transfers.iter().enumerate() {
            let amount = Decimal::new(*cents as i64, 2).to_string();
            let ctx = TxContext::new(format!("tx-{i:04}"), ts(), &state);
            engine
                .transfer(&ctx, ACCOUNTS[*from], ACCOUNTS[*to], &amount)
                .unwrap();
        }

        let ctx = TxContext::new("tx-q", ts(), &state);
        for (idx, name) in ACCOUNTS.iter().enumerate() {
            let expected = transfers
                .iter()
                .filter(|(from, to, _)| *from == idx || *to == idx)
                .count();

            let records = index.query_history(&ctx, name).unwrap();
            prop_assert_eq!(records.len(), expected);
            prop_assert!(records.iter().all(|r| r.involves(name)));

            let again = index.query_history(&ctx, name).unwrap();
            prop_assert_eq!(records, again);
        }
    }

    /// Property: self-transfers of any valid amount leave the balance
    /// numerically unchanged and append exactly one record
    #[test]
    fn prop_self_transfer_noop(
        balance_cents in 1u64..1_000_000_00,
        fraction in 1u64..100,
    ) {
        let amount_cents = (balance_cents * fraction / 100).max(1);
        let state = seed(&[balance_cents, 0, 0, 0]);
        let engine = LedgerEngine::new();
        let index = HistoryIndex::new();

        let amount = Decimal::new(amount_cents as i64, 2).to_string();
        let ctx = TxContext::new("tx-self", ts(), &state);
        engine.transfer(&ctx, "BankA", "BankA", &amount).unwrap();

        let ctx = TxContext::new("tx-check", ts(), &state);
        prop_assert_eq!(
            engine.query_balance(&ctx, "BankA").unwrap(),
            Decimal::new(balance_cents as i64, 2)
        );
        prop_assert_eq!(index.query_history(&ctx, "BankA").unwrap().len(), 1);
    }
}

mod integration_tests {
    use super::*;
    use cbdc_ledger::{Config, RocksState};

    #[test]
    fn test_seed_transfer_query_lifecycle() {
        let state = MemoryState::new();
        let engine = LedgerEngine::new();
        let index = HistoryIndex::new();

        let ctx = TxContext::new("tx-0", ts(), &state);
        engine.init_ledger(&ctx).unwrap();

        let ctx = TxContext::new("tx-1", ts(), &state);
        assert_eq!(
            engine.query_balance(&ctx, "BankA").unwrap(),
            Decimal::from(1_000_000)
        );
        assert_eq!(
            engine.query_balance(&ctx, "BankB").unwrap(),
            Decimal::from(500_000)
        );

        let ctx = TxContext::new("tx-2", ts(), &state);
        engine.transfer(&ctx, "BankA", "BankB", "100").unwrap();

        let ctx = TxContext::new("tx-3", ts(), &state);
        assert_eq!(
            engine.query_balance(&ctx, "BankA").unwrap(),
            Decimal::from(999_900)
        );
        assert_eq!(
            engine.query_balance(&ctx, "BankB").unwrap(),
            Decimal::from(500_100)
        );

        let history = index.query_history(&ctx, "BankA").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, Decimal::from(100));
        assert_eq!(history[0].tx_id, "tx-2");
    }

    #[test]
    fn test_lifecycle_on_rocksdb() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();

        let state = RocksState::open(&config).unwrap();
        let engine = LedgerEngine::new();
        let index = HistoryIndex::new();

        let ctx = TxContext::new("tx-0", ts(), &state);
        engine.init_ledger(&ctx).unwrap();

        let ctx = TxContext::new("tx-1", ts(), &state);
        engine.transfer(&ctx, "BankA", "BankB", "250.50").unwrap();

        let ctx = TxContext::new("tx-2", ts(), &state);
        assert_eq!(
            engine.query_balance(&ctx, "BankA").unwrap(),
            Decimal::new(999_749_50, 2)
        );
        assert_eq!(
            engine.query_balance(&ctx, "BankB").unwrap(),
            Decimal::new(500_250_50, 2)
        );

        let history = index.query_history(&ctx, "BankB").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, Decimal::new(250_50, 2));
    }

    #[test]
    fn test_missing_receiver_rejected_end_to_end() {
        let state = MemoryState::new();
        let engine = LedgerEngine::new();

        let ctx = TxContext::new("tx-0", ts(), &state);
        engine.init_ledger(&ctx).unwrap();

        let ctx = TxContext::new("tx-1", ts(), &state);
        let err = engine.transfer(&ctx, "BankA", "BankC", "10").unwrap_err();
        assert!(matches!(err, Error::ReceiverNotFound { .. }));

        let ctx = TxContext::new("tx-2", ts(), &state);
        assert_eq!(
            engine.query_balance(&ctx, "BankA").unwrap(),
            Decimal::from(1_000_000)
        );
        assert_eq!(
            engine.query_balance(&ctx, "BankB").unwrap(),
            Decimal::from(500_000)
        );
    }
}
