//! World-state access layer
//!
//! The core never talks to storage directly; every operation goes
//! through the [`WorldState`] contract the host injects per invocation:
//! typed get/put plus a lexicographic range scan.
//!
//! # Keyspaces
//!
//! - `accounts` - Account records (key: account name)
//! - `transactions` - TransactionRecord entries (key: `<sender>_<tx_id>`)
//!
//! Separate keyspaces replace the flat-namespace `tx_` prefix
//! convention of earlier ledger generations while keeping the
//! transactions range-scannable.

use crate::{
    error::{Error, Result},
    Config,
};
use parking_lot::RwLock;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DBCompactionStyle, Direction, IteratorMode, Options, DB,
};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Logical namespace within the world state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyspace {
    /// Account records, keyed by account name
    Accounts,
    /// Transaction records, keyed by `<sender>_<tx_id>`
    Transactions,
}

impl Keyspace {
    /// All keyspaces, in declaration order
    pub const ALL: [Keyspace; 2] = [Keyspace::Accounts, Keyspace::Transactions];

    /// Stable storage name (RocksDB column family)
    pub fn name(self) -> &'static str {
        match self {
            Keyspace::Accounts => "accounts",
            Keyspace::Transactions => "transactions",
        }
    }
}

/// One scanned key/value entry
pub type KvEntry = (String, Vec<u8>);

/// Boxed scan iterator, lexicographic by key
pub type KvIter<'a> = Box<dyn Iterator<Item = Result<KvEntry>> + 'a>;

/// Get/put/range-scan contract against the world state.
///
/// The host guarantees that all reads and writes of one invocation are
/// isolated and committed (or discarded) as a unit, so implementations
/// need no transaction support of their own.
pub trait WorldState {
    /// Read the value at `key`, `None` if absent.
    fn get(&self, keyspace: Keyspace, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, overwriting any previous value.
    fn put(&self, keyspace: Keyspace, key: &str, value: &[u8]) -> Result<()>;

    /// Iterate entries with `start <= key`, and `key < end` when an end
    /// bound is given, in key order. An end bound at or before `start`
    /// yields an empty iteration.
    fn range_scan(&self, keyspace: Keyspace, start: &str, end: Option<&str>) -> Result<KvIter<'_>>;
}

/// In-memory world state.
///
/// One sorted map per keyspace. Used by the test suites and anywhere a
/// throwaway state snapshot is needed; scans clone the matched entries
/// so the locks are released before iteration begins.
#[derive(Debug, Default)]
pub struct MemoryState {
    accounts: RwLock<BTreeMap<String, Vec<u8>>>,
    transactions: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, keyspace: Keyspace) -> &RwLock<BTreeMap<String, Vec<u8>>> {
        match keyspace {
            Keyspace::Accounts => &self.accounts,
            Keyspace::Transactions => &self.transactions,
        }
    }
}

impl WorldState for MemoryState {
    fn get(&self, keyspace: Keyspace, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.map(keyspace).read().get(key).cloned())
    }

    fn put(&self, keyspace: Keyspace, key: &str, value: &[u8]) -> Result<()> {
        self.map(keyspace)
            .write()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn range_scan(&self, keyspace: Keyspace, start: &str, end: Option<&str>) -> Result<KvIter<'_>> {
        // An inverted range is empty, never a panic; BTreeMap::range
        // rejects start > end, so bail out before reaching it.
        if matches!(end, Some(e) if e <= start) {
            return Ok(Box::new(std::iter::empty()));
        }

        let upper = match end {
            Some(e) => Bound::Excluded(e),
            None => Bound::Unbounded,
        };

        let entries: Vec<KvEntry> = self
            .map(keyspace)
            .read()
            .range::<str, _>((Bound::Included(start), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

/// RocksDB-backed world state, one column family per keyspace.
pub struct RocksState {
    db: DB,
}

impl RocksState {
    /// Open or create the database under `config.data_dir`.
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_target_file_size_base(config.rocksdb.target_file_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        // Universal compaction for the write-mostly transaction log
        db_opts.set_compaction_style(DBCompactionStyle::Universal);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = Keyspace::ALL
            .iter()
            .map(|ks| ColumnFamilyDescriptor::new(ks.name(), Self::cf_options(*ks)))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)
            .map_err(|e| Error::Storage(e.to_string()))?;

        tracing::info!("Opened RocksDB world state at {:?}", path);

        Ok(Self { db })
    }

    fn cf_options(keyspace: Keyspace) -> Options {
        let mut opts = Options::default();
        match keyspace {
            Keyspace::Accounts => {
                // Balances are read on every transfer, favor decode speed
                opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
            }
            Keyspace::Transactions => {
                // Append-only history, favor size
                opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
                opts.set_bottommost_compression_type(rocksdb::DBCompressionType::Zstd);
            }
        }
        opts
    }

    fn cf_handle(&self, keyspace: Keyspace) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(keyspace.name())
            .ok_or_else(|| Error::Storage(format!("column family {} not found", keyspace.name())))
    }
}

impl WorldState for RocksState {
    fn get(&self, keyspace: Keyspace, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf_handle(keyspace)?;
        self.db
            .get_cf(cf, key.as_bytes())
            .map_err(|e| Error::StateRead(e.to_string()))
    }

    fn put(&self, keyspace: Keyspace, key: &str, value: &[u8]) -> Result<()> {
        let cf = self.cf_handle(keyspace)?;
        self.db
            .put_cf(cf, key.as_bytes(), value)
            .map_err(|e| Error::StateWrite(e.to_string()))?;

        tracing::debug!(keyspace = keyspace.name(), key, "state written");
        Ok(())
    }

    fn range_scan(&self, keyspace: Keyspace, start: &str, end: Option<&str>) -> Result<KvIter<'_>> {
        let cf = self.cf_handle(keyspace)?;
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(start.as_bytes(), Direction::Forward));

        let end_bytes: Option<Vec<u8>> = end.map(|e| e.as_bytes().to_vec());

        Ok(Box::new(
            iter.take_while(move |item| match (item, &end_bytes) {
                (Ok((key, _)), Some(end)) => key.as_ref() < end.as_slice(),
                // Faults pass through so they surface as RangeScan below
                _ => true,
            })
            .map(|item| {
                let (key, value) = item.map_err(|e| Error::RangeScan(e.to_string()))?;
                let key = String::from_utf8(key.to_vec())
                    .map_err(|e| Error::RangeScan(format!("non-utf8 key: {}", e)))?;
                Ok((key, value.to_vec()))
            }),
        ))
    }
}
