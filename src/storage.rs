//! Key-value storage layer using RocksDB

use crate::errors::{PersistenceError, PollaResult};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One mutation inside an atomic batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

#[derive(Clone)]
pub struct KvStorage {
    db: Arc<DB>,
}

impl KvStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> PollaResult<Self> {
        Self::open_with(path, false)
    }

    /// Open the database, optionally destroying any existing data first
    pub fn open_with<P: AsRef<Path>>(path: P, clear_on_start: bool) -> PollaResult<Self> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        if clear_on_start && path.exists() {
            info!(path = %path.display(), "Clearing existing database");
            DB::destroy(&opts, path)
                .map_err(|e| PersistenceError::OpenFailed(format!("{}: {}", path.display(), e)))?;
        }

        let db = DB::open(&opts, path)
            .map_err(|e| PersistenceError::OpenFailed(format!("{}: {}", path.display(), e)))?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn get(&self, key: &[u8]) -> PollaResult<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|e| PersistenceError::ReadFailed(e.to_string()).into())
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> PollaResult<()> {
        self.db.put(key, value)?;
        Ok(())
    }

    pub fn delete(&self, key: &[u8]) -> PollaResult<()> {
        self.db.delete(key)?;
        Ok(())
    }

    /// Apply all operations atomically
    pub fn write_batch(&self, ops: &[BatchOp]) -> PollaResult<()> {
        let mut batch = WriteBatch::default();
        for op in ops {
            match op {
                BatchOp::Put { key, value } => batch.put(key, value),
                BatchOp::Delete { key } => batch.delete(key),
            }
        }
        self.db.write(batch)?;
        Ok(())
    }

    /// All entries whose key starts with `prefix`, in key order
    pub fn scan_prefix(&self, prefix: &[u8]) -> PollaResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut entries = Vec::new();
        for item in self.db.iterator(IteratorMode::From(prefix, Direction::Forward)) {
            let (key, value) = item.map_err(|e| PersistenceError::ReadFailed(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }
}
