// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable [`KeyValueStore`] backed by redb (pure Rust, ACID).
//!
//! Each store is one table in a shared database file. Values are stored as
//! JSON. Every mutation runs in its own write transaction; redb serializes
//! writers, so `insert_if_absent` and `delete_if` are atomic.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

use super::{KeyValueStore, StorageError, StorageResult};

/// Database file created inside the data directory.
pub const DATABASE_FILE: &str = "verichain.redb";

pub const ACCOUNTS_TABLE: &str = "accounts";
pub const LOGIN_HISTORY_TABLE: &str = "login_history";

type Table = TableDefinition<'static, &'static str, &'static [u8]>;

fn backend(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// Open (or create) the database file at `path`.
pub fn open_database(path: &Path) -> StorageResult<Arc<Database>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(backend)?;
    }
    let db = Database::create(path).map_err(backend)?;
    Ok(Arc::new(db))
}

/// One redb table holding JSON-encoded values.
pub struct RedbStore<V> {
    db: Arc<Database>,
    table: Table,
    _value: PhantomData<fn() -> V>,
}

impl<V> RedbStore<V> {
    /// Bind to `table_name`, creating the table so later reads don't fail.
    pub fn open(db: Arc<Database>, table_name: &'static str) -> StorageResult<Self> {
        let table: Table = TableDefinition::new(table_name);
        let write_txn = db.begin_write().map_err(backend)?;
        {
            let _ = write_txn.open_table(table).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;

        Ok(Self {
            db,
            table,
            _value: PhantomData,
        })
    }
}

impl<V> KeyValueStore<V> for RedbStore<V>
where
    V: Serialize + DeserializeOwned + Send + Sync,
{
    fn get(&self, key: &str) -> StorageResult<Option<V>> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(self.table).map_err(backend)?;
        match table.get(key).map_err(backend)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: V) -> StorageResult<()> {
        let json = serde_json::to_vec(&value)?;
        let write_txn = self.db.begin_write().map_err(backend)?;
        {
            let mut table = write_txn.open_table(self.table).map_err(backend)?;
            table.insert(key, json.as_slice()).map_err(backend)?;
        }
        write_txn.commit().map_err(backend)?;
        Ok(())
    }

    fn insert_if_absent(&self, key: &str, value: V) -> StorageResult<bool> {
        let json = serde_json::to_vec(&value)?;
        let write_txn = self.db.begin_write().map_err(backend)?;
        let inserted = {
            let mut table = write_txn.open_table(self.table).map_err(backend)?;
            if table.get(key).map_err(backend)?.is_some() {
                false
            } else {
                table.insert(key, json.as_slice()).map_err(backend)?;
                true
            }
        };

        if inserted {
            write_txn.commit().map_err(backend)?;
        } else {
            write_txn.abort().map_err(backend)?;
        }
        Ok(inserted)
    }

    fn delete(&self, key: &str) -> StorageResult<Option<V>> {
        self.delete_if(key, &|_| true)
    }

    fn delete_if(&self, key: &str, predicate: &dyn Fn(&V) -> bool) -> StorageResult<Option<V>> {
        let write_txn = self.db.begin_write().map_err(backend)?;
        let removed = {
            let mut table = write_txn.open_table(self.table).map_err(backend)?;
            let current: Option<V> = match table.get(key).map_err(backend)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match current {
                Some(value) if predicate(&value) => {
                    table.remove(key).map_err(backend)?;
                    Some(value)
                }
                _ => None,
            }
        };

        if removed.is_some() {
            write_txn.commit().map_err(backend)?;
        } else {
            write_txn.abort().map_err(backend)?;
        }
        Ok(removed)
    }

    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> StorageResult<Vec<V>> {
        let read_txn = self.db.begin_read().map_err(backend)?;
        let table = read_txn.open_table(self.table).map_err(backend)?;

        let mut matches = Vec::new();
        for entry in table.iter().map_err(backend)? {
            let (_, value) = entry.map_err(backend)?;
            let value: V = serde_json::from_slice(value.value())?;
            if predicate(&value) {
                matches.push(value);
            }
        }
        Ok(matches)
    }
}
