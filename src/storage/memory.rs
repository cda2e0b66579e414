// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`KeyValueStore`] backend.
//!
//! All data is lost when the process terminates.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageError, StorageResult};

/// Thread-safe in-memory map.
#[derive(Debug)]
pub struct InMemoryStore<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> InMemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::LockPoisoned(e.to_string())
}

impl<V> KeyValueStore<V> for InMemoryStore<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> StorageResult<Option<V>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: V) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn insert_if_absent(&self, key: &str, value: V) -> StorageResult<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        match entries.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    fn delete(&self, key: &str) -> StorageResult<Option<V>> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.remove(key))
    }

    fn delete_if(&self, key: &str, predicate: &dyn Fn(&V) -> bool) -> StorageResult<Option<V>> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.get(key).is_some_and(|v| predicate(v)) {
            Ok(entries.remove(key))
        } else {
            Ok(None)
        }
    }

    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> StorageResult<Vec<V>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.values().filter(|v| predicate(v)).cloned().collect())
    }
}
