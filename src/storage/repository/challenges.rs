// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge repository.
//!
//! One outstanding challenge per address string. The key is the address
//! exactly as the client sent it, so `0xABC…` and `0xabc…` are distinct
//! slots here even though account lookup treats them as the same wallet.
//!
//! Challenges carry `issued_at` but never expire.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{InMemoryStore, KeyValueStore, StorageResult};

/// A pending sign-in challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
    /// Address string the challenge was requested for (store key)
    pub address: String,
    /// Hex-encoded random nonce embedded in `message`
    pub nonce: String,
    /// Exact text the wallet must sign
    pub message: String,
    pub issued_at: DateTime<Utc>,
}

/// Repository for challenge operations.
#[derive(Clone)]
pub struct ChallengeRepository {
    store: Arc<dyn KeyValueStore<Challenge>>,
}

impl ChallengeRepository {
    pub fn new(store: Arc<dyn KeyValueStore<Challenge>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::<Challenge>::new()))
    }

    /// Store a challenge, replacing any previous one for the same address.
    pub fn put(&self, challenge: &Challenge) -> StorageResult<()> {
        self.store.set(&challenge.address, challenge.clone())
    }

    pub fn get(&self, address: &str) -> StorageResult<Option<Challenge>> {
        self.store.get(address)
    }

    /// Consume `challenge`. Returns `false` if it was already consumed or
    /// has been replaced by a newer challenge for the same address.
    pub fn consume(&self, challenge: &Challenge) -> StorageResult<bool> {
        let removed = self
            .store
            .delete_if(&challenge.address, &|stored: &Challenge| {
                stored.nonce == challenge.nonce
            })?;
        Ok(removed.is_some())
    }
}
