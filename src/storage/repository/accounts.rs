// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account repository.
//!
//! Accounts are keyed by email. They are created once at registration and
//! never modified or deleted afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{InMemoryStore, KeyValueStore, StorageResult};
use crate::auth::PasswordHash;
use crate::models::WalletAddress;

/// A registered identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Unique key
    pub email: String,
    /// Salted hash of the password (never the password itself)
    pub password_hash: PasswordHash,
    /// The only wallet allowed to complete verification for this account
    pub wallet_address: WalletAddress,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

/// Repository for account operations.
#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn KeyValueStore<Account>>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn KeyValueStore<Account>>) -> Self {
        Self { store }
    }

    /// Repository backed by a fresh in-memory map.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::<Account>::new()))
    }

    /// Check if an account exists for this email.
    pub fn exists(&self, email: &str) -> StorageResult<bool> {
        Ok(self.store.get(email)?.is_some())
    }

    /// Get an account by email.
    pub fn get(&self, email: &str) -> StorageResult<Option<Account>> {
        self.store.get(email)
    }

    /// Store a new account. Returns `false` (and leaves the existing
    /// account untouched) when the email is already registered.
    pub fn create(&self, account: &Account) -> StorageResult<bool> {
        self.store.insert_if_absent(&account.email, account.clone())
    }

    /// Find the account linked to a wallet address (case-insensitive).
    pub fn find_by_address(&self, address: &str) -> StorageResult<Option<Account>> {
        let matches = self
            .store
            .find(&|account: &Account| account.wallet_address.matches(address))?;
        Ok(matches.into_iter().next())
    }
}
