// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login attempt repository.
//!
//! A login attempt is created when the password step succeeds and records
//! which account (and therefore which wallet) the signature step has to
//! match. Attempts are keyed by email: a new password login replaces the
//! previous attempt for that account. An attempt is removed when the flow
//! authenticates or fails the wallet binding check, and is ignored once it
//! is older than [`ATTEMPT_TTL_SECS`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{InMemoryStore, KeyValueStore, StorageResult};
use crate::models::WalletAddress;

/// Seconds a password-verified attempt stays usable for the signature step.
pub const ATTEMPT_TTL_SECS: i64 = 300;

/// A password-verified login awaiting its wallet signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginAttempt {
    pub attempt_id: Uuid,
    /// Email of the password-verified account
    pub email: String,
    /// Wallet registered to that account
    pub wallet_address: WalletAddress,
    pub started_at: DateTime<Utc>,
}

impl LoginAttempt {
    pub fn new(email: impl Into<String>, wallet_address: WalletAddress) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            email: email.into(),
            wallet_address,
            started_at: Utc::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at > Duration::seconds(ATTEMPT_TTL_SECS)
    }
}

/// Repository for login attempts.
#[derive(Clone)]
pub struct AttemptRepository {
    store: Arc<dyn KeyValueStore<LoginAttempt>>,
}

impl AttemptRepository {
    pub fn new(store: Arc<dyn KeyValueStore<LoginAttempt>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::<LoginAttempt>::new()))
    }

    /// Store `attempt`, replacing any earlier attempt for the same email.
    pub fn create(&self, attempt: &LoginAttempt) -> StorageResult<()> {
        self.store.set(&attempt.email, attempt.clone())
    }

    /// Look up a live attempt by id. Expired or replaced attempts are `None`.
    pub fn get(&self, attempt_id: Uuid) -> StorageResult<Option<LoginAttempt>> {
        let now = Utc::now();
        let found = self
            .store
            .find(&|a: &LoginAttempt| a.attempt_id == attempt_id)?;
        Ok(found.into_iter().find(|a| !a.is_expired_at(now)))
    }

    /// Remove `attempt` so it cannot be completed again.
    ///
    /// Returns `false` if another request already finished it or a newer
    /// login replaced it.
    pub fn finish(&self, attempt: &LoginAttempt) -> StorageResult<bool> {
        let removed = self
            .store
            .delete_if(&attempt.email, &|stored: &LoginAttempt| {
                stored.attempt_id == attempt.attempt_id
            })?;
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> WalletAddress {
        WalletAddress::parse("0x70997970C51812dc3a010C7d01b50e0d17dc79C8").unwrap()
    }

    #[test]
    fn create_get_finish() {
        let repo = AttemptRepository::in_memory();
        let attempt = LoginAttempt::new("a@x.com", alice());

        repo.create(&attempt).unwrap();
        assert_eq!(repo.get(attempt.attempt_id).unwrap(), Some(attempt.clone()));

        assert!(repo.finish(&attempt).unwrap());
        assert!(!repo.finish(&attempt).unwrap());
        assert_eq!(repo.get(attempt.attempt_id).unwrap(), None);
    }

    #[test]
    fn newer_attempt_replaces_older_one() {
        let store = Arc::new(InMemoryStore::<LoginAttempt>::new());
        let repo = AttemptRepository::new(store.clone());

        let first = LoginAttempt::new("a@x.com", alice());
        let second = LoginAttempt::new("a@x.com", alice());
        repo.create(&first).unwrap();
        repo.create(&second).unwrap();

        assert_eq!(repo.get(first.attempt_id).unwrap(), None);
        assert!(!repo.finish(&first).unwrap());
        assert_eq!(repo.get(second.attempt_id).unwrap(), Some(second));
        assert_eq!(store.find(&|_| true).unwrap().len(), 1);
    }

    #[test]
    fn expired_attempt_is_not_returned() {
        let repo = AttemptRepository::in_memory();
        let mut attempt = LoginAttempt::new("a@x.com", alice());
        attempt.started_at = Utc::now() - Duration::seconds(ATTEMPT_TTL_SECS + 1);
        repo.create(&attempt).unwrap();

        assert_eq!(repo.get(attempt.attempt_id).unwrap(), None);
    }

    #[test]
    fn expiry_boundary() {
        let attempt = LoginAttempt::new("a@x.com", alice());
        let deadline = attempt.started_at + Duration::seconds(ATTEMPT_TTL_SECS);

        assert!(!attempt.is_expired_at(deadline));
        assert!(attempt.is_expired_at(deadline + Duration::seconds(1)));
    }
}
