// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Protocol logic never touches a concrete store. Every entity lives behind a
//! [`KeyValueStore`], a keyed map with these capabilities:
//!
//! - `get` a value by key
//! - `set` (insert or overwrite) a value
//! - `insert_if_absent`, which never overwrites
//! - `delete` a value, returning what was removed
//! - `delete_if` the stored value still matches a predicate
//! - `find` every value matching a predicate
//!
//! `insert_if_absent` and `delete_if` are atomic: the check and the write
//! happen under one lock (or one write transaction). Single-use records are
//! consumed through them so concurrent requests cannot both succeed.
//!
//! [`InMemoryStore`] is the default backend. [`RedbStore`] keeps accounts and
//! login history on disk when a data directory is configured.
//!
//! ## Layout
//!
//! ```text
//! accounts        email        -> Account
//! challenges      address      -> Challenge    (exact client string)
//! login_attempts  email        -> LoginAttempt (one per account)
//! login_history   record_id    -> LoginRecord  (append-only)
//! ```

pub mod audit;
pub mod memory;
pub mod redb_store;
pub mod repository;

pub use audit::{LoginHistoryRepository, LoginRecord, LOGIN_HISTORY_LIMIT};
pub use memory::InMemoryStore;
pub use redb_store::RedbStore;
pub use repository::{
    Account, AccountRepository, AttemptRepository, Challenge, ChallengeRepository, LoginAttempt,
    ATTEMPT_TTL_SECS,
};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A lock guarding an in-memory map was poisoned by a panicking writer
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
    /// Any failure reported by a non-memory backend
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// A stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Keyed map abstraction shared by all repositories.
pub trait KeyValueStore<V>: Send + Sync {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<V>>;

    /// Insert or overwrite the value stored under `key`.
    fn set(&self, key: &str, value: V) -> StorageResult<()>;

    /// Insert `value` only if `key` is vacant. Returns whether it was stored.
    fn insert_if_absent(&self, key: &str, value: V) -> StorageResult<bool>;

    /// Remove the value stored under `key`, returning it if present.
    fn delete(&self, key: &str) -> StorageResult<Option<V>>;

    /// Remove the value stored under `key` only if it satisfies `predicate`,
    /// returning it. The check and the removal are one atomic step.
    fn delete_if(&self, key: &str, predicate: &dyn Fn(&V) -> bool) -> StorageResult<Option<V>>;

    /// Return every value matching `predicate`, in no particular order.
    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> StorageResult<Vec<V>>;
}
