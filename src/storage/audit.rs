// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login audit trail.
//!
//! Every successful wallet verification appends a [`LoginRecord`]. Records
//! are never updated or deleted; reads return the most recent entries for a
//! wallet, newest first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{InMemoryStore, KeyValueStore, StorageResult};
use crate::models::WalletAddress;

/// Maximum number of records returned per history query.
pub const LOGIN_HISTORY_LIMIT: usize = 10;

/// A login audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// Wallet that completed the login (lowercase).
    pub wallet_address: WalletAddress,
    /// When the login completed.
    pub timestamp: DateTime<Utc>,
    /// Origin of the request, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl LoginRecord {
    /// Create a record stamped with the current time.
    pub fn new(wallet_address: WalletAddress) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_address,
            timestamp: Utc::now(),
            ip_address: None,
        }
    }

    /// Set the request origin.
    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Repository for login records.
#[derive(Clone)]
pub struct LoginHistoryRepository {
    store: Arc<dyn KeyValueStore<LoginRecord>>,
}

impl LoginHistoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore<LoginRecord>>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::<LoginRecord>::new()))
    }

    /// Append a record.
    pub fn append(&self, record: &LoginRecord) -> StorageResult<()> {
        self.store.set(&record.id.to_string(), record.clone())
    }

    /// Most recent records for a wallet, newest first, at most `limit`.
    pub fn recent(&self, wallet: &WalletAddress, limit: usize) -> StorageResult<Vec<LoginRecord>> {
        let mut records = self
            .store
            .find(&|record: &LoginRecord| &record.wallet_address == wallet)?;

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn wallet(address: &str) -> WalletAddress {
        WalletAddress::parse(address).unwrap()
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let repo = LoginHistoryRepository::in_memory();
        let alice = wallet("0x70997970C51812dc3a010C7d01b50e0d17dc79C8");
        let bob = wallet("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let start = Utc::now() - Duration::hours(1);

        for minute in 0..15 {
            repo.append(
                &LoginRecord::new(alice.clone())
                    .at(start + Duration::minutes(minute))
                    .with_ip(Some("127.0.0.1".into())),
            )
            .unwrap();
        }
        repo.append(&LoginRecord::new(bob.clone())).unwrap();

        let records = repo.recent(&alice, LOGIN_HISTORY_LIMIT).unwrap();
        assert_eq!(records.len(), LOGIN_HISTORY_LIMIT);
        assert!(records.iter().all(|r| r.wallet_address == alice));
        assert_eq!(records[0].timestamp, start + Duration::minutes(14));
        assert!(records
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp));

        assert_eq!(repo.recent(&bob, LOGIN_HISTORY_LIMIT).unwrap().len(), 1);
    }

    #[test]
    fn record_serializes_in_camel_case() {
        let record = LoginRecord::new(wallet("0x70997970C51812dc3a010C7d01b50e0d17dc79C8"))
            .with_ip(Some("10.0.0.1".into()));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json["walletAddress"],
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
        assert_eq!(json["ipAddress"], "10.0.0.1");
        assert!(json.get("timestamp").is_some());
    }
}
