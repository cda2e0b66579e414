// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`/`Deserialize` and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters). Addresses are validated on construction and kept in
//! lowercase so that comparisons are case-insensitive by construction.
//!
//! ## Field Names
//!
//! Request and response bodies use camelCase. `walletAddress` also accepts
//! the `publicAddress` alias used by earlier clients.

use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage::LoginRecord;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Error returned when a string is not a valid wallet address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid wallet address: {0}")]
pub struct InvalidWalletAddress(pub String);

/// Ethereum-compatible wallet address, normalized to lowercase.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
///
/// # Example
///
/// ```rust,ignore
/// let addr = WalletAddress::parse("0x70997970C51812dc3a010C7d01b50e0d17dc79C8")?;
/// assert_eq!(addr.as_str(), "0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and normalize a wallet address.
    pub fn parse(value: &str) -> Result<Self, InvalidWalletAddress> {
        let value = value.trim();
        let Some(hex) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
        else {
            return Err(InvalidWalletAddress(format!("{value} (missing 0x prefix)")));
        };

        let address =
            Address::from_str(hex).map_err(|e| InvalidWalletAddress(format!("{value} ({e})")))?;
        Ok(Self::from(address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw, client-supplied address.
    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Address> for WalletAddress {
    fn from(value: Address) -> Self {
        WalletAddress(alloy::hex::encode_prefixed(value))
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = InvalidWalletAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Registration & Password Login
// =============================================================================

/// Request to register a new account.
///
/// Fields default to empty so that missing values are reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Wallet that will be linked to the account for its lifetime.
    #[serde(default, alias = "publicAddress")]
    pub wallet_address: String,
}

/// Response after a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

/// Password step of the login flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response after the password step.
///
/// The client signs with `associated_address` and presents `attempt_id` when
/// submitting the signature.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Wallet linked to the account (lowercase).
    pub associated_address: WalletAddress,
    /// Identifies this password-verified login attempt.
    pub attempt_id: Uuid,
}

// =============================================================================
// Wallet Challenge
// =============================================================================

/// Request a challenge message for a wallet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest {
    #[serde(default, alias = "publicAddress")]
    pub wallet_address: String,
}

/// Challenge message the wallet must sign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub message_to_sign: String,
}

/// Signed challenge submitted to complete the login.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignatureRequest {
    /// Address the client claims signed the challenge.
    #[serde(default, alias = "publicAddress")]
    pub wallet_address: String,
    /// 65-byte `r || s || v` signature, hex encoded.
    #[serde(default)]
    pub signature: String,
    /// Attempt id returned by the password step.
    #[serde(default)]
    pub attempt_id: Option<Uuid>,
}

/// Response after a successful signature verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifySignatureResponse {
    pub success: bool,
    pub message: String,
    /// Session token, sent back as `Authorization: Bearer <token>`.
    pub token: String,
}

// =============================================================================
// Login History
// =============================================================================

/// Recent logins for the authenticated wallet, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginHistoryResponse {
    pub logins: Vec<LoginRecord>,
}
