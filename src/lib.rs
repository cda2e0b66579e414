// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! VeriChain Server - Wallet-linked login service
//!
//! An account links an email and password to one wallet address. Logging in
//! takes both factors: the password, then a signature over a one-time
//! challenge made with the linked wallet. Only then is a session token
//! issued.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing and session tokens
//! - `config` - Environment configuration
//! - `login_flow` - Registration and the two-factor login
//! - `storage` - Key-value store abstraction and repositories
//! - `wallet` - Challenge issuance and signature recovery

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod login_flow;
pub mod models;
pub mod state;
pub mod storage;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;
