// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet ownership proofs.
//!
//! This module provides:
//! - Challenge issuance: a random nonce embedded in a fixed message, stored
//!   per requested address
//! - Signature verification: EIP-191 `personal_sign` recovery of the signer
//!   over the stored message, compared with the claimed address
//!
//! Binding the recovered wallet to an account is not done here; see
//! `login_flow`.

pub mod challenge;
pub mod error;
pub mod signature;

pub use challenge::{challenge_message, ChallengeIssuer, NONCE_LEN};
pub use error::WalletError;
pub use signature::{recover_signer, SignatureVerifier, VerifiedChallenge};
