// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature verification for wallet challenges.
//!
//! Signatures are 65-byte `r || s || v` values produced by `personal_sign`
//! (EIP-191). The signer is recovered from
//! `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`.

use alloy::primitives::Signature;

use super::WalletError;
use crate::models::WalletAddress;
use crate::storage::{Challenge, ChallengeRepository};

/// Recover the address that signed `message` with `personal_sign`.
///
/// Accepts hex with or without `0x`; `v` may be 0/1 or 27/28.
pub fn recover_signer(message: &str, signature: &str) -> Result<WalletAddress, WalletError> {
    let bytes = alloy::hex::decode(signature.trim())
        .map_err(|e| WalletError::Verification(format!("Invalid hex: {e}")))?;

    if bytes.len() != 65 {
        return Err(WalletError::Verification(format!(
            "Expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let signature = Signature::from_raw(&bytes)
        .map_err(|e| WalletError::Verification(format!("Invalid signature: {e}")))?;

    let recovered = signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| WalletError::Verification(format!("Recovery failed: {e}")))?;

    Ok(WalletAddress::from(recovered))
}

/// A challenge whose signature checked out but which has not been consumed.
#[derive(Debug, Clone)]
pub struct VerifiedChallenge {
    /// Recovered signer (equal to the claimed address)
    pub signer: WalletAddress,
    pub challenge: Challenge,
}

/// Verifies signatures over stored challenges.
#[derive(Clone)]
pub struct SignatureVerifier {
    challenges: ChallengeRepository,
}

impl SignatureVerifier {
    pub fn new(challenges: ChallengeRepository) -> Self {
        Self { challenges }
    }

    /// Check that `signature` over the challenge stored for `address` was
    /// produced by `address`.
    ///
    /// The challenge is left in place; call [`consume`](Self::consume) once
    /// the rest of the login has succeeded. On mismatch or malformed input
    /// the client can simply retry.
    pub fn verify(&self, address: &str, signature: &str) -> Result<VerifiedChallenge, WalletError> {
        let challenge = self
            .challenges
            .get(address)?
            .ok_or(WalletError::MissingChallenge)?;

        let recovered = recover_signer(&challenge.message, signature)?;
        if !recovered.matches(address) {
            tracing::info!(
                claimed = %address,
                recovered = %recovered,
                "Wallet signature does not match claimed address"
            );
            return Err(WalletError::SignatureMismatch);
        }

        Ok(VerifiedChallenge {
            signer: recovered,
            challenge,
        })
    }

    /// Consume a verified challenge.
    ///
    /// Only one caller can consume a given challenge; everyone else gets
    /// [`WalletError::MissingChallenge`], as does a caller whose challenge
    /// was replaced by a newer one in the meantime.
    pub fn consume(&self, verified: &VerifiedChallenge) -> Result<(), WalletError> {
        if !self.challenges.consume(&verified.challenge)? {
            return Err(WalletError::MissingChallenge);
        }

        let age = chrono::Utc::now() - verified.challenge.issued_at;
        tracing::debug!(
            address = %verified.signer,
            challenge_age_secs = age.num_seconds(),
            "Wallet challenge consumed"
        );
        Ok(())
    }
}
