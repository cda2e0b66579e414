// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge issuance.
//!
//! A challenge is only issued for an address linked to a registered account.
//! Requesting again replaces the outstanding challenge for that address
//! string. Challenges do not expire; `issued_at` is kept for observability.

use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};

use super::WalletError;
use crate::storage::{AccountRepository, Challenge, ChallengeRepository};

/// Random bytes per nonce (hex-encoded to 64 characters).
pub const NONCE_LEN: usize = 32;

/// Build the exact text a wallet is asked to sign.
pub fn challenge_message(nonce: &str) -> String {
    format!("Welcome! Please sign this message to log in. Nonce: {nonce}")
}

/// Issues sign-in challenges for registered wallets.
#[derive(Clone)]
pub struct ChallengeIssuer {
    accounts: AccountRepository,
    challenges: ChallengeRepository,
    rng: SystemRandom,
}

impl ChallengeIssuer {
    pub fn new(accounts: AccountRepository, challenges: ChallengeRepository) -> Self {
        Self {
            accounts,
            challenges,
            rng: SystemRandom::new(),
        }
    }

    /// Create and store a challenge for `address`.
    ///
    /// The account lookup ignores case; the challenge is stored under
    /// `address` exactly as given.
    pub fn issue_challenge(&self, address: &str) -> Result<Challenge, WalletError> {
        if self.accounts.find_by_address(address)?.is_none() {
            return Err(WalletError::UnknownAddress);
        }

        let nonce = self.generate_nonce()?;
        let challenge = Challenge {
            address: address.to_string(),
            message: challenge_message(&nonce),
            nonce,
            issued_at: Utc::now(),
        };
        self.challenges.put(&challenge)?;

        tracing::debug!(address = %address, "Issued wallet challenge");
        Ok(challenge)
    }

    fn generate_nonce(&self) -> Result<String, WalletError> {
        let mut bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| WalletError::NonceGeneration)?;
        Ok(alloy::hex::encode(bytes))
    }
}
