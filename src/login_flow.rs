// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Login Flow
//!
//! Orchestrates registration and the two-factor login:
//!
//! ```text
//! PasswordPending --password ok--> ChallengeIssued --nonce--> AwaitingSignature
//!        |                                                        |
//!   Unauthenticated                          signature ok + wallet bound
//!                                                                 v
//!                                                           Authenticated
//! ```
//!
//! 1. `login` checks email and password, records a [`LoginAttempt`] and
//!    returns the account's wallet address.
//! 2. `request_challenge` issues a nonce-bearing message for that address.
//! 3. `verify_signature` runs the signature check, then the binding check:
//!    the claimed address must be the wallet registered to the account that
//!    passed the password step. A signature that is valid but from another
//!    wallet ends the attempt with [`LoginError::WrongWallet`]; the client
//!    has to start again with the password.
//!
//! Attempts are not resumable: each successful or wrong-wallet completion
//! discards the attempt. A challenge is consumed only when the signature
//! step as a whole succeeds (or ends in a wrong-wallet failure), and the
//! consuming write is the check: of two concurrent requests carrying the
//! same signature, exactly one gets a token.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{AuthError, IssuedToken, PasswordError, PasswordHash, SessionIssuer};
use crate::models::WalletAddress;
use crate::storage::{
    Account, AccountRepository, AttemptRepository, Challenge, ChallengeRepository, LoginAttempt,
    LoginHistoryRepository, LoginRecord, RedbStore, StorageError, LOGIN_HISTORY_LIMIT,
};
use crate::storage::redb_store::{open_database, ACCOUNTS_TABLE, DATABASE_FILE, LOGIN_HISTORY_TABLE};
use crate::wallet::{ChallengeIssuer, SignatureVerifier, WalletError};

/// Errors surfaced by the login flow.
///
/// Display strings are safe to return to clients.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists.")]
    DuplicateEmail,

    #[error("User not found.")]
    UnknownEmail,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("User not found for this address. Please register first.")]
    UnknownAddress,

    #[error("No nonce found. Please request a new one.")]
    MissingChallenge,

    #[error("Signature verification failed.")]
    SignatureMismatch,

    #[error("Signed wallet is not the wallet linked to this account. Please log in again.")]
    WrongWallet,

    #[error("Login attempt not found. Please log in with your password first.")]
    UnknownAttempt,

    /// Malformed signature or recovery failure; the detail is not shown.
    #[error("An error occurred during verification.")]
    Verification(String),

    #[error("Internal server error")]
    Session(#[from] AuthError),

    #[error("Internal server error")]
    Password(#[from] PasswordError),

    #[error("Internal server error")]
    Storage(#[from] StorageError),

    #[error("Internal server error")]
    NonceGeneration,
}

impl From<WalletError> for LoginError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::UnknownAddress => LoginError::UnknownAddress,
            WalletError::MissingChallenge => LoginError::MissingChallenge,
            WalletError::SignatureMismatch => LoginError::SignatureMismatch,
            WalletError::Verification(detail) => LoginError::Verification(detail),
            WalletError::NonceGeneration => LoginError::NonceGeneration,
            WalletError::Storage(e) => LoginError::Storage(e),
        }
    }
}

/// Outcome of the password step.
#[derive(Debug, Clone)]
pub struct PasswordVerified {
    pub attempt_id: Uuid,
    /// Wallet the client must sign with.
    pub associated_address: WalletAddress,
}

/// Store handles used by the flow.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: AccountRepository,
    pub challenges: ChallengeRepository,
    pub attempts: AttemptRepository,
    pub history: LoginHistoryRepository,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            accounts: AccountRepository::in_memory(),
            challenges: ChallengeRepository::in_memory(),
            attempts: AttemptRepository::in_memory(),
            history: LoginHistoryRepository::in_memory(),
        }
    }

    /// Accounts and login history in a redb file under `data_dir`.
    /// Challenges and attempts are short-lived and stay in memory.
    pub fn persistent(data_dir: &Path) -> Result<Self, StorageError> {
        let db = open_database(&data_dir.join(DATABASE_FILE))?;
        let accounts = RedbStore::<Account>::open(db.clone(), ACCOUNTS_TABLE)?;
        let history = RedbStore::<LoginRecord>::open(db, LOGIN_HISTORY_TABLE)?;

        Ok(Self {
            accounts: AccountRepository::new(Arc::new(accounts)),
            history: LoginHistoryRepository::new(Arc::new(history)),
            ..Self::in_memory()
        })
    }
}

/// Registration, password login and wallet verification.
#[derive(Clone)]
pub struct LoginFlow {
    accounts: AccountRepository,
    attempts: AttemptRepository,
    history: LoginHistoryRepository,
    challenges: ChallengeIssuer,
    verifier: SignatureVerifier,
    sessions: Arc<SessionIssuer>,
}

fn require(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl LoginFlow {
    pub fn new(repos: Repositories, sessions: SessionIssuer) -> Self {
        Self {
            challenges: ChallengeIssuer::new(repos.accounts.clone(), repos.challenges.clone()),
            verifier: SignatureVerifier::new(repos.challenges),
            accounts: repos.accounts,
            attempts: repos.attempts,
            history: repos.history,
            sessions: Arc::new(sessions),
        }
    }

    pub fn in_memory(sessions: SessionIssuer) -> Self {
        Self::new(Repositories::in_memory(), sessions)
    }

    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    /// Create an account linking `email` to `wallet_address` for good.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        wallet_address: &str,
    ) -> Result<Account, LoginError> {
        let (Some(email), Some(wallet_address)) = (require(email), require(wallet_address)) else {
            return Err(LoginError::Validation(
                "Email, password, and walletAddress are required.".into(),
            ));
        };
        if password.is_empty() {
            return Err(LoginError::Validation(
                "Email, password, and walletAddress are required.".into(),
            ));
        }

        let wallet_address =
            WalletAddress::parse(wallet_address).map_err(|e| LoginError::Validation(e.to_string()))?;

        if self.accounts.exists(email)? {
            return Err(LoginError::DuplicateEmail);
        }

        let account = Account {
            email: email.to_string(),
            password_hash: PasswordHash::new(password)?,
            wallet_address,
            created_at: Utc::now(),
        };
        if !self.accounts.create(&account)? {
            return Err(LoginError::DuplicateEmail);
        }

        tracing::info!(email = %account.email, wallet = %account.wallet_address, "Account registered");
        Ok(account)
    }

    /// Password step. On success the client learns which wallet to sign with.
    pub fn login(&self, email: &str, password: &str) -> Result<PasswordVerified, LoginError> {
        let Some(email) = require(email).filter(|_| !password.is_empty()) else {
            return Err(LoginError::Validation(
                "Email and password are required.".into(),
            ));
        };

        let account = self.accounts.get(email)?.ok_or(LoginError::UnknownEmail)?;
        if !account.password_hash.verify(password) {
            tracing::info!(email = %email, "Password check failed");
            return Err(LoginError::InvalidPassword);
        }

        let attempt = LoginAttempt::new(account.email, account.wallet_address);
        self.attempts.create(&attempt)?;

        tracing::info!(
            email = %attempt.email,
            wallet = %attempt.wallet_address,
            attempt_id = %attempt.attempt_id,
            "Password verified, awaiting wallet signature"
        );
        Ok(PasswordVerified {
            attempt_id: attempt.attempt_id,
            associated_address: attempt.wallet_address,
        })
    }

    /// Issue the challenge message for a wallet.
    pub fn request_challenge(&self, wallet_address: &str) -> Result<Challenge, LoginError> {
        let wallet_address = require(wallet_address)
            .ok_or_else(|| LoginError::Validation("walletAddress is required.".into()))?;
        Ok(self.challenges.issue_challenge(wallet_address)?)
    }

    /// Signature step. Verifies the signature, binds the wallet to the
    /// password-verified account and issues a session token.
    pub fn verify_signature(
        &self,
        attempt_id: Option<Uuid>,
        wallet_address: &str,
        signature: &str,
        origin: Option<String>,
    ) -> Result<IssuedToken, LoginError> {
        let (Some(wallet_address), Some(signature)) = (require(wallet_address), require(signature))
        else {
            return Err(LoginError::Validation(
                "walletAddress and signature are required.".into(),
            ));
        };
        let attempt_id = attempt_id
            .ok_or_else(|| LoginError::Validation("attemptId is required.".into()))?;

        let verified = self
            .verifier
            .verify(wallet_address, signature)
            .inspect_err(|e| {
                if let WalletError::Verification(detail) = e {
                    tracing::warn!(error = %detail, claimed = %wallet_address, "Signature verification error");
                }
            })?;

        let attempt = self
            .attempts
            .get(attempt_id)?
            .ok_or(LoginError::UnknownAttempt)?;

        if verified.signer != attempt.wallet_address {
            // Losing either removal to a concurrent request is fine here.
            match self.verifier.consume(&verified) {
                Ok(()) | Err(WalletError::MissingChallenge) => {}
                Err(e) => return Err(e.into()),
            }
            self.attempts.finish(&attempt)?;
            tracing::warn!(
                email = %attempt.email,
                registered = %attempt.wallet_address,
                signed = %verified.signer,
                "Wallet binding check failed"
            );
            return Err(LoginError::WrongWallet);
        }

        self.verifier.consume(&verified)?;
        if !self.attempts.finish(&attempt)? {
            return Err(LoginError::UnknownAttempt);
        }

        let wallet = verified.signer;
        let issued = self.sessions.issue_token(&wallet, &attempt.email)?;
        self.record_login(&wallet, origin);

        tracing::info!(email = %attempt.email, wallet = %wallet, "Login completed");
        Ok(issued)
    }

    /// Most recent logins for a wallet, newest first.
    pub fn login_history(&self, wallet_address: &WalletAddress) -> Result<Vec<LoginRecord>, LoginError> {
        Ok(self.history.recent(wallet_address, LOGIN_HISTORY_LIMIT)?)
    }

    // Audit failures never fail the login.
    fn record_login(&self, wallet_address: &WalletAddress, origin: Option<String>) {
        let record = LoginRecord::new(wallet_address.clone()).with_ip(origin);
        if let Err(e) = self.history.append(&record) {
            tracing::warn!(error = %e, wallet = %wallet_address, "Failed to save login history");
        }
    }
}
