// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by challenge issuance and signature verification.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("No account is linked to this wallet address")]
    UnknownAddress,

    #[error("No outstanding challenge for this wallet address")]
    MissingChallenge,

    #[error("Signature verification failed: signer does not match claimed address")]
    SignatureMismatch,

    /// Malformed signature or failed recovery. The detail is for logs only.
    #[error("Signature could not be verified: {0}")]
    Verification(String),

    #[error("Failed to generate challenge nonce")]
    NonceGeneration,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
