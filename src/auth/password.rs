// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Salted password hashing.
//!
//! Passwords are stored as PBKDF2-HMAC-SHA256 digests with a per-account
//! random salt. The encoded form is
//!
//! ```text
//! pbkdf2-sha256$<iterations>$<salt, base64>$<hash, base64>
//! ```

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use base64ct::{Base64, Encoding};
use ring::digest::SHA256_OUTPUT_LEN;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();
static PBKDF2_ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Password hashing errors.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to generate password salt")]
    SaltGeneration,
    #[error("Malformed password hash: {0}")]
    Malformed(&'static str),
}

/// A salted password digest.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash {
    iterations: NonZeroU32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl PasswordHash {
    /// Hash a password with a fresh random salt.
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        Self::with_rng(password, &SystemRandom::new())
    }

    pub fn with_rng(password: &str, rng: &dyn SecureRandom) -> Result<Self, PasswordError> {
        let mut salt = vec![0u8; SALT_LEN];
        rng.fill(&mut salt)
            .map_err(|_| PasswordError::SaltGeneration)?;

        let mut hash = vec![0u8; SHA256_OUTPUT_LEN];
        pbkdf2::derive(
            PBKDF2_ALGORITHM,
            PBKDF2_ITERATIONS,
            &salt,
            password.as_bytes(),
            &mut hash,
        );

        Ok(Self {
            iterations: PBKDF2_ITERATIONS,
            salt,
            hash,
        })
    }

    /// Constant-time check of a candidate password.
    pub fn verify(&self, password: &str) -> bool {
        pbkdf2::verify(
            PBKDF2_ALGORITHM,
            self.iterations,
            &self.salt,
            password.as_bytes(),
            &self.hash,
        )
        .is_ok()
    }
}

// Never print digest material.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}${}${}${}",
            self.iterations,
            Base64::encode_string(&self.salt),
            Base64::encode_string(&self.hash)
        )
    }
}

impl FromStr for PasswordHash {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(PasswordError::Malformed("expected four '$'-separated fields"));
        };

        if scheme != SCHEME {
            return Err(PasswordError::Malformed("unknown scheme"));
        }

        let iterations = iterations
            .parse::<NonZeroU32>()
            .map_err(|_| PasswordError::Malformed("invalid iteration count"))?;
        let salt =
            Base64::decode_vec(salt).map_err(|_| PasswordError::Malformed("invalid salt"))?;
        let hash =
            Base64::decode_vec(hash).map_err(|_| PasswordError::Malformed("invalid digest"))?;

        if hash.len() != SHA256_OUTPUT_LEN {
            return Err(PasswordError::Malformed("invalid digest length"));
        }

        Ok(Self {
            iterations,
            salt,
            hash,
        })
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = PasswordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.to_string()
    }
}
