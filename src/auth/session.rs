// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying [`SessionClaims`]. They are not stored
//! server-side: every protected request checks the signature and expiry.
//! A token is accepted up to and including its `exp` second; there is no
//! clock-skew leeway and no refresh.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::SessionClaims, AuthError};
use crate::models::WalletAddress;

/// Session lifetime.
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// Issuer claim stamped on and required from every token.
pub const TOKEN_ISSUER: &str = "verichain";

/// A freshly minted token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Mints and validates session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is compared in `validate_token_at` so the clock can be fixed.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for a verified wallet, valid for one hour from now.
    pub fn issue_token(
        &self,
        wallet_address: &WalletAddress,
        email: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.issue_token_at(wallet_address, email, Utc::now())
    }

    /// Issue a token as if it were minted at `issued_at`.
    pub fn issue_token_at(
        &self,
        wallet_address: &WalletAddress,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at + Duration::seconds(SESSION_TTL_SECS);
        let claims = SessionClaims {
            wallet_address: wallet_address.clone(),
            email: email.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Check signature, issuer and expiry; return the embedded claims.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate as of `now`. The token is live while `now <= exp`.
    pub fn validate_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::MalformedToken,
            })?;

        if now.timestamp() > token_data.claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(token_data.claims)
    }
}
