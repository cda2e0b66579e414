// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credentials and session tokens for the VeriChain API.
//!
//! ## Session Tokens
//!
//! 1. The wallet signature step succeeds (see `login_flow`)
//! 2. The server mints an HS256 JWT asserting `(walletAddress, email)`,
//!    valid for one hour
//! 3. Clients send `Authorization: Bearer <token>` on protected routes
//! 4. The `Auth` extractor checks signature, issuer and expiry on each
//!    request; nothing is stored server-side
//!
//! ## Passwords
//!
//! Stored as salted PBKDF2-HMAC-SHA256 digests (`password` module).

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod session;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{PasswordError, PasswordHash};
pub use session::{IssuedToken, SessionIssuer, SESSION_TTL_SECS};
