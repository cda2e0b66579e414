// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to a [`KeyValueStore`].
//!
//! Each repository wraps a shared store handle for one entity type and owns
//! the key scheme for it.
//!
//! [`KeyValueStore`]: super::KeyValueStore

pub mod accounts;
pub mod attempts;
pub mod challenges;

pub use accounts::{Account, AccountRepository};
pub use attempts::{AttemptRepository, LoginAttempt, ATTEMPT_TTL_SECS};
pub use challenges::{Challenge, ChallengeRepository};
