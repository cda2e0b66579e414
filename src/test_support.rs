// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use alloy::signers::{local::PrivateKeySigner, SignerSync};

/// Well-known development key #0 (0xf39F…2266).
pub const ALICE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Well-known development key #1 (0x7099…79C8).
pub const BOB_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const TEST_SECRET: &[u8] = b"unit-test-session-secret";

pub fn signer(key: &str) -> PrivateKeySigner {
    key.parse().expect("valid development key")
}

/// `personal_sign` over `message`, hex encoded with `0x`.
pub fn sign(signer: &PrivateKeySigner, message: &str) -> String {
    let signature = signer
        .sign_message_sync(message.as_bytes())
        .expect("signing succeeds");
    alloy::hex::encode_prefixed(signature.as_bytes())
}
