// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password reset tokens.
//!
//! The plaintext token only ever appears in the reset e-mail; storage keeps
//! its SHA-256 hex digest.

use chrono::Duration;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// How long a reset link stays valid, in seconds.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

pub fn reset_token_ttl() -> Duration {
	Duration::seconds(RESET_TOKEN_TTL_SECS)
}

/// Generate a random 32-byte token, hex encoded.
pub fn generate_reset_token() -> String {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	hex::encode(bytes)
}

pub fn hash_reset_token(token: &str) -> String {
	hex::encode(Sha256::digest(token.as_bytes()))
}
