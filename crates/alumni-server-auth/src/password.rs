// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential hashing.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::argon2_config::argon2_instance;
use crate::error::{AuthError, Result};

/// Hashes and verifies account passwords.
pub trait CredentialHasher: Send + Sync {
	fn hash(&self, password: &str) -> Result<String>;

	/// Returns `false` for a wrong password and for an unparseable hash.
	fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id PHC-string hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
	#[tracing::instrument(level = "debug", skip_all)]
	fn hash(&self, password: &str) -> Result<String> {
		let salt = SaltString::generate(&mut OsRng);
		argon2_instance()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hashing(e.to_string()))
	}

	#[tracing::instrument(level = "debug", skip_all)]
	fn verify(&self, password: &str, hash: &str) -> bool {
		let parsed = match PasswordHash::new(hash) {
			Ok(parsed) => parsed,
			Err(e) => {
				tracing::warn!(error = %e, "stored credential hash is malformed");
				return false;
			}
		};
		argon2_instance()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_then_verify() {
		let hasher = Argon2Hasher;
		let hash = hasher.hash("correct horse").unwrap();
		assert!(hash.starts_with("$argon2id$"));
		assert!(hasher.verify("correct horse", &hash));
		assert!(!hasher.verify("battery staple", &hash));
	}

	#[test]
	fn salts_differ() {
		let hasher = Argon2Hasher;
		assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
	}

	#[test]
	fn malformed_hash_never_verifies() {
		assert!(!Argon2Hasher.verify("pw", "not-a-phc-string"));
	}
}
