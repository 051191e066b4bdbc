// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token signing configuration.

use alumni_common_config::SecretString;
use rand::RngCore;
use serde::Deserialize;

pub const PRODUCTION_ENVIRONMENT: &str = "production";

const DEFAULT_TOKEN_TTL_HOURS: u64 = 36;
const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub token_secret: SecretString,
	pub token_ttl_hours: u64,
	pub environment: String,
	/// True when no secret was configured and one was generated at startup.
	pub ephemeral_secret: bool,
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment == PRODUCTION_ENVIRONMENT
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			token_secret: generate_secret(),
			token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
			environment: DEFAULT_ENVIRONMENT.to_string(),
			ephemeral_secret: true,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub token_secret: Option<SecretString>,
	#[serde(default)]
	pub token_ttl_hours: Option<u64>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.token_secret.is_some() {
			self.token_secret = other.token_secret;
		}
		if other.token_ttl_hours.is_some() {
			self.token_ttl_hours = other.token_ttl_hours;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	/// Outside production a missing secret is replaced by a random one, so
	/// tokens do not survive a restart.
	pub fn finalize(self) -> AuthConfig {
		let environment = self
			.environment
			.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
		let (token_secret, ephemeral_secret) = match self.token_secret.filter(|s| !s.is_empty()) {
			Some(secret) => (secret, false),
			None => (generate_secret(), true),
		};

		AuthConfig {
			token_secret,
			token_ttl_hours: self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
			environment,
			ephemeral_secret,
		}
	}
}

fn generate_secret() -> SecretString {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	SecretString::new(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn configured_secret_is_kept() {
		let config = AuthConfigLayer {
			token_secret: Some(SecretString::new("s3cret".to_string())),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.token_secret.expose(), "s3cret");
		assert!(!config.ephemeral_secret);
		assert_eq!(config.token_ttl_hours, 36);
	}

	#[test]
	fn missing_secret_is_generated() {
		let a = AuthConfigLayer::default().finalize();
		let b = AuthConfigLayer::default().finalize();
		assert!(a.ephemeral_secret);
		assert_eq!(a.token_secret.expose().len(), 64);
		assert_ne!(a.token_secret.expose(), b.token_secret.expose());
	}

	#[test]
	fn empty_secret_counts_as_missing() {
		let config = AuthConfigLayer {
			token_secret: Some(SecretString::new(String::new())),
			..Default::default()
		}
		.finalize();
		assert!(config.ephemeral_secret);
	}

	#[test]
	fn debug_does_not_leak_secret() {
		let config = AuthConfigLayer {
			token_secret: Some(SecretString::new("do-not-print".to_string())),
			..Default::default()
		}
		.finalize();
		assert!(!format!("{config:?}").contains("do-not-print"));
	}
}
