// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HMAC-SHA256 signed download URLs.
//!
//! A URL carries `expires` (unix seconds) and `signature`, the hex HMAC of
//! `"{key}\n{expires}"`. Verification rejects a bad signature before looking
//! at the expiry.

use alumni_common_secret::SecretString;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, StorageError};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 900;

#[derive(Clone)]
pub struct UrlSigner {
	secret: SecretString,
	base_url: String,
	ttl: Duration,
}

impl UrlSigner {
	/// `base_url` is the public origin the `/files` route is served from.
	pub fn new(secret: SecretString, base_url: impl Into<String>, ttl_secs: u64) -> Self {
		let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX / 1000);
		Self {
			secret,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			ttl: Duration::seconds(ttl_secs),
		}
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	fn mac(&self) -> Result<HmacSha256> {
		if self.secret.is_empty() {
			return Err(StorageError::MissingSigningKey);
		}
		HmacSha256::new_from_slice(self.secret.expose().as_bytes())
			.map_err(|_| StorageError::MissingSigningKey)
	}

	pub fn sign(&self, key: &str, expires: i64) -> Result<String> {
		let mut mac = self.mac()?;
		mac.update(signing_payload(key, expires).as_bytes());
		Ok(hex::encode(mac.finalize().into_bytes()))
	}

	/// Build a download URL for `key` valid until `now + ttl`.
	pub fn presign(&self, key: &str, now: DateTime<Utc>) -> Result<String> {
		let expires = (now + self.ttl).timestamp();
		let signature = self.sign(key, expires)?;
		Ok(format!(
			"{}/files/{}?expires={}&signature={}",
			self.base_url, key, expires, signature
		))
	}

	/// Check a signature produced by [`UrlSigner::sign`].
	///
	/// # Errors
	/// `InvalidSignature` if the signature does not match, `Expired` if
	/// `now` is at or past `expires`.
	pub fn verify(&self, key: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> Result<()> {
		let expected = hex::decode(signature).map_err(|_| StorageError::InvalidSignature)?;
		let mut mac = self.mac()?;
		mac.update(signing_payload(key, expires).as_bytes());
		mac
			.verify_slice(&expected)
			.map_err(|_| StorageError::InvalidSignature)?;

		if now.timestamp() >= expires {
			return Err(StorageError::Expired);
		}
		Ok(())
	}
}

impl std::fmt::Debug for UrlSigner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UrlSigner")
			.field("secret", &self.secret)
			.field("base_url", &self.base_url)
			.field("ttl", &self.ttl)
			.finish()
	}
}

fn signing_payload(key: &str, expires: i64) -> String {
	format!("{key}\n{expires}")
}
