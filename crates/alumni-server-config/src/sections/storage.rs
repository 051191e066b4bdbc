// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Photo storage configuration.

use std::path::PathBuf;

use alumni_common_config::SecretString;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_BUCKET: &str = "alumni-photos";
const DEFAULT_PRESIGN_TTL_SECS: u64 = 900;

#[derive(Debug, Clone)]
pub struct StorageConfig {
	pub data_dir: PathBuf,
	pub bucket: String,
	/// Falls back to the token secret when unset.
	pub url_signing_secret: Option<SecretString>,
	pub presign_ttl_secs: u64,
	/// Origin used in presigned URLs. Falls back to the HTTP base URL.
	pub public_base_url: Option<String>,
}

impl StorageConfig {
	pub fn bucket_dir(&self) -> PathBuf {
		self.data_dir.join(&self.bucket)
	}
}

impl Default for StorageConfig {
	fn default() -> Self {
		StorageConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfigLayer {
	#[serde(default)]
	pub data_dir: Option<String>,
	#[serde(default)]
	pub bucket: Option<String>,
	#[serde(default)]
	pub url_signing_secret: Option<SecretString>,
	#[serde(default)]
	pub presign_ttl_secs: Option<u64>,
	#[serde(default)]
	pub public_base_url: Option<String>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: StorageConfigLayer) {
		if other.data_dir.is_some() {
			self.data_dir = other.data_dir;
		}
		if other.bucket.is_some() {
			self.bucket = other.bucket;
		}
		if other.url_signing_secret.is_some() {
			self.url_signing_secret = other.url_signing_secret;
		}
		if other.presign_ttl_secs.is_some() {
			self.presign_ttl_secs = other.presign_ttl_secs;
		}
		if other.public_base_url.is_some() {
			self.public_base_url = other.public_base_url;
		}
	}

	pub fn finalize(self) -> StorageConfig {
		StorageConfig {
			data_dir: PathBuf::from(self.data_dir.unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
			bucket: self.bucket.unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
			url_signing_secret: self.url_signing_secret.filter(|s| !s.is_empty()),
			presign_ttl_secs: self.presign_ttl_secs.unwrap_or(DEFAULT_PRESIGN_TTL_SECS),
			public_base_url: self.public_base_url,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = StorageConfig::default();
		assert_eq!(config.bucket_dir(), PathBuf::from("./data/alumni-photos"));
		assert_eq!(config.presign_ttl_secs, 900);
		assert!(config.url_signing_secret.is_none());
	}

	#[test]
	fn deserializes_partial_layer() {
		let layer: StorageConfigLayer =
			toml::from_str("bucket = \"photos\"\npresign_ttl_secs = 60\n").unwrap();
		let config = layer.finalize();
		assert_eq!(config.bucket, "photos");
		assert_eq!(config.presign_ttl_secs, 60);
	}
}
