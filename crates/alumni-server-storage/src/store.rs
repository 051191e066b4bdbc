// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::{Result, StorageError};

/// A stored object and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
	pub bytes: Bytes,
	pub content_type: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
	/// Store `bytes` under `key`, replacing any existing object.
	async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()>;

	/// A time-limited download URL for `key`.
	fn presigned_url(&self, key: &str, now: DateTime<Utc>) -> Result<String>;

	/// Fetch an object after checking a presigned URL's `expires` and `signature`.
	async fn get_signed(
		&self,
		key: &str,
		expires: i64,
		signature: &str,
		now: DateTime<Utc>,
	) -> Result<StoredObject>;
}

/// Keys are `/`-separated segments of ASCII letters, digits, `-`, `_` and `.`.
/// Empty segments and `.`/`..` are rejected.
pub fn validate_key(key: &str) -> Result<()> {
	if key.is_empty() || key.len() > 512 {
		return Err(StorageError::InvalidKey(key.to_string()));
	}
	for segment in key.split('/') {
		let valid = !segment.is_empty()
			&& segment != "."
			&& segment != ".."
			&& segment
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
		if !valid {
			return Err(StorageError::InvalidKey(key.to_string()));
		}
	}
	Ok(())
}
