// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! [`ObjectStore`] backed by a directory on local disk.
//!
//! Each object is a file at `<root>/<key>`; its content type sits next to it
//! in `<key>.content-type`. Writes go through a temporary file and a rename.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::signing::UrlSigner;
use crate::store::{validate_key, ObjectStore, StoredObject};

const CONTENT_TYPE_SUFFIX: &str = ".content-type";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub struct FilesystemObjectStore {
	root: PathBuf,
	signer: UrlSigner,
}

impl FilesystemObjectStore {
	/// `root` is the bucket directory; it is created on first write.
	pub fn new(root: impl Into<PathBuf>, signer: UrlSigner) -> Self {
		Self {
			root: root.into(),
			signer,
		}
	}

	fn object_path(&self, key: &str) -> Result<PathBuf> {
		validate_key(key)?;
		Ok(self.root.join(key))
	}

	fn content_type_path(path: &std::path::Path) -> PathBuf {
		let mut name = path.as_os_str().to_os_string();
		name.push(CONTENT_TYPE_SUFFIX);
		PathBuf::from(name)
	}

	async fn write_atomic(path: &std::path::Path, contents: &[u8]) -> Result<()> {
		let mut tmp = path.as_os_str().to_os_string();
		tmp.push(".tmp");
		let tmp = PathBuf::from(tmp);
		tokio::fs::write(&tmp, contents).await?;
		tokio::fs::rename(&tmp, path).await?;
		Ok(())
	}
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
	async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<()> {
		let path = self.object_path(key)?;
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		Self::write_atomic(&path, &bytes).await?;
		Self::write_atomic(&Self::content_type_path(&path), content_type.as_bytes()).await?;

		debug!(key, size = bytes.len(), content_type, "stored object");
		Ok(())
	}

	fn presigned_url(&self, key: &str, now: DateTime<Utc>) -> Result<String> {
		validate_key(key)?;
		self.signer.presign(key, now)
	}

	async fn get_signed(
		&self,
		key: &str,
		expires: i64,
		signature: &str,
		now: DateTime<Utc>,
	) -> Result<StoredObject> {
		let path = self.object_path(key)?;
		self.signer.verify(key, expires, signature, now)?;

		let bytes = match tokio::fs::read(&path).await {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(StorageError::NotFound(key.to_string()));
			}
			Err(e) => return Err(e.into()),
		};

		let content_type = match tokio::fs::read_to_string(Self::content_type_path(&path)).await {
			Ok(ct) => ct.trim().to_string(),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => DEFAULT_CONTENT_TYPE.to_string(),
			Err(e) => return Err(e.into()),
		};

		Ok(StoredObject {
			bytes: Bytes::from(bytes),
			content_type,
		})
	}
}
