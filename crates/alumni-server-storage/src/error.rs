// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Invalid object key: {0}")]
	InvalidKey(String),

	#[error("Object not found: {0}")]
	NotFound(String),

	#[error("Invalid signature")]
	InvalidSignature,

	#[error("Signed URL expired")]
	Expired,

	#[error("Signing key not configured")]
	MissingSigningKey,
}

pub type Result<T> = std::result::Result<T, StorageError>;
