// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::AccountId;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	/// Bad signature, unexpected algorithm, or malformed claims.
	#[error("invalid token")]
	InvalidToken,

	#[error("token expired")]
	ExpiredToken,

	#[error("token signing failed: {0}")]
	Signing(String),

	#[error("account not found: {0}")]
	AccountNotFound(AccountId),

	#[error("credential hashing failed: {0}")]
	Hashing(String),

	#[error("account lookup failed: {0}")]
	Lookup(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
