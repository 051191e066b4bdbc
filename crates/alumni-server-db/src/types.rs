// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Row types that only exist at the storage layer.

use alumni_directory_core::PasswordResetId;
use chrono::{DateTime, Utc};

/// A pending password reset. Only the token hash is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
	pub id: PasswordResetId,
	pub email: String,
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

/// A named e-mail template with `{{placeholder}}` substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
	pub name: String,
	pub subject: String,
	pub html: String,
}

/// Filters for alumni listings.
///
/// Name filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlumniFilter {
	pub firstname: Option<String>,
	pub lastname: Option<String>,
	pub public_only: bool,
}

impl AlumniFilter {
	pub fn public_only(mut self) -> Self {
		self.public_only = true;
		self
	}
}
