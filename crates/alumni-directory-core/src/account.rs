// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login accounts and their approval gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::ids::{AccountId, AlumniId};

/// Whether an administrator has admitted an account to the directory.
///
/// New accounts start [`ApprovalState::Pending`]. Only an administrator action
/// moves an account between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
	#[default]
	Pending,
	Approved,
	Denied,
}

impl ApprovalState {
	pub fn all() -> &'static [ApprovalState] {
		&[
			ApprovalState::Pending,
			ApprovalState::Approved,
			ApprovalState::Denied,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ApprovalState::Pending => "pending",
			ApprovalState::Approved => "approved",
			ApprovalState::Denied => "denied",
		}
	}
}

impl fmt::Display for ApprovalState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ApprovalState {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(ApprovalState::Pending),
			"approved" => Ok(ApprovalState::Approved),
			"denied" => Ok(ApprovalState::Denied),
			other => Err(CoreError::InvalidApprovalState(other.to_string())),
		}
	}
}

/// An authenticated login identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
	pub id: AccountId,
	/// Always stored lowercased.
	pub email: String,
	/// Argon2 PHC string.
	pub credential_hash: String,
	pub linked_record_id: Option<AlumniId>,
	pub is_admin: bool,
	pub approval: ApprovalState,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Account {
	/// Build a fresh pending, non-admin account.
	pub fn new(email: &str, credential_hash: String, now: DateTime<Utc>) -> Self {
		Self {
			id: AccountId::generate(),
			email: normalize_email(email),
			credential_hash,
			linked_record_id: None,
			is_admin: false,
			approval: ApprovalState::Pending,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn is_approved(&self) -> bool {
		self.approval == ApprovalState::Approved
	}

	pub fn owns(&self, record_id: &AlumniId) -> bool {
		self.linked_record_id.as_ref() == Some(record_id)
	}
}

impl fmt::Debug for Account {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Account")
			.field("id", &self.id)
			.field("email", &self.email)
			.field("linked_record_id", &self.linked_record_id)
			.field("is_admin", &self.is_admin)
			.field("approval", &self.approval)
			.field("created_at", &self.created_at)
			.field("updated_at", &self.updated_at)
			.finish_non_exhaustive()
	}
}

/// Lowercase and trim an e-mail address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}
