// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::{Account, AccountId, AlumniId, ApprovalState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// An account as returned to clients. Never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
	pub id: AccountId,
	pub email: String,
	pub alumni_id: Option<AlumniId>,
	pub admin: bool,
	pub approval: ApprovalState,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
	fn from(account: &Account) -> Self {
		Self {
			id: account.id,
			email: account.email.clone(),
			alumni_id: account.linked_record_id,
			admin: account.is_admin,
			approval: account.approval,
			created_at: account.created_at,
			updated_at: account.updated_at,
		}
	}
}

impl From<Account> for AccountResponse {
	fn from(account: Account) -> Self {
		Self::from(&account)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListAccountsQuery {
	/// Only return accounts in this approval state.
	pub approval: Option<ApprovalState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListAccountsResponse {
	pub accounts: Vec<AccountResponse>,
}
