// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::{account::normalize_email, Account, AccountId, ApprovalState};
use alumni_server_api::{AccountResponse, SessionResponse};
use alumni_server_auth::{can_manage_accounts, CallerAttrs};
use alumni_server_db::DbError;
use alumni_server_smtp::{is_valid_email, ACCOUNT_APPROVED};
use tracing::instrument;

use super::{require_password, AlumniService};
use crate::error::{Result, ServiceError};

impl AlumniService {
	/// Create a pending account and sign it in.
	#[instrument(skip(self, email, password))]
	pub async fn register(&self, email: &str, password: &str) -> Result<SessionResponse> {
		let email = normalize_email(email);
		if !is_valid_email(&email) {
			return Err(ServiceError::invalid_request("a valid e-mail address is required"));
		}
		require_password(password)?;

		let existing = self
			.accounts
			.get_account_by_email(&email)
			.await
			.map_err(ServiceError::db("find account by email"))?;
		if existing.is_some() {
			return Err(ServiceError::DuplicateAccount);
		}

		let now = self.now();
		let hash = self.hasher.hash(password)?;
		let account = Account::new(&email, hash, now);
		self
			.accounts
			.create_account(&account)
			.await
			.map_err(|e| match e {
				DbError::Conflict(_) => ServiceError::DuplicateAccount,
				other => ServiceError::upstream("database", "create account", other),
			})?;

		tracing::info!(account_id = %account.id, "account registered");
		let token = self.issue_token(&account, now)?;
		Ok(session(&account, token))
	}

	/// Unknown e-mail and wrong password are indistinguishable to the caller.
	#[instrument(skip(self, email, password))]
	pub async fn login(&self, email: &str, password: &str) -> Result<SessionResponse> {
		let account = self
			.accounts
			.get_account_by_email(email)
			.await
			.map_err(ServiceError::db("find account by email"))?
			.ok_or(ServiceError::CredentialMismatch)?;

		if !self.hasher.verify(password, &account.credential_hash) {
			tracing::debug!(account_id = %account.id, "password mismatch");
			return Err(ServiceError::CredentialMismatch);
		}

		let token = self.issue_token(&account, self.now())?;
		tracing::debug!(account_id = %account.id, "login succeeded");
		Ok(session(&account, token))
	}

	#[instrument(skip_all)]
	pub async fn refresh_session(&self, token: &str) -> Result<SessionResponse> {
		let (account, token) = self.sessions.resolve_and_refresh(token, self.now()).await?;
		Ok(session(&account, token))
	}

	pub async fn approve(&self, token: &str, account_id: AccountId) -> Result<AccountResponse> {
		let account = self
			.set_approval(token, account_id, ApprovalState::Approved)
			.await?;

		// The approval stays committed when the e-mail fails.
		let vars = self.account_vars(&account);
		self
			.send_template(ACCOUNT_APPROVED, &account.email, vars)
			.await
			.inspect_err(|e| {
				tracing::warn!(account_id = %account.id, error = %e, "approval e-mail failed");
			})?;

		Ok(AccountResponse::from(account))
	}

	pub async fn deny(&self, token: &str, account_id: AccountId) -> Result<AccountResponse> {
		let account = self
			.set_approval(token, account_id, ApprovalState::Denied)
			.await?;
		Ok(AccountResponse::from(account))
	}

	#[instrument(skip(self, token), fields(approval = ?approval))]
	pub async fn list_accounts(
		&self,
		token: &str,
		approval: Option<ApprovalState>,
	) -> Result<Vec<AccountResponse>> {
		let caller = self.authenticate(token, self.now()).await?;
		if !can_manage_accounts(&CallerAttrs::from_account(&caller)) {
			return Err(ServiceError::AuthorizationDenied);
		}

		let accounts = self
			.accounts
			.list_accounts(approval)
			.await
			.map_err(ServiceError::db("list accounts"))?;
		Ok(accounts.iter().map(AccountResponse::from).collect())
	}

	/// Create an approved administrator. Used by the `create-admin` command,
	/// not exposed over HTTP.
	#[instrument(skip_all)]
	pub async fn create_admin(&self, email: &str, password: &str) -> Result<AccountResponse> {
		let email = normalize_email(email);
		if !is_valid_email(&email) {
			return Err(ServiceError::invalid_request("a valid e-mail address is required"));
		}
		require_password(password)?;

		let now = self.now();
		let mut account = Account::new(&email, self.hasher.hash(password)?, now);
		account.is_admin = true;
		account.approval = ApprovalState::Approved;
		self
			.accounts
			.create_account(&account)
			.await
			.map_err(|e| match e {
				DbError::Conflict(_) => ServiceError::DuplicateAccount,
				other => ServiceError::upstream("database", "create account", other),
			})?;

		tracing::info!(account_id = %account.id, "administrator created");
		Ok(AccountResponse::from(account))
	}

	#[instrument(skip_all, fields(target_account_id = %account_id, state = %state))]
	async fn set_approval(
		&self,
		token: &str,
		account_id: AccountId,
		state: ApprovalState,
	) -> Result<Account> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		if !can_manage_accounts(&CallerAttrs::from_account(&caller)) {
			return Err(ServiceError::AuthorizationDenied);
		}

		let updated = self
			.accounts
			.set_approval(&account_id, state, now)
			.await
			.map_err(ServiceError::db("set approval"))?;
		if !updated {
			return Err(ServiceError::AccountNotFound);
		}

		tracing::info!(admin_id = %caller.id, "account approval changed");
		self
			.accounts
			.get_account_by_id(&account_id)
			.await
			.map_err(ServiceError::db("get account"))?
			.ok_or(ServiceError::AccountNotFound)
	}
}

pub(super) fn session(account: &Account, token: String) -> SessionResponse {
	SessionResponse {
		token,
		account: AccountResponse::from(account),
	}
}
