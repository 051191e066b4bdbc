// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session resolution.
//!
//! Every protected operation starts here: the bearer token is verified and
//! the account it names is loaded fresh from storage, so approval-state and
//! admin changes take effect on the next request even while old tokens are
//! still valid.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{AuthError, Result};
use crate::token::TokenCodec;
use alumni_directory_core::{Account, AccountId};

/// Loads accounts by id for session resolution.
#[async_trait]
pub trait AccountLookup: Send + Sync {
	async fn find_account(&self, id: &AccountId) -> Result<Option<Account>>;
}

#[derive(Clone)]
pub struct SessionResolver {
	codec: Arc<TokenCodec>,
	accounts: Arc<dyn AccountLookup>,
}

impl SessionResolver {
	pub fn new(codec: Arc<TokenCodec>, accounts: Arc<dyn AccountLookup>) -> Self {
		Self { codec, accounts }
	}

	pub fn codec(&self) -> &TokenCodec {
		&self.codec
	}

	/// Verify `token` and load the account it names.
	#[instrument(skip_all)]
	pub async fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Account> {
		let claims = self.codec.parse(token, now)?;
		let account = self
			.accounts
			.find_account(&claims.sub)
			.await?
			.ok_or(AuthError::AccountNotFound(claims.sub))?;

		tracing::debug!(account_id = %account.id, "session resolved");
		Ok(account)
	}

	/// Resolve, then issue a fresh token whose admin flag comes from the
	/// loaded account rather than the presented token.
	#[instrument(skip_all)]
	pub async fn resolve_and_refresh(
		&self,
		token: &str,
		now: DateTime<Utc>,
	) -> Result<(Account, String)> {
		let account = self.resolve(token, now).await?;
		let refreshed = self.codec.issue(account.id, account.is_admin, now)?;
		Ok((account, refreshed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alumni_common_secret::SecretString;
	use chrono::{Duration, TimeZone};
	use std::collections::HashMap;
	use std::sync::Mutex;

	#[derive(Default)]
	struct InMemoryAccounts {
		accounts: Mutex<HashMap<AccountId, Account>>,
	}

	impl InMemoryAccounts {
		fn insert(&self, account: Account) {
			self.accounts.lock().unwrap().insert(account.id, account);
		}
	}

	#[async_trait]
	impl AccountLookup for InMemoryAccounts {
		async fn find_account(&self, id: &AccountId) -> Result<Option<Account>> {
			Ok(self.accounts.lock().unwrap().get(id).cloned())
		}
	}

	struct FailingAccounts;

	#[async_trait]
	impl AccountLookup for FailingAccounts {
		async fn find_account(&self, _id: &AccountId) -> Result<Option<Account>> {
			Err(AuthError::Lookup("database unavailable".to_string()))
		}
	}

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap()
	}

	fn setup() -> (SessionResolver, Arc<InMemoryAccounts>, Arc<TokenCodec>) {
		let codec = Arc::new(TokenCodec::new(&SecretString::new("session-key".into())));
		let accounts = Arc::new(InMemoryAccounts::default());
		let resolver = SessionResolver::new(codec.clone(), accounts.clone());
		(resolver, accounts, codec)
	}

	#[tokio::test]
	async fn resolves_existing_account() {
		let (resolver, accounts, codec) = setup();
		let account = Account::new("a@example.com", "h".into(), now());
		accounts.insert(account.clone());

		let token = codec.issue(account.id, false, now()).unwrap();
		let resolved = resolver.resolve(&token, now()).await.unwrap();
		assert_eq!(resolved.id, account.id);
	}

	#[tokio::test]
	async fn unknown_account_is_not_found() {
		let (resolver, _accounts, codec) = setup();
		let id = AccountId::generate();
		let token = codec.issue(id, false, now()).unwrap();
		let err = resolver.resolve(&token, now()).await.unwrap_err();
		assert!(matches!(err, AuthError::AccountNotFound(missing) if missing == id));
	}

	#[tokio::test]
	async fn expired_token_never_touches_storage() {
		let codec = Arc::new(TokenCodec::new(&SecretString::new("session-key".into())));
		let resolver = SessionResolver::new(codec.clone(), Arc::new(FailingAccounts));
		let token = codec.issue(AccountId::generate(), false, now()).unwrap();
		let err = resolver
			.resolve(&token, now() + Duration::hours(37))
			.await
			.unwrap_err();
		assert!(matches!(err, AuthError::ExpiredToken));
	}

	#[tokio::test]
	async fn lookup_failure_propagates() {
		let codec = Arc::new(TokenCodec::new(&SecretString::new("session-key".into())));
		let resolver = SessionResolver::new(codec.clone(), Arc::new(FailingAccounts));
		let token = codec.issue(AccountId::generate(), false, now()).unwrap();
		assert!(matches!(
			resolver.resolve(&token, now()).await.unwrap_err(),
			AuthError::Lookup(_)
		));
	}

	#[tokio::test]
	async fn refresh_reads_admin_flag_from_account() {
		let (resolver, accounts, codec) = setup();
		let mut account = Account::new("a@example.com", "h".into(), now());
		account.is_admin = true;
		accounts.insert(account.clone());

		// Token was issued before the promotion.
		let stale = codec.issue(account.id, false, now()).unwrap();
		let later = now() + Duration::hours(10);
		let (_, refreshed) = resolver.resolve_and_refresh(&stale, later).await.unwrap();

		let claims = codec.parse(&refreshed, later).unwrap();
		assert!(claims.admin);
		assert_eq!(claims.exp, later.timestamp() + 36 * 3600);
	}

	#[tokio::test]
	async fn refresh_extends_lifetime_past_original_expiry() {
		let (resolver, accounts, codec) = setup();
		let account = Account::new("a@example.com", "h".into(), now());
		accounts.insert(account.clone());

		let token = codec.issue(account.id, false, now()).unwrap();
		let later = now() + Duration::hours(30);
		let (_, refreshed) = resolver.resolve_and_refresh(&token, later).await.unwrap();

		let beyond_original = now() + Duration::hours(40);
		assert!(resolver.resolve(&token, beyond_original).await.is_err());
		assert!(resolver.resolve(&refreshed, beyond_original).await.is_ok());
	}

	mod properties {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn resolves_until_expiry(offset_secs in 0i64..(72 * 3600)) {
				let (resolver, accounts, codec) = setup();
				let account = Account::new("a@example.com", "h".into(), now());
				accounts.insert(account.clone());
				let token = codec.issue(account.id, false, now()).unwrap();

				let result = tokio_test::block_on(
					resolver.resolve(&token, now() + Duration::seconds(offset_secs)),
				);
				if offset_secs < 36 * 3600 {
					prop_assert_eq!(result.unwrap().id, account.id);
				} else {
					prop_assert!(matches!(result, Err(AuthError::ExpiredToken)));
				}
			}
		}
	}
}
