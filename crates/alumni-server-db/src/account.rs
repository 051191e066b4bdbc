// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account repository.
//!
//! E-mail addresses are stored lowercased and are unique. Linking an account
//! to its alumni record goes through [`AccountRepository::claim_record`], a
//! single conditional update, so two concurrent claims cannot both succeed.

use alumni_directory_core::{Account, AccountId, AlumniId, ApprovalState};
use alumni_server_auth::{AccountLookup, AuthError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{format_timestamp, parse_timestamp, parse_uuid};

#[async_trait]
pub trait AccountStore: Send + Sync {
	async fn create_account(&self, account: &Account) -> Result<(), DbError>;
	async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError>;
	async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError>;
	async fn get_account_by_linked_record(
		&self,
		record_id: &AlumniId,
	) -> Result<Option<Account>, DbError>;
	async fn list_accounts(&self, approval: Option<ApprovalState>) -> Result<Vec<Account>, DbError>;
	async fn set_approval(
		&self,
		id: &AccountId,
		approval: ApprovalState,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError>;
	async fn update_credential(
		&self,
		id: &AccountId,
		credential_hash: &str,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError>;
	async fn claim_record(
		&self,
		id: &AccountId,
		record_id: &AlumniId,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError>;
}

#[async_trait]
impl AccountStore for AccountRepository {
	async fn create_account(&self, account: &Account) -> Result<(), DbError> {
		self.create_account(account).await
	}

	async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError> {
		self.get_account_by_id(id).await
	}

	async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
		self.get_account_by_email(email).await
	}

	async fn get_account_by_linked_record(
		&self,
		record_id: &AlumniId,
	) -> Result<Option<Account>, DbError> {
		self.get_account_by_linked_record(record_id).await
	}

	async fn list_accounts(&self, approval: Option<ApprovalState>) -> Result<Vec<Account>, DbError> {
		self.list_accounts(approval).await
	}

	async fn set_approval(
		&self,
		id: &AccountId,
		approval: ApprovalState,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		self.set_approval(id, approval, updated_at).await
	}

	async fn update_credential(
		&self,
		id: &AccountId,
		credential_hash: &str,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		self.update_credential(id, credential_hash, updated_at).await
	}

	async fn claim_record(
		&self,
		id: &AccountId,
		record_id: &AlumniId,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		self.claim_record(id, record_id, updated_at).await
	}
}

#[async_trait]
impl AccountLookup for AccountRepository {
	async fn find_account(&self, id: &AccountId) -> Result<Option<Account>, AuthError> {
		self
			.get_account_by_id(id)
			.await
			.map_err(|e| AuthError::Lookup(e.to_string()))
	}
}

/// Repository for account database operations.
#[derive(Clone)]
pub struct AccountRepository {
	pool: SqlitePool,
}

impl AccountRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new account.
	///
	/// # Errors
	/// `DbError::Conflict` if the e-mail is already registered.
	#[tracing::instrument(skip(self, account), fields(account_id = %account.id))]
	pub async fn create_account(&self, account: &Account) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO accounts (
				id, email, credential_hash, linked_record_id, is_admin, approval,
				created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(account.id.to_string())
		.bind(&account.email)
		.bind(&account.credential_hash)
		.bind(account.linked_record_id.map(|id| id.to_string()))
		.bind(account.is_admin)
		.bind(account.approval.as_str())
		.bind(format_timestamp(&account.created_at))
		.bind(format_timestamp(&account.updated_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "account"))?;

		tracing::debug!(account_id = %account.id, "account created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(account_id = %id))]
	pub async fn get_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, credential_hash, linked_record_id, is_admin, approval,
			       created_at, updated_at
			FROM accounts
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_account_row).transpose()
	}

	/// Look up an account by e-mail, case-insensitively.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, credential_hash, linked_record_id, is_admin, approval,
			       created_at, updated_at
			FROM accounts
			WHERE email = ?
			"#,
		)
		.bind(email.trim().to_lowercase())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_account_row).transpose()
	}

	/// Find the non-admin account that owns a record.
	#[tracing::instrument(skip(self), fields(record_id = %record_id))]
	pub async fn get_account_by_linked_record(
		&self,
		record_id: &AlumniId,
	) -> Result<Option<Account>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, credential_hash, linked_record_id, is_admin, approval,
			       created_at, updated_at
			FROM accounts
			WHERE linked_record_id = ?
			ORDER BY is_admin ASC, created_at ASC
			LIMIT 1
			"#,
		)
		.bind(record_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_account_row).transpose()
	}

	/// List accounts, optionally only those in one approval state.
	#[tracing::instrument(skip(self))]
	pub async fn list_accounts(&self, approval: Option<ApprovalState>) -> Result<Vec<Account>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, email, credential_hash, linked_record_id, is_admin, approval,
			       created_at, updated_at
			FROM accounts
			WHERE ?1 IS NULL OR approval = ?1
			ORDER BY created_at ASC, id ASC
			"#,
		)
		.bind(approval.map(|a| a.as_str()))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_account_row).collect()
	}

	/// Move an account to `approval`, re-stamping `updated_at`.
	///
	/// # Returns
	/// `false` if no account has this id.
	#[tracing::instrument(skip(self), fields(account_id = %id, approval = %approval))]
	pub async fn set_approval(
		&self,
		id: &AccountId,
		approval: ApprovalState,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE accounts
			SET approval = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(approval.as_str())
		.bind(format_timestamp(&updated_at))
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self, credential_hash), fields(account_id = %id))]
	pub async fn update_credential(
		&self,
		id: &AccountId,
		credential_hash: &str,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE accounts
			SET credential_hash = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(credential_hash)
		.bind(format_timestamp(&updated_at))
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Link `record_id` to the account if it has no record yet.
	///
	/// # Returns
	/// `false` if the account already holds a record (or does not exist).
	///
	/// # Errors
	/// `DbError::Conflict` if another non-admin account already owns the record.
	#[tracing::instrument(skip(self), fields(account_id = %id, record_id = %record_id))]
	pub async fn claim_record(
		&self,
		id: &AccountId,
		record_id: &AlumniId,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE accounts
			SET linked_record_id = ?, updated_at = ?
			WHERE id = ? AND linked_record_id IS NULL
			"#,
		)
		.bind(record_id.to_string())
		.bind(format_timestamp(&updated_at))
		.bind(id.to_string())
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "record owner"))?;

		let claimed = result.rows_affected() > 0;
		tracing::debug!(claimed, "record claim attempted");
		Ok(claimed)
	}
}

fn parse_account_row(row: &sqlx::sqlite::SqliteRow) -> Result<Account, DbError> {
	let id_str: String = row.get("id");
	let linked_str: Option<String> = row.get("linked_record_id");
	let approval_str: String = row.get("approval");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	let approval = approval_str
		.parse::<ApprovalState>()
		.map_err(|e| DbError::Internal(e.to_string()))?;

	Ok(Account {
		id: AccountId::new(parse_uuid(&id_str, "account id")?),
		email: row.get("email"),
		credential_hash: row.get("credential_hash"),
		linked_record_id: linked_str
			.map(|s| parse_uuid(&s, "linked_record_id").map(AlumniId::new))
			.transpose()?,
		is_admin: row.get("is_admin"),
		approval,
		created_at: parse_timestamp(&created_at_str, "created_at")?,
		updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use chrono::{Duration, TimeZone};

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
	}

	async fn make_repo() -> AccountRepository {
		AccountRepository::new(create_test_pool().await)
	}

	fn account(email: &str) -> Account {
		Account::new(email, "$argon2id$hash".to_string(), now())
	}

	mod create_and_get {
		use super::*;

		#[tokio::test]
		async fn round_trips_all_fields() {
			let repo = make_repo().await;
			let mut original = account("Grace@Example.com");
			original.is_admin = true;
			original.approval = ApprovalState::Approved;
			repo.create_account(&original).await.unwrap();

			let loaded = repo.get_account_by_id(&original.id).await.unwrap().unwrap();
			assert_eq!(loaded, original);
		}

		#[tokio::test]
		async fn email_lookup_is_case_insensitive() {
			let repo = make_repo().await;
			let original = account("grace@example.com");
			repo.create_account(&original).await.unwrap();

			let loaded = repo
				.get_account_by_email("  GRACE@example.COM")
				.await
				.unwrap()
				.unwrap();
			assert_eq!(loaded.id, original.id);
		}

		#[tokio::test]
		async fn duplicate_email_conflicts() {
			let repo = make_repo().await;
			repo.create_account(&account("dup@example.com")).await.unwrap();
			let err = repo
				.create_account(&account("DUP@example.com"))
				.await
				.unwrap_err();
			assert!(matches!(err, DbError::Conflict(_)));
		}

		#[tokio::test]
		async fn missing_account_is_none() {
			let repo = make_repo().await;
			assert!(repo
				.get_account_by_id(&AccountId::generate())
				.await
				.unwrap()
				.is_none());
		}
	}

	mod approval {
		use super::*;

		#[tokio::test]
		async fn set_approval_restamps_updated_at() {
			let repo = make_repo().await;
			let original = account("a@example.com");
			repo.create_account(&original).await.unwrap();

			let later = now() + Duration::hours(1);
			assert!(repo
				.set_approval(&original.id, ApprovalState::Approved, later)
				.await
				.unwrap());

			let loaded = repo.get_account_by_id(&original.id).await.unwrap().unwrap();
			assert_eq!(loaded.approval, ApprovalState::Approved);
			assert_eq!(loaded.updated_at, later);
			assert_eq!(loaded.created_at, original.created_at);
		}

		#[tokio::test]
		async fn set_approval_on_missing_account_returns_false() {
			let repo = make_repo().await;
			assert!(!repo
				.set_approval(&AccountId::generate(), ApprovalState::Denied, now())
				.await
				.unwrap());
		}

		#[tokio::test]
		async fn list_filters_by_state() {
			let repo = make_repo().await;
			let pending = account("p@example.com");
			let mut approved = account("a@example.com");
			approved.approval = ApprovalState::Approved;
			repo.create_account(&pending).await.unwrap();
			repo.create_account(&approved).await.unwrap();

			let all = repo.list_accounts(None).await.unwrap();
			assert_eq!(all.len(), 2);

			let only_pending = repo
				.list_accounts(Some(ApprovalState::Pending))
				.await
				.unwrap();
			assert_eq!(only_pending.len(), 1);
			assert_eq!(only_pending[0].id, pending.id);
		}
	}

	mod claims {
		use super::*;

		#[tokio::test]
		async fn first_claim_wins() {
			let repo = make_repo().await;
			let owner = account("owner@example.com");
			repo.create_account(&owner).await.unwrap();

			let first = AlumniId::generate();
			let second = AlumniId::generate();
			assert!(repo.claim_record(&owner.id, &first, now()).await.unwrap());
			assert!(!repo.claim_record(&owner.id, &second, now()).await.unwrap());

			let loaded = repo.get_account_by_id(&owner.id).await.unwrap().unwrap();
			assert_eq!(loaded.linked_record_id, Some(first));
		}

		#[tokio::test]
		async fn two_accounts_cannot_own_one_record() {
			let repo = make_repo().await;
			let a = account("a@example.com");
			let b = account("b@example.com");
			repo.create_account(&a).await.unwrap();
			repo.create_account(&b).await.unwrap();

			let record = AlumniId::generate();
			assert!(repo.claim_record(&a.id, &record, now()).await.unwrap());
			let err = repo.claim_record(&b.id, &record, now()).await.unwrap_err();
			assert!(matches!(err, DbError::Conflict(_)));
		}

		#[tokio::test]
		async fn owner_found_by_linked_record() {
			let repo = make_repo().await;
			let owner = account("owner@example.com");
			repo.create_account(&owner).await.unwrap();
			let record = AlumniId::generate();
			repo.claim_record(&owner.id, &record, now()).await.unwrap();

			let found = repo
				.get_account_by_linked_record(&record)
				.await
				.unwrap()
				.unwrap();
			assert_eq!(found.id, owner.id);
		}
	}

	#[tokio::test]
	async fn update_credential_replaces_hash() {
		let repo = make_repo().await;
		let original = account("a@example.com");
		repo.create_account(&original).await.unwrap();
		assert!(repo
			.update_credential(&original.id, "$argon2id$new", now())
			.await
			.unwrap());
		let loaded = repo.get_account_by_id(&original.id).await.unwrap().unwrap();
		assert_eq!(loaded.credential_hash, "$argon2id$new");
	}

	#[tokio::test]
	async fn account_lookup_uses_repository() {
		let repo = make_repo().await;
		let original = account("a@example.com");
		repo.create_account(&original).await.unwrap();
		let found = AccountLookup::find_account(&repo, &original.id).await.unwrap();
		assert_eq!(found.map(|a| a.id), Some(original.id));
	}
}
