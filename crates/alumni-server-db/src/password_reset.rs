// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password reset token repository.

use alumni_directory_core::PasswordResetId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{format_timestamp, parse_timestamp, parse_uuid};
use crate::types::PasswordReset;

#[async_trait]
pub trait PasswordResetStore: Send + Sync {
	async fn create_reset(&self, reset: &PasswordReset) -> Result<(), DbError>;
	async fn find_valid_reset(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<PasswordReset>, DbError>;
	async fn delete_resets_for_email(&self, email: &str) -> Result<u64, DbError>;
	async fn delete_expired_resets(&self, now: DateTime<Utc>) -> Result<u64, DbError>;
}

#[async_trait]
impl PasswordResetStore for PasswordResetRepository {
	async fn create_reset(&self, reset: &PasswordReset) -> Result<(), DbError> {
		self.create_reset(reset).await
	}

	async fn find_valid_reset(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<PasswordReset>, DbError> {
		self.find_valid_reset(token_hash, now).await
	}

	async fn delete_resets_for_email(&self, email: &str) -> Result<u64, DbError> {
		self.delete_resets_for_email(email).await
	}

	async fn delete_expired_resets(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
		self.delete_expired_resets(now).await
	}
}

#[derive(Clone)]
pub struct PasswordResetRepository {
	pool: SqlitePool,
}

impl PasswordResetRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, reset), fields(reset_id = %reset.id))]
	pub async fn create_reset(&self, reset: &PasswordReset) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO password_resets (id, email, token_hash, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(reset.id.to_string())
		.bind(&reset.email)
		.bind(&reset.token_hash)
		.bind(format_timestamp(&reset.created_at))
		.bind(format_timestamp(&reset.expires_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "password reset"))?;

		Ok(())
	}

	/// Find an unexpired reset by the hash of its token.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn find_valid_reset(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<PasswordReset>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, token_hash, created_at, expires_at
			FROM password_resets
			WHERE token_hash = ? AND expires_at > ?
			"#,
		)
		.bind(token_hash)
		.bind(format_timestamp(&now))
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_reset_row).transpose()
	}

	#[tracing::instrument(skip(self, email))]
	pub async fn delete_resets_for_email(&self, email: &str) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM password_resets WHERE email = ?")
			.bind(email)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete_expired_resets(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM password_resets WHERE expires_at <= ?")
			.bind(format_timestamp(&now))
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected();
		if deleted > 0 {
			tracing::debug!(deleted, "expired password resets removed");
		}
		Ok(deleted)
	}
}

fn parse_reset_row(row: &sqlx::sqlite::SqliteRow) -> Result<PasswordReset, DbError> {
	let id_str: String = row.get("id");
	let created_at_str: String = row.get("created_at");
	let expires_at_str: String = row.get("expires_at");

	Ok(PasswordReset {
		id: PasswordResetId::new(parse_uuid(&id_str, "password reset id")?),
		email: row.get("email"),
		token_hash: row.get("token_hash"),
		created_at: parse_timestamp(&created_at_str, "created_at")?,
		expires_at: parse_timestamp(&expires_at_str, "expires_at")?,
	})
}
