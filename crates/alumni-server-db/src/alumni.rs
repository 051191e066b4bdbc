// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Alumni record repository.
//!
//! The profile is stored as a JSON document. First and last name are copied
//! into their own columns so listings can filter and sort on them.

use alumni_directory_core::{AlumniId, AlumniProfile, AlumniRecord, Window};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{format_timestamp, parse_timestamp, parse_uuid};
use crate::types::AlumniFilter;

#[async_trait]
pub trait AlumniStore: Send + Sync {
	async fn create_record(&self, record: &AlumniRecord) -> Result<(), DbError>;
	async fn get_record(&self, id: &AlumniId) -> Result<Option<AlumniRecord>, DbError>;
	async fn update_profile(
		&self,
		id: &AlumniId,
		profile: &AlumniProfile,
		photo_key: Option<&str>,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError>;
	async fn set_privacy(
		&self,
		id: &AlumniId,
		is_public: bool,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError>;
	async fn find_records(
		&self,
		filter: &AlumniFilter,
		window: Window,
	) -> Result<(Vec<AlumniRecord>, u64), DbError>;
}

#[async_trait]
impl AlumniStore for AlumniRepository {
	async fn create_record(&self, record: &AlumniRecord) -> Result<(), DbError> {
		self.create_record(record).await
	}

	async fn get_record(&self, id: &AlumniId) -> Result<Option<AlumniRecord>, DbError> {
		self.get_record(id).await
	}

	async fn update_profile(
		&self,
		id: &AlumniId,
		profile: &AlumniProfile,
		photo_key: Option<&str>,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		self.update_profile(id, profile, photo_key, updated_at).await
	}

	async fn set_privacy(
		&self,
		id: &AlumniId,
		is_public: bool,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		self.set_privacy(id, is_public, updated_at).await
	}

	async fn find_records(
		&self,
		filter: &AlumniFilter,
		window: Window,
	) -> Result<(Vec<AlumniRecord>, u64), DbError> {
		self.find_records(filter, window).await
	}
}

/// Repository for alumni record database operations.
#[derive(Clone)]
pub struct AlumniRepository {
	pool: SqlitePool,
}

impl AlumniRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, record), fields(record_id = %record.id))]
	pub async fn create_record(&self, record: &AlumniRecord) -> Result<(), DbError> {
		let profile_json = serde_json::to_string(&record.profile)?;

		sqlx::query(
			r#"
			INSERT INTO alumni (
				id, firstname, lastname, profile, photo_key, is_public,
				created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.id.to_string())
		.bind(&record.profile.firstname)
		.bind(&record.profile.lastname)
		.bind(profile_json)
		.bind(&record.photo_key)
		.bind(record.is_public)
		.bind(format_timestamp(&record.created_at))
		.bind(format_timestamp(&record.updated_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "alumni record"))?;

		tracing::debug!(record_id = %record.id, "alumni record created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(record_id = %id))]
	pub async fn get_record(&self, id: &AlumniId) -> Result<Option<AlumniRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, profile, photo_key, is_public, created_at, updated_at
			FROM alumni
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_alumni_row).transpose()
	}

	/// Replace a record's profile.
	///
	/// `photo_key` of `None` leaves the stored photo untouched.
	///
	/// # Returns
	/// `false` if no record has this id.
	#[tracing::instrument(skip(self, profile), fields(record_id = %id))]
	pub async fn update_profile(
		&self,
		id: &AlumniId,
		profile: &AlumniProfile,
		photo_key: Option<&str>,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		let profile_json = serde_json::to_string(profile)?;

		let result = sqlx::query(
			r#"
			UPDATE alumni
			SET firstname = ?, lastname = ?, profile = ?,
			    photo_key = COALESCE(?, photo_key), updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&profile.firstname)
		.bind(&profile.lastname)
		.bind(profile_json)
		.bind(photo_key)
		.bind(format_timestamp(&updated_at))
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(record_id = %id, is_public))]
	pub async fn set_privacy(
		&self,
		id: &AlumniId,
		is_public: bool,
		updated_at: DateTime<Utc>,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE alumni
			SET is_public = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(is_public)
		.bind(format_timestamp(&updated_at))
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Return the records in `window` plus the total number matching `filter`.
	///
	/// Results are ordered by last name, first name and id, so consecutive
	/// windows over an unchanged table never overlap.
	#[tracing::instrument(skip(self), fields(skip = window.skip, limit = ?window.limit))]
	pub async fn find_records(
		&self,
		filter: &AlumniFilter,
		window: Window,
	) -> Result<(Vec<AlumniRecord>, u64), DbError> {
		let firstname = filter.firstname.as_deref().map(like_pattern);
		let lastname = filter.lastname.as_deref().map(like_pattern);
		let limit = window.limit.map(i64::from).unwrap_or(-1);
		// Offsets past i64::MAX can only land beyond the last row.
		let offset = i64::try_from(window.skip).unwrap_or(i64::MAX);

		let count: i64 = sqlx::query_scalar(
			r#"
			SELECT COUNT(*)
			FROM alumni
			WHERE (?1 IS NULL OR firstname LIKE ?1 ESCAPE '\')
			  AND (?2 IS NULL OR lastname LIKE ?2 ESCAPE '\')
			  AND (?3 = 0 OR is_public = 1)
			"#,
		)
		.bind(&firstname)
		.bind(&lastname)
		.bind(filter.public_only)
		.fetch_one(&self.pool)
		.await?;

		let rows = sqlx::query(
			r#"
			SELECT id, profile, photo_key, is_public, created_at, updated_at
			FROM alumni
			WHERE (?1 IS NULL OR firstname LIKE ?1 ESCAPE '\')
			  AND (?2 IS NULL OR lastname LIKE ?2 ESCAPE '\')
			  AND (?3 = 0 OR is_public = 1)
			ORDER BY lastname COLLATE NOCASE ASC, firstname COLLATE NOCASE ASC, id ASC
			LIMIT ?4 OFFSET ?5
			"#,
		)
		.bind(&firstname)
		.bind(&lastname)
		.bind(filter.public_only)
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.pool)
		.await?;

		let records = rows
			.iter()
			.map(parse_alumni_row)
			.collect::<Result<Vec<_>, _>>()?;

		Ok((records, count.max(0) as u64))
	}
}

/// Build a `LIKE` pattern matching `term` anywhere, with wildcards escaped.
fn like_pattern(term: &str) -> String {
	let mut escaped = String::with_capacity(term.len() + 2);
	escaped.push('%');
	for c in term.trim().chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped.push('%');
	escaped
}

fn parse_alumni_row(row: &sqlx::sqlite::SqliteRow) -> Result<AlumniRecord, DbError> {
	let id_str: String = row.get("id");
	let profile_json: String = row.get("profile");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	Ok(AlumniRecord {
		id: AlumniId::new(parse_uuid(&id_str, "alumni id")?),
		profile: serde_json::from_str(&profile_json)?,
		photo_key: row.get("photo_key"),
		is_public: row.get("is_public"),
		created_at: parse_timestamp(&created_at_str, "created_at")?,
		updated_at: parse_timestamp(&updated_at_str, "updated_at")?,
	})
}
