// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::format_timestamp;
use crate::types::EmailTemplate;

#[async_trait]
pub trait EmailTemplateStore: Send + Sync {
	async fn get_template(&self, name: &str) -> Result<Option<EmailTemplate>, DbError>;
	async fn upsert_template(
		&self,
		template: &EmailTemplate,
		updated_at: DateTime<Utc>,
	) -> Result<(), DbError>;
}

#[async_trait]
impl EmailTemplateStore for EmailTemplateRepository {
	async fn get_template(&self, name: &str) -> Result<Option<EmailTemplate>, DbError> {
		self.get_template(name).await
	}

	async fn upsert_template(
		&self,
		template: &EmailTemplate,
		updated_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		self.upsert_template(template, updated_at).await
	}
}

#[derive(Clone)]
pub struct EmailTemplateRepository {
	pool: SqlitePool,
}

impl EmailTemplateRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_template(&self, name: &str) -> Result<Option<EmailTemplate>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT name, subject, html
			FROM email_templates
			WHERE name = ?
			"#,
		)
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(|row| EmailTemplate {
			name: row.get("name"),
			subject: row.get("subject"),
			html: row.get("html"),
		}))
	}

	#[tracing::instrument(skip(self, template), fields(name = %template.name))]
	pub async fn upsert_template(
		&self,
		template: &EmailTemplate,
		updated_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO email_templates (name, subject, html, updated_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT(name) DO UPDATE SET
				subject = excluded.subject,
				html = excluded.html,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(&template.name)
		.bind(&template.subject)
		.bind(&template.html)
		.bind(format_timestamp(&updated_at))
		.execute(&self.pool)
		.await?;

		Ok(())
	}
}
