// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::{compute_window, AlumniRecord, FullView, PageRequest};
use alumni_server_auth::{can_manage_accounts, CallerAttrs};
use alumni_server_db::AlumniFilter;
use alumni_server_smtp::HAPPY_BIRTHDAY;
use chrono::NaiveDate;
use tracing::instrument;

use super::AlumniService;
use crate::error::{Result, ServiceError};

/// Outcome of one birthday e-mail run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BirthdaySummary {
	pub sent: usize,
	pub failed: usize,
	/// Records with no usable recipient address.
	pub skipped: usize,
}

impl AlumniService {
	/// Records whose birthday is today, for administrators.
	#[instrument(skip_all)]
	pub async fn happy_birthday(&self, token: &str) -> Result<Vec<FullView>> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		if !can_manage_accounts(&CallerAttrs::from_account(&caller)) {
			return Err(ServiceError::AuthorizationDenied);
		}

		let records = self.birthday_records(now.date_naive()).await?;
		Ok(records
			.into_iter()
			.map(|record| self.full_view(record, now))
			.collect())
	}

	pub async fn birthday_records(&self, date: NaiveDate) -> Result<Vec<AlumniRecord>> {
		let (records, _) = self
			.alumni
			.find_records(
				&AlumniFilter::default(),
				compute_window(&PageRequest::unbounded()),
			)
			.await
			.map_err(ServiceError::db("find records"))?;

		Ok(records
			.into_iter()
			.filter(|record| record.profile.has_birthday_on(date))
			.collect())
	}

	/// Greet everyone with a birthday on `date`. Per-recipient failures are
	/// counted, not returned.
	#[instrument(skip(self))]
	pub async fn send_birthday_greetings(&self, date: NaiveDate) -> Result<BirthdaySummary> {
		let mut summary = BirthdaySummary::default();

		for record in self.birthday_records(date).await? {
			let Some(recipient) = self.greeting_recipient(&record).await else {
				summary.skipped += 1;
				continue;
			};

			let vars = self.profile_vars(&record.profile, &recipient);
			match self.send_template(HAPPY_BIRTHDAY, &recipient, vars).await {
				Ok(()) => summary.sent += 1,
				Err(e) => {
					tracing::warn!(record_id = %record.id, error = %e, "birthday e-mail failed");
					summary.failed += 1;
				}
			}
		}

		tracing::info!(
			sent = summary.sent,
			failed = summary.failed,
			skipped = summary.skipped,
			"birthday greetings finished"
		);
		Ok(summary)
	}

	/// The owning account's e-mail, else the address on the record.
	async fn greeting_recipient(&self, record: &AlumniRecord) -> Option<String> {
		match self.accounts.get_account_by_linked_record(&record.id).await {
			Ok(Some(owner)) => return Some(owner.email),
			Ok(None) => {}
			Err(e) => {
				tracing::warn!(record_id = %record.id, error = %e, "owner lookup failed");
			}
		}

		let address = record.profile.email_address.trim();
		(!address.is_empty()).then(|| address.to_string())
	}
}
