// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory workflows.
//!
//! Every protected operation resolves the bearer token to an account first,
//! then fetches its target and asks the visibility rules what the caller may
//! see or change. Listings additionally go through the pagination window.
//! Writes already committed when a later collaborator fails are kept.

mod accounts;
mod birthdays;
mod export;
mod notify;
mod password;
mod records;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use alumni_directory_core::{
	Account, AlumniRecord, Disclosure, DisclosureLevel, FullView, RedactedView,
};
use alumni_server_auth::{
	resolve_disclosure, CallerAttrs, Clock, CredentialHasher, SessionResolver, TargetAttrs,
};
use alumni_server_db::{AccountStore, AlumniStore, EmailTemplateStore, PasswordResetStore};
use alumni_server_smtp::Notifier;
use alumni_server_storage::{sniff_image_type, ObjectStore};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::{Result, ServiceError};

pub use birthdays::BirthdaySummary;
pub use export::CsvExport;

/// Values the workflows need from configuration.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
	/// Public origin, used in e-mail links.
	pub base_url: String,
	/// Receives "new alumni" and "alumni updated" notices.
	pub admin_address: Option<String>,
	/// Page linked from password reset e-mails.
	pub reset_url: String,
}

/// Collaborators handed to [`AlumniService::new`].
pub struct ServiceDeps {
	pub accounts: Arc<dyn AccountStore>,
	pub alumni: Arc<dyn AlumniStore>,
	pub resets: Arc<dyn PasswordResetStore>,
	pub templates: Arc<dyn EmailTemplateStore>,
	pub objects: Arc<dyn ObjectStore>,
	pub notifier: Arc<dyn Notifier>,
	pub hasher: Arc<dyn CredentialHasher>,
	pub sessions: SessionResolver,
	pub clock: Arc<dyn Clock>,
	pub settings: ServiceSettings,
}

#[derive(Clone)]
pub struct AlumniService {
	accounts: Arc<dyn AccountStore>,
	alumni: Arc<dyn AlumniStore>,
	resets: Arc<dyn PasswordResetStore>,
	templates: Arc<dyn EmailTemplateStore>,
	objects: Arc<dyn ObjectStore>,
	notifier: Arc<dyn Notifier>,
	hasher: Arc<dyn CredentialHasher>,
	sessions: SessionResolver,
	clock: Arc<dyn Clock>,
	settings: ServiceSettings,
}

/// An uploaded profile picture. The content type is sniffed, never trusted
/// from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
	pub bytes: Bytes,
}

impl PhotoUpload {
	pub fn new(bytes: impl Into<Bytes>) -> Self {
		Self {
			bytes: bytes.into(),
		}
	}

	fn content_type(&self) -> Result<&'static str> {
		sniff_image_type(&self.bytes).ok_or_else(|| {
			ServiceError::invalid_request("profile picture must be a JPEG or PNG image")
		})
	}
}

impl AlumniService {
	pub fn new(deps: ServiceDeps) -> Self {
		Self {
			accounts: deps.accounts,
			alumni: deps.alumni,
			resets: deps.resets,
			templates: deps.templates,
			objects: deps.objects,
			notifier: deps.notifier,
			hasher: deps.hasher,
			sessions: deps.sessions,
			clock: deps.clock,
			settings: deps.settings,
		}
	}

	pub fn now(&self) -> DateTime<Utc> {
		self.clock.now()
	}

	async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Account> {
		Ok(self.sessions.resolve(token, now).await?)
	}

	async fn require_record(&self, id: &alumni_directory_core::AlumniId) -> Result<AlumniRecord> {
		self
			.alumni
			.get_record(id)
			.await
			.map_err(ServiceError::db("get record"))?
			.ok_or(ServiceError::RecordNotFound)
	}

	fn issue_token(&self, account: &Account, now: DateTime<Utc>) -> Result<String> {
		Ok(self.sessions.codec().issue(account.id, account.is_admin, now)?)
	}

	/// A presigned photo URL, or `None` when there is no photo or signing fails.
	fn photo_url(&self, record: &AlumniRecord, now: DateTime<Utc>) -> Option<String> {
		let key = record.photo_key.as_deref()?;
		match self.objects.presigned_url(key, now) {
			Ok(url) => Some(url),
			Err(e) => {
				tracing::warn!(record_id = %record.id, error = %e, "failed to presign photo URL");
				None
			}
		}
	}

	fn full_view(&self, record: AlumniRecord, now: DateTime<Utc>) -> FullView {
		let url = self.photo_url(&record, now);
		FullView::from_record(record, url)
	}

	fn disclose(&self, caller: &CallerAttrs, record: AlumniRecord, now: DateTime<Utc>) -> Disclosure {
		match resolve_disclosure(caller, &TargetAttrs::from_record(&record)) {
			DisclosureLevel::Full => Disclosure::Full(self.full_view(record, now)),
			DisclosureLevel::Redacted => {
				let url = self.photo_url(&record, now);
				Disclosure::Redacted(RedactedView::from_record(&record, url))
			}
			DisclosureLevel::Denied => Disclosure::Denied,
		}
	}

	/// Store `photo` under the record's key and return the key.
	async fn store_photo(&self, record: &AlumniRecord, photo: &PhotoUpload) -> Result<String> {
		let content_type = photo.content_type()?;
		let key = record.photo_storage_key();
		self
			.objects
			.put(&key, photo.bytes.clone(), content_type)
			.await
			.map_err(|e| ServiceError::upstream("object store", "put photo", e))?;
		tracing::debug!(record_id = %record.id, content_type, "profile photo stored");
		Ok(key)
	}
}

fn require_password(password: &str) -> Result<()> {
	if password.is_empty() {
		return Err(ServiceError::invalid_request("password must not be empty"));
	}
	Ok(())
}
