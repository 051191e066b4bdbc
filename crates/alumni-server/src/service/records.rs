// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::{
	compute_page_info, compute_window, Account, AlumniId, AlumniProfile, AlumniRecord, Disclosure,
	FullView, PageRequest,
};
use alumni_server_api::{AlumniItem, ListAlumniQuery, ListAlumniResponse};
use alumni_server_auth::{can_browse, can_modify, CallerAttrs, TargetAttrs};
use alumni_server_db::{AlumniFilter, DbError};
use alumni_server_smtp::{ALUMNI_UPDATED, NEW_ALUMNI};
use alumni_server_storage::StoredObject;
use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{AlumniService, PhotoUpload};
use crate::error::{Result, ServiceError};

const ALREADY_OWNS_RECORD: &str = "this account already has an alumni record";

impl AlumniService {
	/// Insert a private record and link it to the caller.
	///
	/// Administrators may create records for others; those stay unclaimed.
	#[instrument(skip_all)]
	pub async fn create_record(
		&self,
		token: &str,
		profile: AlumniProfile,
		photo: Option<PhotoUpload>,
	) -> Result<FullView> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		if !caller.is_admin && caller.linked_record_id.is_some() {
			return Err(ServiceError::invalid_request(ALREADY_OWNS_RECORD));
		}
		require_names(&profile)?;

		let mut record = AlumniRecord::new(profile, now);
		if let Some(photo) = &photo {
			record.photo_key = Some(self.store_photo(&record, photo).await?);
		}

		self
			.alumni
			.create_record(&record)
			.await
			.map_err(ServiceError::db("create record"))?;

		if !caller.is_admin {
			match self.accounts.claim_record(&caller.id, &record.id, now).await {
				Ok(true) => {}
				Ok(false) | Err(DbError::Conflict(_)) => {
					tracing::warn!(record_id = %record.id, "ownership claim lost; record left unclaimed");
					return Err(ServiceError::invalid_request(ALREADY_OWNS_RECORD));
				}
				Err(e) => return Err(ServiceError::upstream("database", "claim record", e)),
			}
		}

		tracing::info!(record_id = %record.id, account_id = %caller.id, "alumni record created");
		// The record stays committed when the notice fails.
		self
			.notify_admin(NEW_ALUMNI, self.profile_vars(&record.profile, &caller.email))
			.await?;

		Ok(self.full_view(record, now))
	}

	/// Replace a record's profile. The stored photo is kept unless a new one is given.
	#[instrument(skip_all, fields(record_id = %id))]
	pub async fn update_record(
		&self,
		token: &str,
		id: AlumniId,
		profile: AlumniProfile,
		photo: Option<PhotoUpload>,
	) -> Result<FullView> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		let record = self.require_record(&id).await?;
		self.require_modify(&caller, &record)?;
		require_names(&profile)?;

		let photo_key = match &photo {
			Some(photo) => Some(self.store_photo(&record, photo).await?),
			None => None,
		};

		let updated = self
			.alumni
			.update_profile(&id, &profile, photo_key.as_deref(), now)
			.await
			.map_err(ServiceError::db("update profile"))?;
		if !updated {
			return Err(ServiceError::RecordNotFound);
		}

		let record = self.require_record(&id).await?;
		tracing::info!(account_id = %caller.id, "alumni record updated");
		self
			.notify_admin(ALUMNI_UPDATED, self.profile_vars(&record.profile, &caller.email))
			.await?;

		Ok(self.full_view(record, now))
	}

	#[instrument(skip_all, fields(record_id = %id))]
	pub async fn fetch_one(&self, token: &str, id: AlumniId) -> Result<AlumniItem> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		let record = self.require_record(&id).await?;

		match self.disclose(&CallerAttrs::from_account(&caller), record, now) {
			Disclosure::Full(view) => Ok(AlumniItem::Full(view)),
			Disclosure::Redacted(view) => Ok(AlumniItem::Redacted(view)),
			Disclosure::Denied => Err(ServiceError::AuthorizationDenied),
		}
	}

	#[instrument(skip_all, fields(page = ?query.page, limit = ?query.limit))]
	pub async fn fetch_many(&self, token: &str, query: ListAlumniQuery) -> Result<ListAlumniResponse> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		let request = PageRequest::from_raw(query.page, query.limit)
			.map_err(|e| ServiceError::invalid_request(e.to_string()))?;

		let (items, matching) = self.browse(&caller, &query, &request, now).await?;
		Ok(ListAlumniResponse {
			items,
			page_info: compute_page_info(matching, &request),
		})
	}

	#[instrument(skip_all, fields(record_id = %id, is_public))]
	pub async fn change_privacy(&self, token: &str, id: AlumniId, is_public: bool) -> Result<FullView> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		let record = self.require_record(&id).await?;
		self.require_modify(&caller, &record)?;

		let updated = self
			.alumni
			.set_privacy(&id, is_public, now)
			.await
			.map_err(ServiceError::db("set privacy"))?;
		if !updated {
			return Err(ServiceError::RecordNotFound);
		}

		let record = self.require_record(&id).await?;
		Ok(self.full_view(record, now))
	}

	/// Serve an object behind a presigned URL.
	#[instrument(skip(self, signature))]
	pub async fn download(&self, key: &str, expires: i64, signature: &str) -> Result<StoredObject> {
		Ok(self
			.objects
			.get_signed(key, expires, signature, self.now())
			.await?)
	}

	/// Records the caller may list, already disclosed, plus the matching count.
	pub(super) async fn browse(
		&self,
		caller: &Account,
		query: &ListAlumniQuery,
		request: &PageRequest,
		now: DateTime<Utc>,
	) -> Result<(Vec<AlumniItem>, u64)> {
		let attrs = CallerAttrs::from_account(caller);
		if !can_browse(&attrs) {
			return Err(ServiceError::AuthorizationDenied);
		}

		let filter = listing_filter(query, &attrs);
		let (records, matching) = self
			.alumni
			.find_records(&filter, compute_window(request))
			.await
			.map_err(ServiceError::db("find records"))?;

		let items = records
			.into_iter()
			.filter_map(|record| match self.disclose(&attrs, record, now) {
				Disclosure::Full(view) => Some(AlumniItem::Full(view)),
				Disclosure::Redacted(view) => Some(AlumniItem::Redacted(view)),
				Disclosure::Denied => None,
			})
			.collect();
		Ok((items, matching))
	}

	fn require_modify(&self, caller: &Account, record: &AlumniRecord) -> Result<()> {
		if can_modify(
			&CallerAttrs::from_account(caller),
			&TargetAttrs::from_record(record),
		) {
			Ok(())
		} else {
			Err(ServiceError::AuthorizationDenied)
		}
	}
}

fn listing_filter(query: &ListAlumniQuery, caller: &CallerAttrs) -> AlumniFilter {
	let name = |value: &Option<String>| {
		value
			.as_deref()
			.map(str::trim)
			.filter(|v| !v.is_empty())
			.map(str::to_string)
	};
	let filter = AlumniFilter {
		firstname: name(&query.firstname),
		lastname: name(&query.lastname),
		public_only: false,
	};
	if caller.is_admin {
		filter
	} else {
		filter.public_only()
	}
}

fn require_names(profile: &AlumniProfile) -> Result<()> {
	if profile.firstname.trim().is_empty() || profile.lastname.trim().is_empty() {
		return Err(ServiceError::invalid_request("first and last name are required"));
	}
	Ok(())
}
