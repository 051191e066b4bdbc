// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers. Each one decodes the request, calls a single
//! [`AlumniService`](crate::service::AlumniService) operation and encodes the
//! result.

pub mod alumni;
pub mod files;
pub mod health;
pub mod users;

use std::str::FromStr;

use alumni_directory_core::AlumniProfile;
use alumni_server_auth::extract_bearer_token;
use axum::{extract::Multipart, http::HeaderMap};

use crate::error::{Result, ServiceError};
use crate::service::PhotoUpload;

/// Multipart part carrying the profile as JSON.
pub const PROFILE_JSON_PART: &str = "json";
/// Multipart part carrying the optional photo.
pub const PHOTO_PART: &str = "profile";

pub(crate) fn bearer(headers: &HeaderMap) -> Result<String> {
	extract_bearer_token(headers).ok_or(ServiceError::InvalidToken)
}

pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T> {
	raw
		.parse()
		.map_err(|_| ServiceError::invalid_request(format!("invalid {what} id")))
}

/// Decode a record form. An empty photo part counts as no photo.
pub(crate) async fn read_record_form(
	mut multipart: Multipart,
) -> Result<(AlumniProfile, Option<PhotoUpload>)> {
	let mut profile = None;
	let mut photo = None;

	while let Some(field) = multipart
		.next_field()
		.await
		.map_err(|e| ServiceError::invalid_request(format!("malformed multipart body: {e}")))?
	{
		match field.name() {
			Some(PROFILE_JSON_PART) => {
				let text = field
					.text()
					.await
					.map_err(|e| ServiceError::invalid_request(format!("unreadable profile: {e}")))?;
				let parsed: AlumniProfile = serde_json::from_str(&text)
					.map_err(|e| ServiceError::invalid_request(format!("invalid profile JSON: {e}")))?;
				profile = Some(parsed);
			}
			Some(PHOTO_PART) => {
				let bytes = field
					.bytes()
					.await
					.map_err(|e| ServiceError::invalid_request(format!("unreadable photo: {e}")))?;
				if !bytes.is_empty() {
					photo = Some(PhotoUpload::new(bytes));
				}
			}
			other => {
				tracing::debug!(part = ?other, "ignoring unknown multipart part");
			}
		}
	}

	let profile = profile.ok_or_else(|| {
		ServiceError::invalid_request(format!("missing `{PROFILE_JSON_PART}` part"))
	})?;
	Ok((profile, photo))
}
