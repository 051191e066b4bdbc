// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Presigned object downloads.

use alumni_server_api::ApiErrorResponse;
use axum::{
	extract::{Path, Query, State},
	http::header::{CACHE_CONTROL, CONTENT_TYPE},
	response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{api::AppState, error::Result};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SignedUrlQuery {
	/// Unix seconds after which the link stops working.
	pub expires: i64,
	/// Hex HMAC-SHA256 over the key and expiry.
	pub signature: String,
}

#[utoipa::path(
    get,
    path = "/files/{key}",
    params(
        ("key" = String, Path, description = "Object key, e.g. `<record-id>/profile`"),
        SignedUrlQuery
    ),
    responses(
        (status = 200, description = "Object bytes", content_type = "application/octet-stream"),
        (status = 403, description = "Bad signature or link expired", body = ApiErrorResponse),
        (status = 404, description = "No such object", body = ApiErrorResponse)
    ),
    tag = "files"
)]
pub async fn download(
	State(state): State<AppState>,
	Path(key): Path<String>,
	Query(query): Query<SignedUrlQuery>,
) -> Result<impl IntoResponse> {
	let object = state
		.service
		.download(&key, query.expires, &query.signature)
		.await?;
	Ok((
		[
			(CONTENT_TYPE, object.content_type),
			(CACHE_CONTROL, "private, max-age=300".to_string()),
		],
		object.bytes,
	))
}
