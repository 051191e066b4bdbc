// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Alumni record handlers.

use alumni_directory_core::{AlumniId, FullView};
use alumni_server_api::{AlumniItem, ApiErrorResponse, ListAlumniQuery, ListAlumniResponse};
use axum::{
	extract::{Multipart, Path, Query, State},
	http::{
		header::{CONTENT_DISPOSITION, CONTENT_TYPE},
		HeaderMap, StatusCode,
	},
	response::IntoResponse,
	Json,
};

use super::{bearer, parse_id, read_record_form};
use crate::{api::AppState, error::Result};

#[utoipa::path(
    post,
    path = "/alumni",
    request_body(
        content_type = "multipart/form-data",
        description = "`json` part with the profile, optional `profile` part with a JPEG or PNG photo"
    ),
    responses(
        (status = 201, description = "Record created", body = FullView),
        (status = 400, description = "Invalid form or account already has a record", body = ApiErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
/// POST /alumni - Create the caller's record.
pub async fn create_record(
	State(state): State<AppState>,
	headers: HeaderMap,
	multipart: Multipart,
) -> Result<impl IntoResponse> {
	let token = bearer(&headers)?;
	let (profile, photo) = read_record_form(multipart).await?;
	let view = state.service.create_record(&token, profile, photo).await?;
	Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    patch,
    path = "/alumni/{id}",
    params(("id" = String, Path, description = "Alumni record ID")),
    request_body(
        content_type = "multipart/form-data",
        description = "`json` part with the replacement profile, optional `profile` part with a new photo"
    ),
    responses(
        (status = 200, description = "Record updated", body = FullView),
        (status = 403, description = "Caller neither owns the record nor is an administrator", body = ApiErrorResponse),
        (status = 404, description = "Record not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
pub async fn update_record(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
	multipart: Multipart,
) -> Result<Json<FullView>> {
	let token = bearer(&headers)?;
	let id: AlumniId = parse_id(&id, "alumni")?;
	let (profile, photo) = read_record_form(multipart).await?;
	Ok(Json(
		state.service.update_record(&token, id, profile, photo).await?,
	))
}

#[utoipa::path(
    patch,
    path = "/alumni/{id}/gopublic",
    params(("id" = String, Path, description = "Alumni record ID")),
    responses(
        (status = 200, description = "Record is now public", body = FullView),
        (status = 403, description = "Not allowed", body = ApiErrorResponse),
        (status = 404, description = "Record not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
pub async fn go_public(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<FullView>> {
	change_privacy(state, headers, id, true).await
}

#[utoipa::path(
    patch,
    path = "/alumni/{id}/goprivate",
    params(("id" = String, Path, description = "Alumni record ID")),
    responses(
        (status = 200, description = "Record is now private", body = FullView),
        (status = 403, description = "Not allowed", body = ApiErrorResponse),
        (status = 404, description = "Record not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
pub async fn go_private(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<FullView>> {
	change_privacy(state, headers, id, false).await
}

async fn change_privacy(
	state: AppState,
	headers: HeaderMap,
	id: String,
	is_public: bool,
) -> Result<Json<FullView>> {
	let token = bearer(&headers)?;
	let id: AlumniId = parse_id(&id, "alumni")?;
	Ok(Json(
		state.service.change_privacy(&token, id, is_public).await?,
	))
}

#[utoipa::path(
    get,
    path = "/alumni/{id}",
    params(("id" = String, Path, description = "Alumni record ID")),
    responses(
        (status = 200, description = "Full or redacted record", body = AlumniItem),
        (status = 403, description = "Record not visible to caller", body = ApiErrorResponse),
        (status = 404, description = "Record not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
pub async fn fetch_one(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<AlumniItem>> {
	let token = bearer(&headers)?;
	let id: AlumniId = parse_id(&id, "alumni")?;
	Ok(Json(state.service.fetch_one(&token, id).await?))
}

#[utoipa::path(
    get,
    path = "/alumni",
    params(ListAlumniQuery),
    responses(
        (status = 200, description = "One page of records", body = ListAlumniResponse),
        (status = 400, description = "Invalid limit", body = ApiErrorResponse),
        (status = 403, description = "Account not approved", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
/// GET /alumni - Paginated listing filtered by name.
pub async fn fetch_many(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<ListAlumniQuery>,
) -> Result<Json<ListAlumniResponse>> {
	let token = bearer(&headers)?;
	Ok(Json(state.service.fetch_many(&token, query).await?))
}

#[utoipa::path(
    get,
    path = "/csv/alumni",
    params(ListAlumniQuery),
    responses(
        (status = 200, description = "Every visible record as CSV", content_type = "text/csv"),
        (status = 403, description = "Account not approved", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
/// GET /csv/alumni - Export the caller's visible records.
pub async fn export_csv(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<ListAlumniQuery>,
) -> Result<impl IntoResponse> {
	let token = bearer(&headers)?;
	let export = state.service.export_csv(&token, query).await?;
	Ok((
		[
			(CONTENT_TYPE, "text/csv; charset=utf-8"),
			(CONTENT_DISPOSITION, "attachment; filename=\"alumni.csv\""),
		],
		export.body,
	))
}

#[utoipa::path(
    get,
    path = "/happybirthday",
    responses(
        (status = 200, description = "Records with a birthday today", body = Vec<FullView>),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "alumni"
)]
pub async fn happy_birthday(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<Vec<FullView>>> {
	let token = bearer(&headers)?;
	Ok(Json(state.service.happy_birthday(&token).await?))
}
