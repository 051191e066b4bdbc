// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account, session and password reset handlers.

use alumni_directory_core::AccountId;
use alumni_server_api::{
	AccountResponse, ApiErrorResponse, ForgotPasswordRequest, ListAccountsQuery,
	ListAccountsResponse, LoginRequest, RegisterRequest, SessionResponse, SetPasswordRequest,
	SuccessResponse,
};
use axum::{
	extract::{Path, Query, State},
	http::{HeaderMap, StatusCode},
	response::IntoResponse,
	Json,
};

use super::{bearer, parse_id};
use crate::{api::AppState, error::Result};

#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionResponse),
        (status = 400, description = "Invalid e-mail or password", body = ApiErrorResponse),
        (status = 409, description = "E-mail already registered", body = ApiErrorResponse)
    ),
    tag = "users"
)]
/// POST /users - Register a new, pending account.
pub async fn register(
	State(state): State<AppState>,
	Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
	let session = state.service.register(&body.email, &body.password).await?;
	Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "E-mail or password is incorrect", body = ApiErrorResponse)
    ),
    tag = "users"
)]
/// POST /login
pub async fn login(
	State(state): State<AppState>,
	Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
	Ok(Json(state.service.login(&body.email, &body.password).await?))
}

#[utoipa::path(
    get,
    path = "/autologin",
    responses(
        (status = 200, description = "Session refreshed", body = SessionResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
/// GET /autologin - Exchange a valid token for a fresh one.
pub async fn autologin(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<SessionResponse>> {
	let token = bearer(&headers)?;
	Ok(Json(state.service.refresh_session(&token).await?))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/approve",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account approved", body = AccountResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse),
        (status = 404, description = "Account not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn approve(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<AccountResponse>> {
	let token = bearer(&headers)?;
	let id: AccountId = parse_id(&id, "account")?;
	Ok(Json(state.service.approve(&token, id).await?))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/deny",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account denied", body = AccountResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse),
        (status = 404, description = "Account not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn deny(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<String>,
) -> Result<Json<AccountResponse>> {
	let token = bearer(&headers)?;
	let id: AccountId = parse_id(&id, "account")?;
	Ok(Json(state.service.deny(&token, id).await?))
}

#[utoipa::path(
    get,
    path = "/users",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Accounts", body = ListAccountsResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
/// GET /users - Accounts, optionally filtered by approval state.
pub async fn list_accounts(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<ListAccountsQuery>,
) -> Result<Json<ListAccountsResponse>> {
	let token = bearer(&headers)?;
	let accounts = state.service.list_accounts(&token, query.approval).await?;
	Ok(Json(ListAccountsResponse { accounts }))
}

#[utoipa::path(
    post,
    path = "/forgotpassword",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset e-mail sent if the account exists", body = SuccessResponse)
    ),
    tag = "users"
)]
pub async fn forgot_password(
	State(state): State<AppState>,
	Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<SuccessResponse>> {
	state.service.forgot_password(&body.email).await?;
	Ok(Json(SuccessResponse {
		message: "if the account exists, a reset link has been sent".to_string(),
	}))
}

#[utoipa::path(
    post,
    path = "/setpassword",
    request_body = SetPasswordRequest,
    responses(
        (status = 200, description = "Password changed and signed in", body = SessionResponse),
        (status = 401, description = "Reset token invalid or expired", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn set_password(
	State(state): State<AppState>,
	Json(body): Json<SetPasswordRequest>,
) -> Result<Json<SessionResponse>> {
	Ok(Json(
		state
			.service
			.set_password(&body.token, &body.email, &body.password)
			.await?,
	))
}
