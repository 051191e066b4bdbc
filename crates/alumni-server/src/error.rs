// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workflow error taxonomy and its HTTP mapping.

use alumni_server_api::ApiErrorResponse;
use alumni_server_auth::AuthError;
use alumni_server_db::DbError;
use alumni_server_storage::StorageError;
use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("invalid token")]
	InvalidToken,

	#[error("token expired")]
	ExpiredToken,

	#[error("account not found")]
	AccountNotFound,

	#[error("alumni record not found")]
	RecordNotFound,

	#[error("file not found")]
	ObjectNotFound,

	#[error("not authorized")]
	AuthorizationDenied,

	#[error("an account with this e-mail already exists")]
	DuplicateAccount,

	#[error("e-mail or password is incorrect")]
	CredentialMismatch,

	#[error("{0}")]
	InvalidRequest(String),

	/// A collaborator (store, hasher, mailer) failed.
	#[error("{collaborator} failed during {operation}: {message}")]
	Upstream {
		collaborator: &'static str,
		operation: &'static str,
		message: String,
	},
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
	pub fn invalid_request(message: impl Into<String>) -> Self {
		ServiceError::InvalidRequest(message.into())
	}

	pub fn upstream(
		collaborator: &'static str,
		operation: &'static str,
		message: impl ToString,
	) -> Self {
		ServiceError::Upstream {
			collaborator,
			operation,
			message: message.to_string(),
		}
	}

	/// Adapter for `map_err` on store calls.
	pub fn db(operation: &'static str) -> impl FnOnce(DbError) -> ServiceError {
		move |e| ServiceError::upstream("database", operation, e)
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ServiceError::InvalidToken
			| ServiceError::ExpiredToken
			| ServiceError::CredentialMismatch => StatusCode::UNAUTHORIZED,
			ServiceError::AuthorizationDenied => StatusCode::FORBIDDEN,
			ServiceError::AccountNotFound
			| ServiceError::RecordNotFound
			| ServiceError::ObjectNotFound => StatusCode::NOT_FOUND,
			ServiceError::DuplicateAccount => StatusCode::CONFLICT,
			ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
			ServiceError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			ServiceError::InvalidToken => "invalid_token",
			ServiceError::ExpiredToken => "expired_token",
			ServiceError::AccountNotFound => "account_not_found",
			ServiceError::RecordNotFound => "record_not_found",
			ServiceError::ObjectNotFound => "file_not_found",
			ServiceError::AuthorizationDenied => "forbidden",
			ServiceError::DuplicateAccount => "duplicate_account",
			ServiceError::CredentialMismatch => "credential_mismatch",
			ServiceError::InvalidRequest(_) => "invalid_request",
			ServiceError::Upstream { .. } => "internal_error",
		}
	}
}

impl From<AuthError> for ServiceError {
	fn from(e: AuthError) -> Self {
		match e {
			AuthError::InvalidToken => ServiceError::InvalidToken,
			AuthError::ExpiredToken => ServiceError::ExpiredToken,
			AuthError::AccountNotFound(_) => ServiceError::AccountNotFound,
			AuthError::Signing(message) => ServiceError::upstream("token codec", "issue", message),
			AuthError::Hashing(message) => {
				ServiceError::upstream("credential hasher", "hash", message)
			}
			AuthError::Lookup(message) => {
				ServiceError::upstream("database", "account lookup", message)
			}
		}
	}
}

impl From<StorageError> for ServiceError {
	fn from(e: StorageError) -> Self {
		match e {
			StorageError::InvalidKey(_) => ServiceError::invalid_request("invalid file key"),
			StorageError::NotFound(_) => ServiceError::ObjectNotFound,
			StorageError::InvalidSignature | StorageError::Expired => {
				ServiceError::AuthorizationDenied
			}
			other => ServiceError::upstream("object store", "access", other),
		}
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = self.status();
		let message = match &self {
			ServiceError::Upstream {
				collaborator,
				operation,
				message,
			} => {
				tracing::error!(
					collaborator = *collaborator,
					operation = *operation,
					error = %message,
					"request failed in collaborator"
				);
				"internal server error".to_string()
			}
			other => other.to_string(),
		};

		(
			status,
			Json(ApiErrorResponse {
				error: self.code().to_string(),
				message,
			}),
		)
			.into_response()
	}
}
