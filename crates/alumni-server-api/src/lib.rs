// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod accounts;
pub mod alumni;
pub mod auth;

pub use accounts::{AccountResponse, ListAccountsQuery, ListAccountsResponse};
pub use alumni::{AlumniItem, ListAlumniQuery, ListAlumniResponse};
pub use auth::{
	ApiErrorResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, SessionResponse,
	SetPasswordRequest, SuccessResponse,
};
