// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for alumni-server, served at `/api/openapi.json`.

use utoipa::{
	openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
	Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alumni Directory API",
        version = "1.0.0",
        description = "Accounts, approval and alumni records for the school alumni directory.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "users", description = "Registration, sign-in, approval and password reset"),
        (name = "alumni", description = "Alumni records, listings, export and birthdays"),
        (name = "files", description = "Presigned profile photo downloads"),
        (name = "health", description = "Liveness")
    ),
    paths(
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::autologin,
        crate::routes::users::approve,
        crate::routes::users::deny,
        crate::routes::users::list_accounts,
        crate::routes::users::forgot_password,
        crate::routes::users::set_password,
        crate::routes::alumni::create_record,
        crate::routes::alumni::update_record,
        crate::routes::alumni::go_public,
        crate::routes::alumni::go_private,
        crate::routes::alumni::fetch_one,
        crate::routes::alumni::fetch_many,
        crate::routes::alumni::export_csv,
        crate::routes::alumni::happy_birthday,
        crate::routes::files::download,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            alumni_server_api::RegisterRequest,
            alumni_server_api::LoginRequest,
            alumni_server_api::ForgotPasswordRequest,
            alumni_server_api::SetPasswordRequest,
            alumni_server_api::SessionResponse,
            alumni_server_api::SuccessResponse,
            alumni_server_api::ApiErrorResponse,
            alumni_server_api::AccountResponse,
            alumni_server_api::ListAccountsResponse,
            alumni_server_api::AlumniItem,
            alumni_server_api::ListAlumniResponse,
            alumni_directory_core::AlumniProfile,
            alumni_directory_core::FullView,
            alumni_directory_core::RedactedView,
            alumni_directory_core::PageInfo,
            alumni_directory_core::ApprovalState,
            crate::routes::health::HealthResponse,
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		if let Some(components) = openapi.components.as_mut() {
			components.add_security_scheme(
				"bearer",
				SecurityScheme::Http(
					HttpBuilder::new()
						.scheme(HttpAuthScheme::Bearer)
						.bearer_format("JWT")
						.build(),
				),
			);
		}
	}
}
