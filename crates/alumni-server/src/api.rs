// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router wiring.

use std::sync::Arc;

use alumni_server_auth::{Argon2Hasher, Clock, SessionResolver, SystemClock, TokenCodec};
use alumni_server_config::ServerConfig;
use alumni_server_db::{
	AccountRepository, AlumniRepository, EmailTemplateRepository, PasswordResetRepository,
	SqlitePool,
};
use alumni_server_jobs::JobScheduler;
use alumni_server_smtp::{LoggingNotifier, Notifier, SmtpClient, SmtpError, SmtpNotifier};
use alumni_server_storage::{FilesystemObjectStore, UrlSigner};
use axum::{
	extract::DefaultBodyLimit,
	http::{
		header::{AUTHORIZATION, CONTENT_TYPE},
		Method,
	},
	routing::{get, patch, post},
	Json, Router,
};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::routes;
use crate::service::{AlumniService, ServiceDeps, ServiceSettings};

/// Upper bound on request bodies; photos are the largest payload.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AlumniService>,
	pub pool: SqlitePool,
	pub scheduler: Option<Arc<JobScheduler>>,
}

/// SMTP delivery when configured, otherwise e-mails are only logged.
pub fn build_notifier(config: &ServerConfig) -> Result<Arc<dyn Notifier>, SmtpError> {
	match &config.smtp {
		Some(smtp) => {
			let client = SmtpClient::new(alumni_server_smtp::SmtpConfig {
				host: smtp.host.clone(),
				port: smtp.port,
				username: smtp.username.clone(),
				password: smtp.password.clone(),
				from_address: smtp.from_address.clone(),
				from_name: smtp.from_name.clone(),
				use_tls: smtp.use_tls,
			})?;
			tracing::info!(host = %smtp.host, port = smtp.port, "SMTP notifier configured");
			Ok(Arc::new(SmtpNotifier::new(Arc::new(client))))
		}
		None => {
			tracing::info!("SMTP not configured; e-mails will be logged");
			Ok(Arc::new(LoggingNotifier))
		}
	}
}

/// Wire repositories, object store and token codec into the workflow service.
pub fn build_service(
	pool: SqlitePool,
	config: &ServerConfig,
	notifier: Arc<dyn Notifier>,
	clock: Arc<dyn Clock>,
) -> AlumniService {
	let accounts = Arc::new(AccountRepository::new(pool.clone()));
	let codec = Arc::new(
		TokenCodec::new(&config.auth.token_secret).with_ttl(chrono::Duration::hours(
			i64::try_from(config.auth.token_ttl_hours).unwrap_or(i64::MAX / 3600),
		)),
	);
	let signer = UrlSigner::new(
		config.url_signing_secret(),
		config.storage_base_url(),
		config.storage.presign_ttl_secs,
	);

	AlumniService::new(ServiceDeps {
		accounts: accounts.clone(),
		alumni: Arc::new(AlumniRepository::new(pool.clone())),
		resets: Arc::new(PasswordResetRepository::new(pool.clone())),
		templates: Arc::new(EmailTemplateRepository::new(pool)),
		objects: Arc::new(FilesystemObjectStore::new(
			config.storage.bucket_dir(),
			signer,
		)),
		notifier,
		hasher: Arc::new(Argon2Hasher),
		sessions: SessionResolver::new(codec, accounts),
		clock,
		settings: ServiceSettings {
			base_url: config.http.base_url.clone(),
			admin_address: config.notifications.admin_address.clone(),
			reset_url: config.notifications.reset_url.clone(),
		},
	})
}

pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, SmtpError> {
	let notifier = build_notifier(config)?;
	let service = build_service(pool.clone(), config, notifier, Arc::new(SystemClock));
	Ok(AppState {
		service: Arc::new(service),
		pool,
		scheduler: None,
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		// Accounts and sessions
		.route(
			"/users",
			post(routes::users::register).get(routes::users::list_accounts),
		)
		.route("/login", post(routes::users::login))
		.route("/autologin", get(routes::users::autologin))
		.route("/users/{id}/approve", patch(routes::users::approve))
		.route("/users/{id}/deny", patch(routes::users::deny))
		.route("/forgotpassword", post(routes::users::forgot_password))
		.route("/setpassword", post(routes::users::set_password))
		// Records
		.route(
			"/alumni",
			post(routes::alumni::create_record).get(routes::alumni::fetch_many),
		)
		.route(
			"/alumni/{id}",
			get(routes::alumni::fetch_one).patch(routes::alumni::update_record),
		)
		.route("/alumni/{id}/gopublic", patch(routes::alumni::go_public))
		.route("/alumni/{id}/goprivate", patch(routes::alumni::go_private))
		.route("/csv/alumni", get(routes::alumni::export_csv))
		.route("/happybirthday", get(routes::alumni::happy_birthday))
		.route("/files/{*key}", get(routes::files::download))
		.route(
			"/api/openapi.json",
			get(|| async { Json(crate::api_docs::ApiDoc::openapi()) }),
		)
		.with_state(state)
		.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
				.allow_headers([AUTHORIZATION, CONTENT_TYPE]),
		)
}
