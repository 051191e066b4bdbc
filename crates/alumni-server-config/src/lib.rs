// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the alumni directory server.
//!
//! Values are layered from built-in defaults, an optional TOML file and
//! `ALUMNI_SERVER_*` environment variables, in increasing precedence.
//!
//! ```ignore
//! use alumni_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use alumni_common_config::SecretString;
use tracing::{debug, info, warn};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub storage: StorageConfig,
	/// None when no SMTP host is configured; e-mail is then only logged.
	pub smtp: Option<SmtpConfig>,
	pub notifications: NotificationsConfig,
	pub jobs: JobsConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}

	/// Key used to sign photo URLs.
	pub fn url_signing_secret(&self) -> SecretString {
		self.storage
			.url_signing_secret
			.clone()
			.unwrap_or_else(|| self.auth.token_secret.clone())
	}

	/// Origin used in presigned photo URLs.
	pub fn storage_base_url(&self) -> String {
		self.storage
			.public_base_url
			.clone()
			.unwrap_or_else(|| self.http.base_url.clone())
	}
}

/// Precedence (highest to lowest):
/// 1. Environment variables (`ALUMNI_SERVER_*`)
/// 2. Config file (`/etc/alumni/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let storage = layer.storage.unwrap_or_default().finalize();
	let smtp = layer.smtp.and_then(|l| l.finalize());
	let notifications = layer
		.notifications
		.unwrap_or_default()
		.finalize(&http.base_url);
	let jobs = layer.jobs.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth, &storage)?;

	if auth.ephemeral_secret {
		warn!(
			environment = %auth.environment,
			"no token secret configured; generated a random one, sessions will not survive a restart"
		);
	}

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		environment = %auth.environment,
		storage_dir = %storage.bucket_dir().display(),
		smtp_configured = smtp.is_some(),
		admin_notifications = notifications.admin_address.is_some(),
		birthday_emails = jobs.birthday_emails_enabled,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		storage,
		smtp,
		notifications,
		jobs,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig, storage: &StorageConfig) -> Result<(), ConfigError> {
	if auth.is_production() && auth.ephemeral_secret {
		return Err(ConfigError::Validation(
			"ALUMNI_SERVER_ENV=production requires ALUMNI_SERVER_TOKEN_SECRET to be set".to_string(),
		));
	}

	if auth.token_ttl_hours == 0 {
		return Err(ConfigError::Validation(
			"token TTL must be at least one hour".to_string(),
		));
	}

	if storage.presign_ttl_secs == 0 {
		return Err(ConfigError::Validation(
			"presigned URL TTL must be greater than zero".to_string(),
		));
	}

	if storage.bucket.trim().is_empty() || storage.bucket.contains(['/', '\\']) {
		return Err(ConfigError::Validation(format!(
			"storage bucket '{}' must be a single path segment",
			storage.bucket
		)));
	}

	Ok(())
}
