// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use alumni_common_config::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, JobsConfigLayer, LogFormat,
	LoggingConfigLayer, NotificationsConfigLayer, SmtpConfigLayer, StorageConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/alumni/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: ALUMNI_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()),
			auth: Some(load_auth_from_env()?),
			storage: Some(load_storage_from_env()?),
			smtp: Some(load_smtp_from_env()?),
			notifications: Some(load_notifications_from_env()),
			jobs: Some(load_jobs_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u16 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn secret_env(
	name: &str,
) -> Result<Option<alumni_common_config::SecretString>, ConfigError> {
	load_secret_env(name).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("ALUMNI_SERVER_HOST"),
		port: env_u16("ALUMNI_SERVER_PORT")?,
		base_url: env_var("ALUMNI_SERVER_BASE_URL"),
	})
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("ALUMNI_SERVER_DATABASE_URL"),
	}
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		token_secret: secret_env("ALUMNI_SERVER_TOKEN_SECRET")?,
		token_ttl_hours: env_u64("ALUMNI_SERVER_TOKEN_TTL_HOURS")?,
		environment: env_var("ALUMNI_SERVER_ENV"),
	})
}

fn load_storage_from_env() -> Result<StorageConfigLayer, ConfigError> {
	Ok(StorageConfigLayer {
		data_dir: env_var("ALUMNI_SERVER_DATA_DIR"),
		bucket: env_var("ALUMNI_SERVER_STORAGE_BUCKET"),
		url_signing_secret: secret_env("ALUMNI_SERVER_STORAGE_SIGNING_SECRET")?,
		presign_ttl_secs: env_u64("ALUMNI_SERVER_STORAGE_PRESIGN_TTL_SECS")?,
		public_base_url: env_var("ALUMNI_SERVER_STORAGE_PUBLIC_BASE_URL"),
	})
}

fn load_smtp_from_env() -> Result<SmtpConfigLayer, ConfigError> {
	Ok(SmtpConfigLayer {
		host: env_var("ALUMNI_SERVER_SMTP_HOST"),
		port: env_u16("ALUMNI_SERVER_SMTP_PORT")?,
		username: env_var("ALUMNI_SERVER_SMTP_USERNAME"),
		password: secret_env("ALUMNI_SERVER_SMTP_PASSWORD")?,
		from_address: env_var("ALUMNI_SERVER_SMTP_FROM_ADDRESS"),
		from_name: env_var("ALUMNI_SERVER_SMTP_FROM_NAME"),
		use_tls: env_bool("ALUMNI_SERVER_SMTP_USE_TLS"),
	})
}

fn load_notifications_from_env() -> NotificationsConfigLayer {
	NotificationsConfigLayer {
		admin_address: env_var("ALUMNI_SERVER_ADMIN_EMAIL"),
		reset_url: env_var("ALUMNI_SERVER_RESET_URL"),
	}
}

fn load_jobs_from_env() -> Result<JobsConfigLayer, ConfigError> {
	Ok(JobsConfigLayer {
		birthday_emails_enabled: env_bool("ALUMNI_SERVER_BIRTHDAY_EMAILS_ENABLED"),
		birthday_interval_secs: env_u64("ALUMNI_SERVER_BIRTHDAY_INTERVAL_SECS")?,
		reset_cleanup_interval_secs: env_u64("ALUMNI_SERVER_RESET_CLEANUP_INTERVAL_SECS")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("ALUMNI_SERVER_LOG_FORMAT") {
		Some(v) => Some(LogFormat::parse(&v).ok_or_else(|| ConfigError::InvalidValue {
			key: "ALUMNI_SERVER_LOG_FORMAT".to_string(),
			message: format!("expected 'text' or 'json', got '{v}'"),
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("ALUMNI_SERVER_LOG_LEVEL"),
		format,
	})
}
