// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Async SMTP client.
//!
//! Passwords are held as [`SecretString`] and never appear in logs.

use alumni_common_secret::SecretString;
use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

/// Errors that can occur during SMTP operations.
#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	/// Failed to connect to the SMTP server.
	#[error("connection failed: {0}")]
	Connection(String),

	/// Authentication with the SMTP server failed.
	#[error("authentication failed: {0}")]
	Auth(String),

	/// Failed to send an email message.
	#[error("send failed: {0}")]
	Send(String),

	/// Invalid configuration (missing required fields, invalid values).
	#[error("invalid configuration: {0}")]
	Config(String),

	/// Invalid email address format.
	#[error("invalid email address: {0}")]
	Address(String),
}

/// Settings needed to reach an SMTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
	pub host: String,

	/// Common values: 25 (unencrypted), 465 (TLS), 587 (STARTTLS).
	pub port: u16,

	pub username: Option<String>,

	pub password: Option<SecretString>,

	/// Envelope sender, e.g. "alumni@example.org".
	pub from_address: String,

	pub from_name: String,

	/// Whether to use STARTTLS for the connection. Defaults to `true`.
	#[serde(default = "default_use_tls")]
	pub use_tls: bool,
}

fn default_use_tls() -> bool {
	true
}

/// Async SMTP client for sending emails.
///
/// The transport connects lazily and pools connections internally.
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// Validate the configuration and build the SMTP transport.
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Address`] if the from address is invalid.
	/// Returns [`SmtpError::Connection`] if the transport cannot be built.
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		if config.host.trim().is_empty() {
			return Err(SmtpError::Config("host must not be empty".into()));
		}

		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		match (config.username, config.password) {
			(Some(username), Some(password)) => {
				let credentials = Credentials::new(username, password.into_inner());
				builder = builder.credentials(credentials);
			}
			(Some(_), None) => {
				return Err(SmtpError::Auth("username given without a password".into()));
			}
			_ => {}
		}

		let transport = builder.build();

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport,
			from_mailbox,
		})
	}

	/// Open a connection to the server without sending anything.
	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		tracing::debug!("SMTP server is healthy");
		Ok(())
	}

	/// Send a multipart (plain text + HTML) e-mail.
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Address`] if the recipient address is invalid.
	/// Returns [`SmtpError::Send`] if the email fails to send.
	#[tracing::instrument(name = "smtp_send_email", skip(self, body_html, body_text), fields(to = %to, subject = %subject))]
	pub async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		let to_mailbox: Mailbox = to
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let message = Message::builder()
			.from(self.from_mailbox.clone())
			.to(to_mailbox)
			.subject(subject)
			.multipart(
				MultiPart::alternative()
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_PLAIN)
							.body(body_text.to_string()),
					)
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_HTML)
							.body(body_html.to_string()),
					),
			)
			.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))?;

		self
			.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("email sent successfully");

		Ok(())
	}
}

/// Whether `email` parses as a mailbox. Says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(password: &str) -> SmtpConfig {
		SmtpConfig {
			host: "smtp.example.com".to_string(),
			port: 587,
			username: Some("user".to_string()),
			password: Some(SecretString::new(password.to_string())),
			from_address: "alumni@example.org".to_string(),
			from_name: "Alumni Directory".to_string(),
			use_tls: true,
		}
	}

	mod email_validation {
		use super::*;

		#[test]
		fn valid_simple_email() {
			assert!(is_valid_email("user@example.com"));
		}

		#[test]
		fn valid_email_with_name() {
			assert!(is_valid_email("User Name <user@example.com>"));
		}

		#[test]
		fn valid_email_with_plus() {
			assert!(is_valid_email("user+tag@example.com"));
		}

		#[test]
		fn invalid_empty_string() {
			assert!(!is_valid_email(""));
		}

		#[test]
		fn invalid_no_at_symbol() {
			assert!(!is_valid_email("userexample.com"));
		}

		#[test]
		fn invalid_no_domain() {
			assert!(!is_valid_email("user@"));
		}

		#[test]
		fn invalid_multiple_at_symbols() {
			assert!(!is_valid_email("user@@example.com"));
		}
	}

	mod client_config {
		use super::*;

		#[test]
		fn config_debug_does_not_leak_password() {
			let debug = format!("{:?}", config("super-secret-password"));
			assert!(!debug.contains("super-secret-password"));
			assert!(debug.contains("[REDACTED]"));
		}

		#[test]
		fn default_use_tls_is_true() {
			assert!(default_use_tls());
		}

		#[tokio::test]
		async fn empty_host_is_rejected() {
			let mut c = config("pw");
			c.host = "  ".to_string();
			assert!(matches!(SmtpClient::new(c), Err(SmtpError::Config(_))));
		}

		#[tokio::test]
		async fn invalid_from_address_is_rejected() {
			let mut c = config("pw");
			c.from_address = "not an address".to_string();
			assert!(matches!(SmtpClient::new(c), Err(SmtpError::Address(_))));
		}

		#[tokio::test]
		async fn username_without_password_is_rejected() {
			let mut c = config("pw");
			c.password = None;
			c.use_tls = false;
			assert!(matches!(SmtpClient::new(c), Err(SmtpError::Auth(_))));
		}
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn valid_emails_are_accepted(
				local in "[a-zA-Z][a-zA-Z0-9]{0,30}",
				domain in "[a-zA-Z][a-zA-Z0-9]{0,20}",
				tld in "(com|org|net|io|dev)"
			) {
				let email = format!("{local}@{domain}.{tld}");
				prop_assert!(is_valid_email(&email), "Expected valid: {}", email);
			}

			#[test]
			fn password_never_in_config_debug(password in "[a-zA-Z0-9!@#$%^&*]{8,32}") {
				prop_assume!(!password.contains("REDACTED"));
				let debug = format!("{:?}", config(&password));
				prop_assert!(!debug.contains(&password), "Password leaked in debug output");
			}
		}
	}
}
