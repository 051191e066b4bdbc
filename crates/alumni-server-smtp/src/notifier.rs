// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{SmtpClient, SmtpError};
use crate::template::html_to_text;

/// A rendered e-mail ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
	pub recipient: String,
	pub subject: String,
	pub html: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
	async fn send(&self, email: &OutgoingEmail) -> Result<(), SmtpError>;
}

/// Sends through an SMTP server, deriving the plain-text part from the HTML.
pub struct SmtpNotifier {
	client: Arc<SmtpClient>,
}

impl SmtpNotifier {
	pub fn new(client: Arc<SmtpClient>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Notifier for SmtpNotifier {
	async fn send(&self, email: &OutgoingEmail) -> Result<(), SmtpError> {
		let text = html_to_text(&email.html);
		self
			.client
			.send_email(&email.recipient, &email.subject, &email.html, &text)
			.await
	}
}

/// Logs e-mails instead of sending them. Bodies are not logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
	async fn send(&self, email: &OutgoingEmail) -> Result<(), SmtpError> {
		tracing::info!(
			to = %email.recipient,
			subject = %email.subject,
			"SMTP not configured; e-mail not sent"
		);
		Ok(())
	}
}
