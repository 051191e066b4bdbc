// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound e-mail for the alumni directory.
//!
//! [`Notifier`] is what the workflows depend on. [`SmtpNotifier`] sends through
//! [`SmtpClient`] (lettre, STARTTLS, optional auth); [`LoggingNotifier`] is
//! used when no SMTP server is configured. Message bodies come from named
//! templates with `{{placeholder}}` substitution, see [`template`].

pub mod client;
pub mod notifier;
pub mod template;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{is_valid_email, SmtpClient, SmtpConfig, SmtpError};
pub use notifier::{LoggingNotifier, Notifier, OutgoingEmail, SmtpNotifier};
pub use template::{
	builtin_template, html_to_text, render_template, BuiltinTemplate, TemplateVars,
	ACCOUNT_APPROVED, ALUMNI_UPDATED, FORGOT_PASSWORD, HAPPY_BIRTHDAY, NEW_ALUMNI,
};
