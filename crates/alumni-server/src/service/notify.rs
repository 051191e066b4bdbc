// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::{Account, AlumniProfile};
use alumni_server_smtp::{builtin_template, render_template, OutgoingEmail, TemplateVars};

use super::AlumniService;
use crate::error::{Result, ServiceError};

impl AlumniService {
	/// Render template `name` (stored override first, then built-in) and send it.
	#[tracing::instrument(skip(self, recipient, vars), fields(template = name))]
	pub(crate) async fn send_template(
		&self,
		name: &'static str,
		recipient: &str,
		vars: TemplateVars,
	) -> Result<()> {
		let (subject, html) = self.load_template(name).await?;
		let email = OutgoingEmail {
			recipient: recipient.to_string(),
			subject: render_template(&subject, &vars),
			html: render_template(&html, &vars),
		};

		self
			.notifier
			.send(&email)
			.await
			.map_err(|e| ServiceError::upstream("notifier", name, e))?;
		tracing::debug!("notification sent");
		Ok(())
	}

	/// Send to the configured admin address, if any.
	pub(crate) async fn notify_admin(&self, name: &'static str, vars: TemplateVars) -> Result<()> {
		let Some(admin) = self.settings.admin_address.clone() else {
			tracing::debug!(template = name, "no admin address configured; notice skipped");
			return Ok(());
		};
		self.send_template(name, &admin, vars).await.inspect_err(|e| {
			tracing::warn!(template = name, error = %e, "admin notification failed");
		})
	}

	async fn load_template(&self, name: &'static str) -> Result<(String, String)> {
		match self.templates.get_template(name).await {
			Ok(Some(stored)) => return Ok((stored.subject, stored.html)),
			Ok(None) => {}
			Err(e) => {
				tracing::warn!(template = name, error = %e, "template lookup failed; using built-in");
			}
		}

		builtin_template(name)
			.map(|t| (t.subject.to_string(), t.html.to_string()))
			.ok_or_else(|| ServiceError::upstream("templates", "load", format!("unknown template {name}")))
	}

	pub(crate) fn base_vars(&self) -> TemplateVars {
		TemplateVars::new().with("base_url", self.settings.base_url.clone())
	}

	pub(crate) fn account_vars(&self, account: &Account) -> TemplateVars {
		self.base_vars().with("email", account.email.clone())
	}

	pub(crate) fn profile_vars(&self, profile: &AlumniProfile, email: &str) -> TemplateVars {
		self
			.base_vars()
			.with("firstname", profile.firstname.clone())
			.with("lastname", profile.lastname.clone())
			.with("email", email)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::service::testing::{Harness, ADMIN_ADDRESS};
	use alumni_server_auth::Clock;
	use alumni_server_db::EmailTemplate;
	use alumni_server_smtp::NEW_ALUMNI;

	#[tokio::test]
	async fn builtin_template_is_used_when_none_stored() {
		let h = Harness::new().await;
		let profile = crate::service::testing::profile("Ada", "Lovelace");
		let vars = h.service.profile_vars(&profile, "ada@example.org");

		h.service
			.send_template(NEW_ALUMNI, "someone@example.org", vars)
			.await
			.unwrap();

		let sent = h.notifier.sent().await;
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].subject, "New alumni record: Ada Lovelace");
		assert!(sent[0].html.contains("ada@example.org"));
	}

	#[tokio::test]
	async fn stored_template_overrides_builtin() {
		let h = Harness::new().await;
		h.templates
			.upsert_template(
				&EmailTemplate {
					name: NEW_ALUMNI.to_string(),
					subject: "Welcome {{firstname}}".to_string(),
					html: "<p>{{lastname}} joined</p>".to_string(),
				},
				h.clock.now(),
			)
			.await
			.unwrap();

		let profile = crate::service::testing::profile("Ada", "Lovelace");
		h.service
			.notify_admin(NEW_ALUMNI, h.service.profile_vars(&profile, "ada@example.org"))
			.await
			.unwrap();

		let sent = h.notifier.sent().await;
		assert_eq!(sent[0].recipient, ADMIN_ADDRESS);
		assert_eq!(sent[0].subject, "Welcome Ada");
		assert_eq!(sent[0].html, "<p>Lovelace joined</p>");
	}

	#[tokio::test]
	async fn unknown_template_is_an_upstream_error() {
		let h = Harness::new().await;
		let err = h
			.service
			.send_template("no_such_template", "a@example.org", TemplateVars::new())
			.await
			.unwrap_err();
		assert!(matches!(err, ServiceError::Upstream { .. }));
	}
}
