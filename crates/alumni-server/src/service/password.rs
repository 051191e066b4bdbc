// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password reset by e-mailed link.

use alumni_directory_core::{account::normalize_email, PasswordResetId};
use alumni_server_api::SessionResponse;
use alumni_server_auth::{generate_reset_token, hash_reset_token, reset_token_ttl};
use alumni_server_db::PasswordReset;
use alumni_server_smtp::FORGOT_PASSWORD;
use tracing::instrument;

use super::accounts::session;
use super::{require_password, AlumniService};
use crate::error::{Result, ServiceError};

impl AlumniService {
	/// Start a reset. Succeeds whether or not the e-mail belongs to an account.
	#[instrument(skip_all)]
	pub async fn forgot_password(&self, email: &str) -> Result<()> {
		let email = normalize_email(email);
		let Some(account) = self
			.accounts
			.get_account_by_email(&email)
			.await
			.map_err(ServiceError::db("find account by email"))?
		else {
			tracing::debug!("password reset requested for unknown e-mail");
			return Ok(());
		};

		let now = self.now();
		let token = generate_reset_token();
		let reset = PasswordReset {
			id: PasswordResetId::generate(),
			email: account.email.clone(),
			token_hash: hash_reset_token(&token),
			created_at: now,
			expires_at: now + reset_token_ttl(),
		};
		self
			.resets
			.create_reset(&reset)
			.await
			.map_err(ServiceError::db("create password reset"))?;

		// Failures past this point are logged only, so unknown and known
		// addresses get the same answer.
		let sent = match self.reset_link(&token, &account.email) {
			Ok(link) => {
				let vars = self.account_vars(&account).with("reset_link", link);
				self.send_template(FORGOT_PASSWORD, &account.email, vars).await
			}
			Err(e) => Err(e),
		};
		if let Err(e) = sent {
			tracing::warn!(account_id = %account.id, error = %e, "password reset e-mail failed");
		}

		tracing::info!(account_id = %account.id, reset_id = %reset.id, "password reset issued");
		Ok(())
	}

	/// Complete a reset and sign the account in.
	#[instrument(skip_all)]
	pub async fn set_password(
		&self,
		token: &str,
		email: &str,
		password: &str,
	) -> Result<SessionResponse> {
		require_password(password)?;
		let email = normalize_email(email);
		let now = self.now();

		let reset = self
			.resets
			.find_valid_reset(&hash_reset_token(token), now)
			.await
			.map_err(ServiceError::db("find password reset"))?
			.filter(|reset| reset.email == email)
			.ok_or(ServiceError::InvalidToken)?;

		let mut account = self
			.accounts
			.get_account_by_email(&reset.email)
			.await
			.map_err(ServiceError::db("find account by email"))?
			.ok_or(ServiceError::InvalidToken)?;

		let hash = self.hasher.hash(password)?;
		let updated = self
			.accounts
			.update_credential(&account.id, &hash, now)
			.await
			.map_err(ServiceError::db("update credential"))?;
		if !updated {
			return Err(ServiceError::AccountNotFound);
		}
		account.credential_hash = hash;
		account.updated_at = now;

		self
			.resets
			.delete_resets_for_email(&reset.email)
			.await
			.map_err(ServiceError::db("delete password resets"))?;

		tracing::info!(account_id = %account.id, "password reset completed");
		let token = self.issue_token(&account, now)?;
		Ok(session(&account, token))
	}

	fn reset_link(&self, token: &str, email: &str) -> Result<String> {
		url::Url::parse_with_params(
			&self.settings.reset_url,
			&[("token", token), ("email", email)],
		)
		.map(String::from)
		.map_err(|e| ServiceError::upstream("configuration", "build reset link", e))
	}

	/// Drop reset entries past their expiry.
	pub async fn delete_expired_resets(&self) -> Result<u64> {
		self
			.resets
			.delete_expired_resets(self.now())
			.await
			.map_err(ServiceError::db("delete expired resets"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::service::testing::{Harness, PASSWORD};
	use crate::service::ServiceSettings;
	use alumni_directory_core::ApprovalState;
	use alumni_server_auth::Clock;
	use chrono::Duration;

	/// Pull the plaintext token out of the last reset e-mail.
	async fn mailed_token(h: &Harness) -> String {
		let sent = h.notifier.sent().await;
		let html = &sent.last().unwrap().html;
		let start = html.find("href=\"").unwrap() + "href=\"".len();
		let end = start + html[start..].find('"').unwrap();
		let link = url::Url::parse(&html[start..end]).unwrap();
		link.query_pairs()
			.find(|(k, _)| k == "token")
			.map(|(_, v)| v.into_owned())
			.unwrap()
	}

	#[tokio::test]
	async fn unknown_email_succeeds_silently() {
		let h = Harness::new().await;
		h.service.forgot_password("ghost@example.org").await.unwrap();
		assert!(h.notifier.sent().await.is_empty());
	}

	#[tokio::test]
	async fn reset_link_points_at_configured_page() {
		let h = Harness::new().await;
		h.account("ada@example.org", ApprovalState::Approved, false)
			.await;
		h.service.forgot_password("ADA@example.org").await.unwrap();

		let sent = h.notifier.sent().await;
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].recipient, "ada@example.org");
		assert!(sent[0]
			.html
			.contains("http://alumni.test/setpassword?token="));
		assert!(sent[0].html.contains("email=ada%40example.org"));
	}

	#[tokio::test]
	async fn set_password_replaces_credential_and_consumes_reset() {
		let h = Harness::new().await;
		let (account, _) = h
			.account("ada@example.org", ApprovalState::Approved, false)
			.await;
		h.service.forgot_password("ada@example.org").await.unwrap();
		let token = mailed_token(&h).await;

		let session = h
			.service
			.set_password(&token, "ada@example.org", "new password")
			.await
			.unwrap();
		assert_eq!(session.account.id, account.id);

		assert!(h.service.login("ada@example.org", "new password").await.is_ok());
		assert!(matches!(
			h.service.login("ada@example.org", PASSWORD).await,
			Err(ServiceError::CredentialMismatch)
		));
		assert!(matches!(
			h.service
				.set_password(&token, "ada@example.org", "again")
				.await,
			Err(ServiceError::InvalidToken)
		));
	}

	#[tokio::test]
	async fn mismatched_email_is_rejected() {
		let h = Harness::new().await;
		h.account("ada@example.org", ApprovalState::Approved, false)
			.await;
		h.account("eve@example.org", ApprovalState::Approved, false)
			.await;
		h.service.forgot_password("ada@example.org").await.unwrap();
		let token = mailed_token(&h).await;

		assert!(matches!(
			h.service
				.set_password(&token, "eve@example.org", "hijack")
				.await,
			Err(ServiceError::InvalidToken)
		));
	}

	#[tokio::test]
	async fn expired_reset_is_rejected_and_cleaned_up() {
		let h = Harness::new().await;
		h.account("ada@example.org", ApprovalState::Approved, false)
			.await;
		h.service.forgot_password("ada@example.org").await.unwrap();
		let token = mailed_token(&h).await;

		h.clock.advance(Duration::hours(1));
		assert!(matches!(
			h.service
				.set_password(&token, "ada@example.org", "late")
				.await,
			Err(ServiceError::InvalidToken)
		));
		assert_eq!(h.service.delete_expired_resets().await.unwrap(), 1);
		assert!(h
			.resets
			.find_valid_reset(&hash_reset_token(&token), h.clock.now() - Duration::hours(2))
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn unusable_reset_url_still_reports_success() {
		let h = Harness::with_settings(ServiceSettings {
			reset_url: "not a url".to_string(),
			..Harness::settings()
		})
		.await;
		h.account("ada@example.org", ApprovalState::Approved, false)
			.await;

		assert!(h.service.forgot_password("ada@example.org").await.is_ok());
		assert!(h.notifier.sent().await.is_empty());
	}

	#[tokio::test]
	async fn mail_failure_still_reports_success() {
		let h = Harness::with_notifier(alumni_server_smtp::testing::RecordingNotifier::failing())
			.await;
		h.account("ada@example.org", ApprovalState::Approved, false)
			.await;
		assert!(h.service.forgot_password("ada@example.org").await.is_ok());
	}
}
