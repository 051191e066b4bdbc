// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory service wiring for workflow tests.

use std::sync::Arc;

use alumni_common_secret::SecretString;
use alumni_directory_core::{Account, AlumniProfile, AlumniRecord, ApprovalState};
use alumni_server_auth::{
	Argon2Hasher, Clock, CredentialHasher, FixedClock, SessionResolver, TokenCodec,
};
use alumni_server_db::testing::create_test_pool;
use alumni_server_db::{
	AccountRepository, AlumniRepository, EmailTemplateRepository, PasswordResetRepository,
};
use alumni_server_smtp::testing::RecordingNotifier;
use alumni_server_storage::{FilesystemObjectStore, UrlSigner};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use super::{AlumniService, ServiceDeps, ServiceSettings};

pub(crate) const PASSWORD: &str = "correct horse battery staple";
pub(crate) const ADMIN_ADDRESS: &str = "admin@alumni.example.org";

/// 2026-03-14 12:00:00 UTC.
pub(crate) fn test_now() -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

pub(crate) struct Harness {
	pub service: AlumniService,
	pub accounts: AccountRepository,
	pub alumni: AlumniRepository,
	pub resets: PasswordResetRepository,
	pub templates: EmailTemplateRepository,
	pub notifier: RecordingNotifier,
	pub clock: FixedClock,
	pub codec: Arc<TokenCodec>,
	_dir: TempDir,
}

impl Harness {
	pub async fn new() -> Self {
		Self::build(RecordingNotifier::new(), Self::settings()).await
	}

	pub async fn with_notifier(notifier: RecordingNotifier) -> Self {
		Self::build(notifier, Self::settings()).await
	}

	pub async fn with_settings(settings: ServiceSettings) -> Self {
		Self::build(RecordingNotifier::new(), settings).await
	}

	pub fn settings() -> ServiceSettings {
		ServiceSettings {
			base_url: "http://alumni.test".to_string(),
			admin_address: Some(ADMIN_ADDRESS.to_string()),
			reset_url: "http://alumni.test/setpassword".to_string(),
		}
	}

	async fn build(notifier: RecordingNotifier, settings: ServiceSettings) -> Self {
		let pool = create_test_pool().await;
		let dir = tempfile::tempdir().unwrap();
		let secret = SecretString::new("test-signing-secret".to_string());

		let accounts = AccountRepository::new(pool.clone());
		let alumni = AlumniRepository::new(pool.clone());
		let resets = PasswordResetRepository::new(pool.clone());
		let templates = EmailTemplateRepository::new(pool);
		let clock = FixedClock::new(test_now());
		let codec = Arc::new(TokenCodec::new(&secret));
		let signer = UrlSigner::new(secret, "http://alumni.test", 900);

		let service = AlumniService::new(ServiceDeps {
			accounts: Arc::new(accounts.clone()),
			alumni: Arc::new(alumni.clone()),
			resets: Arc::new(resets.clone()),
			templates: Arc::new(templates.clone()),
			objects: Arc::new(FilesystemObjectStore::new(dir.path(), signer)),
			notifier: Arc::new(notifier.clone()),
			hasher: Arc::new(Argon2Hasher),
			sessions: SessionResolver::new(Arc::clone(&codec), Arc::new(accounts.clone())),
			clock: Arc::new(clock.clone()),
			settings,
		});

		Self {
			service,
			accounts,
			alumni,
			resets,
			templates,
			notifier,
			clock,
			codec,
			_dir: dir,
		}
	}

	/// Insert an account with [`PASSWORD`] and return it with a valid token.
	pub async fn account(
		&self,
		email: &str,
		approval: ApprovalState,
		is_admin: bool,
	) -> (Account, String) {
		let hash = Argon2Hasher.hash(PASSWORD).unwrap();
		let mut account = Account::new(email, hash, self.clock.now());
		account.approval = approval;
		account.is_admin = is_admin;
		self.accounts.create_account(&account).await.unwrap();
		let token = self
			.codec
			.issue(account.id, account.is_admin, self.clock.now())
			.unwrap();
		(account, token)
	}

	pub async fn admin(&self) -> (Account, String) {
		self.account("root@alumni.test", ApprovalState::Approved, true).await
	}

	/// Insert a record, optionally linking it to `owner`.
	pub async fn record(
		&self,
		firstname: &str,
		lastname: &str,
		is_public: bool,
		owner: Option<&mut Account>,
	) -> AlumniRecord {
		let mut record = AlumniRecord::new(profile(firstname, lastname), self.clock.now());
		record.is_public = is_public;
		self.alumni.create_record(&record).await.unwrap();
		if let Some(owner) = owner {
			assert!(self
				.accounts
				.claim_record(&owner.id, &record.id, self.clock.now())
				.await
				.unwrap());
			owner.linked_record_id = Some(record.id);
		}
		record
	}
}

pub(crate) fn profile(firstname: &str, lastname: &str) -> AlumniProfile {
	AlumniProfile {
		firstname: firstname.to_string(),
		lastname: lastname.to_string(),
		last_year_attended: "2004".to_string(),
		email_address: format!("{}@example.org", firstname.to_lowercase()),
		home_phone: "555-0100".to_string(),
		address: "1 Main St".to_string(),
		..Default::default()
	}
}

/// Smallest byte strings that sniff as PNG and JPEG.
pub(crate) const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
pub(crate) const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0];
