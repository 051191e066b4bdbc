// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::SmtpError;
use crate::notifier::{Notifier, OutgoingEmail};

/// Records every e-mail; optionally fails every send.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
	sent: Arc<Mutex<Vec<OutgoingEmail>>>,
	fail: bool,
}

impl RecordingNotifier {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing() -> Self {
		Self {
			sent: Arc::default(),
			fail: true,
		}
	}

	pub async fn sent(&self) -> Vec<OutgoingEmail> {
		self.sent.lock().await.clone()
	}
}

#[async_trait]
impl Notifier for RecordingNotifier {
	async fn send(&self, email: &OutgoingEmail) -> Result<(), SmtpError> {
		if self.fail {
			return Err(SmtpError::Send("recording notifier set to fail".into()));
		}
		self.sent.lock().await.push(email.clone());
		Ok(())
	}
}
