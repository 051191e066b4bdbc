// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use super::http::HttpConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsConfig {
	/// Receives "new alumni" and "alumni updated" notices. None disables them.
	pub admin_address: Option<String>,
	/// Page the password reset e-mail links to; `token` and `email` are
	/// appended as query parameters.
	pub reset_url: String,
}

impl Default for NotificationsConfig {
	fn default() -> Self {
		NotificationsConfigLayer::default().finalize(&HttpConfig::default().base_url)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsConfigLayer {
	#[serde(default)]
	pub admin_address: Option<String>,
	#[serde(default)]
	pub reset_url: Option<String>,
}

impl NotificationsConfigLayer {
	pub fn merge(&mut self, other: NotificationsConfigLayer) {
		if other.admin_address.is_some() {
			self.admin_address = other.admin_address;
		}
		if other.reset_url.is_some() {
			self.reset_url = other.reset_url;
		}
	}

	pub fn finalize(self, base_url: &str) -> NotificationsConfig {
		NotificationsConfig {
			admin_address: self.admin_address.filter(|a| !a.trim().is_empty()),
			reset_url: self
				.reset_url
				.unwrap_or_else(|| format!("{base_url}/setpassword")),
		}
	}
}
