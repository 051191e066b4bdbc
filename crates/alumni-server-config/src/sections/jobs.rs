// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Jobs configuration section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobsConfigLayer {
	pub birthday_emails_enabled: Option<bool>,
	pub birthday_interval_secs: Option<u64>,
	pub reset_cleanup_interval_secs: Option<u64>,
}

impl JobsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.birthday_emails_enabled.is_some() {
			self.birthday_emails_enabled = other.birthday_emails_enabled;
		}
		if other.birthday_interval_secs.is_some() {
			self.birthday_interval_secs = other.birthday_interval_secs;
		}
		if other.reset_cleanup_interval_secs.is_some() {
			self.reset_cleanup_interval_secs = other.reset_cleanup_interval_secs;
		}
	}

	pub fn finalize(self) -> JobsConfig {
		let defaults = JobsConfig::default();
		JobsConfig {
			birthday_emails_enabled: self
				.birthday_emails_enabled
				.unwrap_or(defaults.birthday_emails_enabled),
			birthday_interval_secs: self
				.birthday_interval_secs
				.unwrap_or(defaults.birthday_interval_secs),
			reset_cleanup_interval_secs: self
				.reset_cleanup_interval_secs
				.unwrap_or(defaults.reset_cleanup_interval_secs),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobsConfig {
	pub birthday_emails_enabled: bool,
	pub birthday_interval_secs: u64,
	pub reset_cleanup_interval_secs: u64,
}

impl Default for JobsConfig {
	fn default() -> Self {
		Self {
			birthday_emails_enabled: true,
			birthday_interval_secs: 86400, // 24 hours
			reset_cleanup_interval_secs: 3600,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layer_finalize_defaults() {
		let config = JobsConfigLayer::default().finalize();
		assert_eq!(config, JobsConfig::default());
		assert!(config.birthday_emails_enabled);
		assert_eq!(config.birthday_interval_secs, 86400);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = JobsConfigLayer {
			birthday_emails_enabled: Some(true),
			birthday_interval_secs: Some(100),
			..Default::default()
		};
		base.merge(JobsConfigLayer {
			birthday_emails_enabled: Some(false),
			..Default::default()
		});
		assert_eq!(base.birthday_emails_enabled, Some(false));
		assert_eq!(base.birthday_interval_secs, Some(100));
	}

	#[test]
	fn test_serde_roundtrip() {
		let config = JobsConfig {
			birthday_emails_enabled: false,
			birthday_interval_secs: 3600,
			reset_cleanup_interval_secs: 60,
		};
		let toml_str = toml::to_string(&config).unwrap();
		let parsed: JobsConfig = toml::from_str(&toml_str).unwrap();
		assert_eq!(config, parsed);
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: JobsConfigLayer = toml::from_str("birthday_emails_enabled = false\n").unwrap();
		assert_eq!(layer.birthday_emails_enabled, Some(false));
		assert!(layer.birthday_interval_secs.is_none());
	}
}
