// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The three shapes a record can take when shown to a caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::alumni::{AlumniProfile, AlumniRecord};
use crate::ids::AlumniId;

/// How much of a record a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureLevel {
	Full,
	Redacted,
	Denied,
}

impl fmt::Display for DisclosureLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DisclosureLevel::Full => write!(f, "full"),
			DisclosureLevel::Redacted => write!(f, "redacted"),
			DisclosureLevel::Denied => write!(f, "denied"),
		}
	}
}

/// Every persisted field plus a short-lived photo URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FullView {
	pub id: AlumniId,
	#[serde(flatten)]
	pub profile: AlumniProfile,
	pub is_public: bool,
	pub profile_picture_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl FullView {
	pub fn from_record(record: AlumniRecord, profile_picture_url: Option<String>) -> Self {
		Self {
			id: record.id,
			profile: record.profile,
			is_public: record.is_public,
			profile_picture_url,
			created_at: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

/// The reduced field set shown to approved members browsing public records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RedactedView {
	pub id: AlumniId,
	pub firstname: String,
	pub lastname: String,
	pub last_year_attended: String,
	pub email_address: String,
	pub profile_picture_url: Option<String>,
}

impl RedactedView {
	pub fn from_record(record: &AlumniRecord, profile_picture_url: Option<String>) -> Self {
		Self {
			id: record.id,
			firstname: record.profile.firstname.clone(),
			lastname: record.profile.lastname.clone(),
			last_year_attended: record.profile.last_year_attended.clone(),
			email_address: record.profile.email_address.clone(),
			profile_picture_url,
		}
	}
}

/// A materialised disclosure decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Disclosure {
	Full(FullView),
	Redacted(RedactedView),
	Denied,
}

impl Disclosure {
	pub fn level(&self) -> DisclosureLevel {
		match self {
			Disclosure::Full(_) => DisclosureLevel::Full,
			Disclosure::Redacted(_) => DisclosureLevel::Redacted,
			Disclosure::Denied => DisclosureLevel::Denied,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record() -> AlumniRecord {
		let profile = AlumniProfile {
			firstname: "Ada".into(),
			lastname: "Lovelace".into(),
			last_year_attended: "1999".into(),
			email_address: "ada@example.com".into(),
			home_phone: "555-0100".into(),
			address: "1 Analytical Way".into(),
			mother_name: "Anne".into(),
			committees: vec!["Reunion".into()],
			..Default::default()
		};
		AlumniRecord::new(profile, Utc::now())
	}

	#[test]
	fn redacted_view_serializes_only_five_fields_and_id() {
		let view = RedactedView::from_record(&record(), Some("https://photo".into()));
		let json = serde_json::to_value(&view).unwrap();
		let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
		assert_eq!(keys.len(), 6);
		for key in [
			"id",
			"firstname",
			"lastname",
			"lastYearAttended",
			"emailAddress",
			"profilePictureUrl",
		] {
			assert!(keys.contains(&key), "missing {key}");
		}
	}

	#[test]
	fn redacted_view_never_leaks_private_fields() {
		let view = RedactedView::from_record(&record(), None);
		let json = serde_json::to_string(&view).unwrap();
		assert!(!json.contains("555-0100"));
		assert!(!json.contains("Analytical"));
		assert!(!json.contains("Anne"));
		assert!(!json.contains("Reunion"));
	}

	#[test]
	fn full_view_flattens_profile() {
		let view = FullView::from_record(record(), None);
		let json = serde_json::to_value(&view).unwrap();
		assert_eq!(json["homePhone"], "555-0100");
		assert_eq!(json["isPublic"], false);
		assert!(json["profilePictureUrl"].is_null());
	}

	#[test]
	fn disclosure_reports_level() {
		let r = record();
		assert_eq!(
			Disclosure::Full(FullView::from_record(r.clone(), None)).level(),
			DisclosureLevel::Full
		);
		assert_eq!(
			Disclosure::Redacted(RedactedView::from_record(&r, None)).level(),
			DisclosureLevel::Redacted
		);
		assert_eq!(Disclosure::Denied.level(), DisclosureLevel::Denied);
	}
}
