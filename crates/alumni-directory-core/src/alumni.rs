// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Alumni records.
//!
//! The [`AlumniProfile`] is the self-described payload an alumnus submits. The
//! access rules never look inside it; only the workflows that build views and
//! the birthday job read individual fields.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::AlumniId;

/// Attendance at one of the affiliated summer camps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Camp {
	pub attended: bool,
	pub start_year: String,
	pub end_year: String,
	pub specialty: String,
	pub camper: bool,
	pub counselor: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Sibling {
	pub name: String,
	pub year_completed: String,
	pub school: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Child {
	pub name: String,
	pub graduation_year: String,
}

/// Everything an alumnus says about themselves.
///
/// Missing JSON fields deserialize to empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct AlumniProfile {
	pub firstname: String,
	pub middlename: String,
	pub lastname: String,
	pub married_name: String,
	pub mother_name: String,
	pub father_name: String,
	pub address: String,
	pub home_phone: String,
	pub cell_phone: String,
	pub work_phone: String,
	pub email_address: String,
	/// Graduation year.
	pub last_year_attended: String,
	pub israel_school: String,
	pub college_attended: String,
	pub grad_school: String,
	pub profession: String,
	/// `YYYY-MM-DD`; `MM/DD/YYYY` is also understood.
	pub birthday: String,
	pub clubs: Vec<String>,
	pub sports_teams: Vec<String>,
	pub awards: Vec<String>,
	pub committees: Vec<String>,
	pub old_addresses: Vec<String>,
	pub hillel_day_camp: Camp,
	pub hillel_sleep_camp: Camp,
	pub hili_day_camp: Camp,
	pub hili_white_camp: Camp,
	pub hili_international_camp: Camp,
	pub hili: bool,
	pub hillel: bool,
	pub haftr: bool,
	pub parent_of_student: bool,
	pub boards: Vec<String>,
	pub alumni_positions: Vec<String>,
	pub siblings: Vec<Sibling>,
	pub children: Vec<Child>,
}

impl AlumniProfile {
	/// Parse the free-form birthday field.
	pub fn birth_date(&self) -> Option<NaiveDate> {
		let raw = self.birthday.trim();
		if raw.is_empty() {
			return None;
		}
		NaiveDate::parse_from_str(raw, "%Y-%m-%d")
			.or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
			.ok()
	}

	/// Whether the birthday falls on the same month and day as `date`.
	pub fn has_birthday_on(&self, date: NaiveDate) -> bool {
		self
			.birth_date()
			.map(|b| b.month() == date.month() && b.day() == date.day())
			.unwrap_or(false)
	}
}

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlumniRecord {
	pub id: AlumniId,
	pub profile: AlumniProfile,
	/// Object-store key of the profile photo, if one was uploaded.
	pub photo_key: Option<String>,
	pub is_public: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl AlumniRecord {
	/// Build a new record. Records always start private.
	pub fn new(profile: AlumniProfile, now: DateTime<Utc>) -> Self {
		Self {
			id: AlumniId::generate(),
			profile,
			photo_key: None,
			is_public: false,
			created_at: now,
			updated_at: now,
		}
	}

	/// Object-store key under which this record's photo is kept.
	pub fn photo_storage_key(&self) -> String {
		format!("{}/profile", self.id)
	}
}
