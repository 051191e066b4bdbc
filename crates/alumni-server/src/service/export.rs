// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CSV rendering of alumni listings.
//!
//! Administrators get every scalar profile column with list fields joined by
//! `"; "`. Everyone else gets the redacted columns.

use alumni_directory_core::{FullView, PageRequest, RedactedView};
use alumni_server_api::{AlumniItem, ListAlumniQuery};
use tracing::instrument;

use super::AlumniService;
use crate::error::{Result, ServiceError};

const FULL_COLUMNS: &[&str] = &[
	"id",
	"firstname",
	"middlename",
	"lastname",
	"marriedName",
	"emailAddress",
	"address",
	"homePhone",
	"cellPhone",
	"workPhone",
	"lastYearAttended",
	"birthday",
	"profession",
	"collegeAttended",
	"gradSchool",
	"israelSchool",
	"motherName",
	"fatherName",
	"clubs",
	"sportsTeams",
	"awards",
	"committees",
	"boards",
	"alumniPositions",
	"isPublic",
];

const REDACTED_COLUMNS: &[&str] = &[
	"id",
	"firstname",
	"lastname",
	"lastYearAttended",
	"emailAddress",
];

/// A rendered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
	pub body: String,
	pub rows: usize,
}

impl AlumniService {
	/// Everything `fetch_many` would show the caller, on one page, as CSV.
	#[instrument(skip_all)]
	pub async fn export_csv(&self, token: &str, query: ListAlumniQuery) -> Result<CsvExport> {
		let now = self.now();
		let caller = self.authenticate(token, now).await?;
		let (items, _) = self
			.browse(&caller, &query, &PageRequest::unbounded(), now)
			.await?;

		let export = render(&items, caller.is_admin)
			.map_err(|e| ServiceError::upstream("csv", "export", e))?;
		tracing::info!(account_id = %caller.id, rows = export.rows, "alumni exported");
		Ok(export)
	}
}

fn render(items: &[AlumniItem], full_columns: bool) -> std::result::Result<CsvExport, csv::Error> {
	let mut writer = csv::Writer::from_writer(Vec::new());
	writer.write_record(if full_columns {
		FULL_COLUMNS
	} else {
		REDACTED_COLUMNS
	})?;

	for item in items {
		match (item, full_columns) {
			(AlumniItem::Full(view), true) => writer.write_record(full_row(view))?,
			(AlumniItem::Full(view), false) => writer.write_record(redacted_row(
				&RedactedView {
					id: view.id,
					firstname: view.profile.firstname.clone(),
					lastname: view.profile.lastname.clone(),
					last_year_attended: view.profile.last_year_attended.clone(),
					email_address: view.profile.email_address.clone(),
					profile_picture_url: None,
				},
			))?,
			(AlumniItem::Redacted(view), _) => writer.write_record(redacted_row(view))?,
		}
	}

	let bytes = writer
		.into_inner()
		.map_err(|e| csv::Error::from(e.into_error()))?;
	Ok(CsvExport {
		body: String::from_utf8_lossy(&bytes).into_owned(),
		rows: items.len(),
	})
}

fn full_row(view: &FullView) -> Vec<String> {
	let p = &view.profile;
	vec![
		view.id.to_string(),
		p.firstname.clone(),
		p.middlename.clone(),
		p.lastname.clone(),
		p.married_name.clone(),
		p.email_address.clone(),
		p.address.clone(),
		p.home_phone.clone(),
		p.cell_phone.clone(),
		p.work_phone.clone(),
		p.last_year_attended.clone(),
		p.birthday.clone(),
		p.profession.clone(),
		p.college_attended.clone(),
		p.grad_school.clone(),
		p.israel_school.clone(),
		p.mother_name.clone(),
		p.father_name.clone(),
		p.clubs.join("; "),
		p.sports_teams.join("; "),
		p.awards.join("; "),
		p.committees.join("; "),
		p.boards.join("; "),
		p.alumni_positions.join("; "),
		view.is_public.to_string(),
	]
}

fn redacted_row(view: &RedactedView) -> [String; 5] {
	[
		view.id.to_string(),
		view.firstname.clone(),
		view.lastname.clone(),
		view.last_year_attended.clone(),
		view.email_address.clone(),
	]
}
