// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use alumni_directory_core::{FullView, PageInfo, RedactedView};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing and exporting alumni.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListAlumniQuery {
	/// 1-based page; zero or negative means the first page.
	pub page: Option<i64>,
	/// Page size; 0 or absent means 20, -1 means no limit.
	pub limit: Option<i64>,
	/// Case-insensitive substring match on first name.
	pub firstname: Option<String>,
	/// Case-insensitive substring match on last name.
	pub lastname: Option<String>,
}

/// One entry in a listing: the full record or its redacted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(untagged)]
pub enum AlumniItem {
	Full(FullView),
	Redacted(RedactedView),
}

impl AlumniItem {
	pub fn is_full(&self) -> bool {
		matches!(self, AlumniItem::Full(_))
	}
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListAlumniResponse {
	pub items: Vec<AlumniItem>,
	pub page_info: PageInfo,
}
