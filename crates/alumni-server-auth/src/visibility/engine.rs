// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visibility evaluation.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. administrators see everything in full
//! 2. owners see their own record in full
//! 3. private records are hidden from everyone else
//! 4. callers not yet approved see no other record
//! 5. approved callers see public records redacted

use alumni_directory_core::DisclosureLevel;
use tracing::instrument;

use super::types::{CallerAttrs, TargetAttrs};

#[instrument(
	level = "debug",
	skip(caller, target),
	fields(
		account_id = %caller.account_id,
		record_id = %target.record_id,
	)
)]
pub fn resolve_disclosure(caller: &CallerAttrs, target: &TargetAttrs) -> DisclosureLevel {
	let level = if caller.is_admin || caller.owns(target.record_id) {
		DisclosureLevel::Full
	} else if !target.is_public || !caller.is_approved() {
		DisclosureLevel::Denied
	} else {
		DisclosureLevel::Redacted
	};

	tracing::debug!(%level, "visibility resolved");
	level
}

/// Whether the caller may edit or change the privacy of a record.
pub fn can_modify(caller: &CallerAttrs, target: &TargetAttrs) -> bool {
	caller.is_admin || caller.owns(target.record_id)
}

/// Whether the caller may list other people's records.
pub fn can_browse(caller: &CallerAttrs) -> bool {
	caller.is_admin || caller.is_approved()
}

/// Whether the caller may approve or deny accounts.
pub fn can_manage_accounts(caller: &CallerAttrs) -> bool {
	caller.is_admin
}
