// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attributes the visibility rules evaluate.

use alumni_directory_core::{Account, AccountId, AlumniId, AlumniRecord, ApprovalState};

/// The account making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerAttrs {
	pub account_id: AccountId,
	pub is_admin: bool,
	pub approval: ApprovalState,
	pub linked_record_id: Option<AlumniId>,
}

impl CallerAttrs {
	pub fn from_account(account: &Account) -> Self {
		Self {
			account_id: account.id,
			is_admin: account.is_admin,
			approval: account.approval,
			linked_record_id: account.linked_record_id,
		}
	}

	pub fn owns(&self, record_id: AlumniId) -> bool {
		self.linked_record_id == Some(record_id)
	}

	pub fn is_approved(&self) -> bool {
		self.approval == ApprovalState::Approved
	}
}

/// The record being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetAttrs {
	pub record_id: AlumniId,
	pub is_public: bool,
}

impl TargetAttrs {
	pub fn from_record(record: &AlumniRecord) -> Self {
		Self {
			record_id: record.id,
			is_public: record.is_public,
		}
	}
}
