// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the directory core.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
	/// A limit below the "no limit" sentinel was requested.
	#[error("invalid page limit: {0}")]
	InvalidLimit(i64),

	/// An approval state string that is not pending, approved or denied.
	#[error("invalid approval state: {0}")]
	InvalidApprovalState(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
