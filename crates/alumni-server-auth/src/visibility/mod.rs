// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record visibility rules.
//!
//! [`resolve_disclosure`] decides, for a caller and a target record, whether
//! the caller sees the full record, a redacted card, or nothing. The remaining
//! predicates gate the write and listing operations. All of them are pure:
//! attributes are loaded by the caller beforehand.

mod engine;
mod types;

pub use engine::{can_browse, can_manage_accounts, can_modify, resolve_disclosure};
pub use types::{CallerAttrs, TargetAttrs};
