// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the alumni directory.
//!
//! This crate holds the data model shared by the server crates:
//!
//! - [`Account`] and its [`ApprovalState`] gate
//! - [`AlumniRecord`] with its opaque [`AlumniProfile`] payload
//! - the three disclosure shapes ([`FullView`], [`RedactedView`], [`Disclosure`])
//! - the listing window arithmetic in [`pagination`]
//!
//! Nothing here performs I/O.

pub mod account;
pub mod alumni;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod view;

pub use account::{Account, ApprovalState};
pub use alumni::{AlumniProfile, AlumniRecord, Camp, Child, Sibling};
pub use error::{CoreError, Result};
pub use ids::{AccountId, AlumniId, PasswordResetId};
pub use pagination::{
	compute_page_info, compute_window, Limit, PageInfo, PageRequest, Window, DEFAULT_PAGE_SIZE,
	NO_LIMIT,
};
pub use view::{Disclosure, DisclosureLevel, FullView, RedactedView};
