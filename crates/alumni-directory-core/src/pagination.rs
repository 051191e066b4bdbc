// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Listing window arithmetic.
//!
//! Pages are 1-based. A requested page of 0 or below is page 1. A limit of 0
//! (or no limit at all) means [`DEFAULT_PAGE_SIZE`], and [`NO_LIMIT`] asks for
//! every matching record in one response.
//!
//! Page totals are always computed against a bounded page size: an unbounded
//! request still reports `ceil(count / DEFAULT_PAGE_SIZE)` as its last page.
//! Clients depend on that number, so it stays.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sentinel limit requesting an unbounded listing.
pub const NO_LIMIT: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
	Bounded(u32),
	Unbounded,
}

impl Limit {
	/// Interpret a raw limit query parameter.
	pub fn from_raw(raw: Option<i64>) -> Result<Self> {
		match raw {
			None | Some(0) => Ok(Limit::Bounded(DEFAULT_PAGE_SIZE)),
			Some(NO_LIMIT) => Ok(Limit::Unbounded),
			Some(n) if n < 0 => Err(CoreError::InvalidLimit(n)),
			Some(n) => Ok(Limit::Bounded(u32::try_from(n).unwrap_or(u32::MAX))),
		}
	}

	/// Page size used for page-total arithmetic.
	pub fn effective(&self) -> u32 {
		match self {
			Limit::Bounded(0) | Limit::Unbounded => DEFAULT_PAGE_SIZE,
			Limit::Bounded(n) => *n,
		}
	}
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub page: u32,
	pub limit: Limit,
}

impl Default for PageRequest {
	fn default() -> Self {
		Self {
			page: 1,
			limit: Limit::Bounded(DEFAULT_PAGE_SIZE),
		}
	}
}

impl PageRequest {
	pub fn new(page: u32, limit: Limit) -> Self {
		Self {
			page: page.max(1),
			limit,
		}
	}

	/// Normalize raw query parameters.
	pub fn from_raw(page: Option<i64>, limit: Option<i64>) -> Result<Self> {
		let page = page
			.filter(|p| *p > 0)
			.map(|p| u32::try_from(p).unwrap_or(u32::MAX))
			.unwrap_or(1);
		Ok(Self::new(page, Limit::from_raw(limit)?))
	}

	pub fn unbounded() -> Self {
		Self::new(1, Limit::Unbounded)
	}
}

/// The slice of a result set a query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	pub skip: u64,
	/// `None` means no bound.
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
	pub current_page: u32,
	pub last_page: u64,
}

pub fn compute_window(request: &PageRequest) -> Window {
	match request.limit {
		Limit::Unbounded => Window {
			skip: 0,
			limit: None,
		},
		Limit::Bounded(_) => {
			let limit = request.limit.effective();
			let page = u64::from(request.page.max(1));
			Window {
				skip: (page - 1) * u64::from(limit),
				limit: Some(limit),
			}
		}
	}
}

pub fn compute_page_info(matching_count: u64, request: &PageRequest) -> PageInfo {
	let limit = u64::from(request.limit.effective());
	PageInfo {
		current_page: request.page.max(1),
		last_page: matching_count.div_ceil(limit),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod limits {
		use super::*;

		#[test]
		fn absent_and_zero_use_default() {
			assert_eq!(Limit::from_raw(None).unwrap(), Limit::Bounded(DEFAULT_PAGE_SIZE));
			assert_eq!(Limit::from_raw(Some(0)).unwrap(), Limit::Bounded(DEFAULT_PAGE_SIZE));
		}

		#[test]
		fn sentinel_is_unbounded() {
			assert_eq!(Limit::from_raw(Some(NO_LIMIT)).unwrap(), Limit::Unbounded);
		}

		#[test]
		fn other_negatives_are_rejected() {
			assert_eq!(Limit::from_raw(Some(-5)), Err(CoreError::InvalidLimit(-5)));
		}

		#[test]
		fn positive_limit_is_kept() {
			assert_eq!(Limit::from_raw(Some(7)).unwrap(), Limit::Bounded(7));
		}
	}

	mod windows {
		use super::*;

		#[test]
		fn first_page_skips_nothing() {
			let window = compute_window(&PageRequest::from_raw(Some(1), Some(20)).unwrap());
			assert_eq!(window, Window { skip: 0, limit: Some(20) });
		}

		#[test]
		fn page_zero_and_negative_are_page_one() {
			for page in [Some(0), Some(-3), None] {
				let window = compute_window(&PageRequest::from_raw(page, Some(10)).unwrap());
				assert_eq!(window.skip, 0);
			}
		}

		#[test]
		fn third_page_skips_two_pages() {
			let window = compute_window(&PageRequest::from_raw(Some(3), Some(15)).unwrap());
			assert_eq!(window, Window { skip: 30, limit: Some(15) });
		}

		#[test]
		fn unbounded_ignores_page() {
			let window = compute_window(&PageRequest::from_raw(Some(4), Some(NO_LIMIT)).unwrap());
			assert_eq!(window, Window { skip: 0, limit: None });
		}

		#[test]
		fn bounded_zero_falls_back_to_default() {
			let window = compute_window(&PageRequest::new(2, Limit::Bounded(0)));
			assert_eq!(
				window,
				Window {
					skip: u64::from(DEFAULT_PAGE_SIZE),
					limit: Some(DEFAULT_PAGE_SIZE)
				}
			);
		}
	}

	mod page_info {
		use super::*;

		#[test]
		fn forty_five_records_twenty_per_page() {
			let info = compute_page_info(45, &PageRequest::from_raw(Some(2), Some(20)).unwrap());
			assert_eq!(
				info,
				PageInfo {
					current_page: 2,
					last_page: 3
				}
			);
		}

		#[test]
		fn exact_multiple_has_no_extra_page() {
			let info = compute_page_info(40, &PageRequest::from_raw(Some(1), Some(20)).unwrap());
			assert_eq!(info.last_page, 2);
		}

		#[test]
		fn empty_result_has_zero_pages() {
			let info = compute_page_info(0, &PageRequest::default());
			assert_eq!(info.last_page, 0);
			assert_eq!(info.current_page, 1);
		}

		#[test]
		fn unbounded_still_reports_default_sized_pages() {
			// An unbounded fetch returns everything on one page but reports
			// the page count a default-sized listing would have.
			let info = compute_page_info(45, &PageRequest::unbounded());
			assert_eq!(info.last_page, 3);
		}
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn skip_is_previous_pages_times_limit(page in 1u32..10_000, limit in 1u32..500) {
				let window = compute_window(&PageRequest::new(page, Limit::Bounded(limit)));
				prop_assert_eq!(window.skip, u64::from(page - 1) * u64::from(limit));
				prop_assert_eq!(window.limit, Some(limit));
			}

			#[test]
			fn last_page_covers_every_record(count in 0u64..1_000_000, limit in 1u32..500) {
				let info = compute_page_info(count, &PageRequest::new(1, Limit::Bounded(limit)));
				prop_assert!(info.last_page * u64::from(limit) >= count);
				if count > 0 {
					prop_assert!((info.last_page - 1) * u64::from(limit) < count);
				}
			}

			#[test]
			fn non_positive_pages_normalize_to_one(page in i64::MIN..=0) {
				let request = PageRequest::from_raw(Some(page), None).unwrap();
				prop_assert_eq!(request.page, 1);
			}
		}
	}
}
