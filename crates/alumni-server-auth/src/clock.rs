// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Injectable time source.
//!
//! Token expiry, approval timestamps and the birthday job all read time
//! through a [`Clock`] so tests can pin it.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
	now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
	pub fn new(now: DateTime<Utc>) -> Self {
		Self {
			now: Arc::new(Mutex::new(now)),
		}
	}

	pub fn set(&self, now: DateTime<Utc>) {
		if let Ok(mut guard) = self.now.lock() {
			*guard = now;
		}
	}

	pub fn advance(&self, by: Duration) {
		if let Ok(mut guard) = self.now.lock() {
			*guard += by;
		}
	}
}

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		match self.now.lock() {
			Ok(guard) => *guard,
			Err(poisoned) => *poisoned.into_inner(),
		}
	}
}
