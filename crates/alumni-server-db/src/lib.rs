// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the alumni directory.
//!
//! Each table has a `*Store` trait (what the workflows depend on) and a
//! `*Repository` implementing it over a [`sqlx::SqlitePool`].

pub mod account;
pub mod alumni;
pub mod email_template;
pub mod error;
pub mod password_reset;
pub mod pool;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

mod row;

pub use account::{AccountRepository, AccountStore};
pub use alumni::{AlumniRepository, AlumniStore};
pub use email_template::{EmailTemplateRepository, EmailTemplateStore};
pub use error::{DbError, Result};
pub use password_reset::{PasswordResetRepository, PasswordResetStore};
pub use pool::{create_pool, ping, run_migrations};
pub use types::{AlumniFilter, EmailTemplate, PasswordReset};
pub use sqlx::SqlitePool;
