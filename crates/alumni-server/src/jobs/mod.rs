// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background jobs registered with the scheduler at startup.

mod birthday_email;
mod password_reset_cleanup;

pub use birthday_email::BirthdayEmailJob;
pub use password_reset_cleanup::PasswordResetCleanupJob;
