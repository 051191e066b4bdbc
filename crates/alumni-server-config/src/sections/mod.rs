// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod auth;
mod database;
mod http;
mod jobs;
mod logging;
mod notifications;
mod smtp;
mod storage;

pub use auth::{AuthConfig, AuthConfigLayer, PRODUCTION_ENVIRONMENT};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use jobs::{JobsConfig, JobsConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use notifications::{NotificationsConfig, NotificationsConfigLayer};
pub use smtp::{SmtpConfig, SmtpConfigLayer};
pub use storage::{StorageConfig, StorageConfigLayer};
