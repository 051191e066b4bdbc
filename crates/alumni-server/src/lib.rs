// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Alumni directory server.
//!
//! Accounts register, wait for administrator approval and then browse the
//! directory. Each account may own one alumni record and decides whether it
//! is public. What a caller sees of a record depends on who they are: see
//! [`alumni_server_auth::resolve_disclosure`].

pub mod api;
pub mod api_docs;
pub mod error;
pub mod jobs;
pub mod routes;
pub mod service;

pub use api::{build_notifier, build_service, create_app_state, create_router, AppState};
pub use alumni_server_config::ServerConfig;
pub use api_docs::ApiDoc;
pub use error::ServiceError;
pub use service::{
	AlumniService, BirthdaySummary, CsvExport, PhotoUpload, ServiceDeps, ServiceSettings,
};
