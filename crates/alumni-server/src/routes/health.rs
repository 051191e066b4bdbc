// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Liveness handler.

use alumni_server_jobs::{HealthState, JobsHealthStatus};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
	Healthy,
	Degraded,
	Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub version: String,
	pub database: DatabaseHealth,
	#[schema(value_type = Option<Object>)]
	#[serde(skip_serializing_if = "Option::is_none")]
	pub jobs: Option<JobsHealthStatus>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Database round-trip plus background job status.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let start = tokio::time::Instant::now();
	let database = match alumni_server_db::ping(&state.pool).await {
		Ok(()) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms: start.elapsed().as_millis() as u64,
			error: None,
		},
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			DatabaseHealth {
				status: HealthStatus::Unhealthy,
				latency_ms: start.elapsed().as_millis() as u64,
				error: Some(e.to_string()),
			}
		}
	};

	let jobs = match &state.scheduler {
		Some(scheduler) => Some(scheduler.health_status().await),
		None => None,
	};

	let status = overall_status(database.status, jobs.as_ref().map(|j| j.status));
	let code = if status == HealthStatus::Unhealthy {
		StatusCode::SERVICE_UNAVAILABLE
	} else {
		StatusCode::OK
	};

	(
		code,
		Json(HealthResponse {
			status,
			version: env!("CARGO_PKG_VERSION").to_string(),
			database,
			jobs,
		}),
	)
}

/// A failing job degrades the server; only the database can make it unhealthy.
fn overall_status(database: HealthStatus, jobs: Option<HealthState>) -> HealthStatus {
	if database == HealthStatus::Unhealthy {
		return HealthStatus::Unhealthy;
	}
	match jobs {
		Some(HealthState::Degraded | HealthState::Unhealthy) => HealthStatus::Degraded,
		_ => HealthStatus::Healthy,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn database_outage_is_unhealthy() {
		assert_eq!(
			overall_status(HealthStatus::Unhealthy, Some(HealthState::Healthy)),
			HealthStatus::Unhealthy
		);
	}

	#[test]
	fn failing_jobs_only_degrade() {
		assert_eq!(
			overall_status(HealthStatus::Healthy, Some(HealthState::Unhealthy)),
			HealthStatus::Degraded
		);
		assert_eq!(overall_status(HealthStatus::Healthy, None), HealthStatus::Healthy);
	}
}
