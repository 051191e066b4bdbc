// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use alumni_server_jobs::{Job, JobContext, JobError, JobOutput};
use async_trait::async_trait;
use tracing::instrument;

use crate::service::AlumniService;

pub struct PasswordResetCleanupJob {
	service: Arc<AlumniService>,
}

impl PasswordResetCleanupJob {
	pub fn new(service: Arc<AlumniService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Job for PasswordResetCleanupJob {
	fn id(&self) -> &str {
		"password-reset-cleanup"
	}

	fn name(&self) -> &str {
		"Password Reset Cleanup"
	}

	fn description(&self) -> &str {
		"Remove expired password reset entries"
	}

	#[instrument(skip(self, ctx), fields(job_id = "password-reset-cleanup"))]
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError> {
		ctx.check_cancelled()?;

		let removed = self
			.service
			.delete_expired_resets()
			.await
			.map_err(|e| JobError::retryable(e.to_string()))?;

		tracing::debug!(removed_count = removed, "password reset cleanup completed");

		Ok(JobOutput {
			message: format!("Removed {removed} expired password resets"),
			metadata: Some(serde_json::json!({ "removed_count": removed })),
		})
	}
}
