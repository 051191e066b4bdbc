// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use alumni_server_jobs::{Job, JobContext, JobError, JobOutput};
use async_trait::async_trait;
use tracing::instrument;

use crate::service::AlumniService;

/// Sends the "happy birthday" e-mail to everyone whose birthday is today.
pub struct BirthdayEmailJob {
	service: Arc<AlumniService>,
}

impl BirthdayEmailJob {
	pub fn new(service: Arc<AlumniService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Job for BirthdayEmailJob {
	fn id(&self) -> &str {
		"birthday-email"
	}

	fn name(&self) -> &str {
		"Birthday E-mail"
	}

	fn description(&self) -> &str {
		"Send birthday greetings to alumni born on today's date"
	}

	#[instrument(skip(self, ctx), fields(job_id = "birthday-email"))]
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError> {
		ctx.check_cancelled()?;

		let today = self.service.now().date_naive();
		let summary = self
			.service
			.send_birthday_greetings(today)
			.await
			.map_err(|e| JobError::retryable(e.to_string()))?;

		Ok(JobOutput {
			message: format!(
				"Sent {} birthday e-mails ({} failed, {} without address)",
				summary.sent, summary.failed, summary.skipped
			),
			metadata: Some(serde_json::json!({
				"date": today.to_string(),
				"sent": summary.sent,
				"failed": summary.failed,
				"skipped": summary.skipped,
			})),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::service::testing::{profile, test_now, Harness};
	use alumni_server_jobs::{CancellationToken, TriggerSource};

	fn context() -> JobContext {
		JobContext {
			run_id: "run-1".to_string(),
			triggered_by: TriggerSource::Schedule,
			cancellation_token: CancellationToken::new(),
		}
	}

	#[tokio::test]
	async fn reports_counts_in_metadata() {
		let h = Harness::new().await;
		let record = h.record("Ada", "Lovelace", false, None).await;
		let mut p = profile("Ada", "Lovelace");
		p.birthday = "1815-03-14".to_string();
		h.alumni
			.update_profile(&record.id, &p, None, test_now())
			.await
			.unwrap();

		let job = BirthdayEmailJob::new(Arc::new(h.service.clone()));
		let output = job.run(&context()).await.unwrap();

		let metadata = output.metadata.unwrap();
		assert_eq!(metadata["sent"], 1);
		assert_eq!(metadata["date"], "2026-03-14");
		assert_eq!(h.notifier.sent().await[0].recipient, "ada@example.org");
	}

	#[tokio::test]
	async fn cancelled_context_does_nothing() {
		let h = Harness::new().await;
		let ctx = context();
		ctx.cancellation_token.cancel();

		let job = BirthdayEmailJob::new(Arc::new(h.service.clone()));
		assert!(matches!(job.run(&ctx).await, Err(JobError::Cancelled)));
		assert!(h.notifier.sent().await.is_empty());
	}
}
