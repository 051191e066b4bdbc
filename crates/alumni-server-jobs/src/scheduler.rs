// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::context::{CancellationToken, JobContext};
use crate::error::{JobError, Result};
use crate::health::{determine_health_state, HealthState, JobHealthStatus, JobsHealthStatus};
use crate::history::RunHistory;
use crate::job::Job;
use crate::types::{JobRun, JobStatus, TriggerSource};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

const BASE_RETRY_DELAY_SECS: u64 = 1;
const MAX_RETRY_DELAY_SECS: u64 = 60;
const RETRY_FACTOR: f64 = 2.0;
const MAX_RETRIES: u32 = 3;

struct RegisteredJob {
	job: Arc<dyn Job>,
	interval: Duration,
	cancellation_token: CancellationToken,
}

pub struct JobScheduler {
	jobs: HashMap<String, RegisteredJob>,
	history: Arc<RunHistory>,
	shutdown_tx: broadcast::Sender<()>,
	handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for JobScheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl JobScheduler {
	pub fn new() -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		Self {
			jobs: HashMap::new(),
			history: Arc::new(RunHistory::new()),
			shutdown_tx,
			handles: Mutex::new(Vec::new()),
		}
	}

	pub fn register_periodic(&mut self, job: Arc<dyn Job>, interval: Duration) {
		let id = job.id().to_string();
		self.jobs.insert(
			id,
			RegisteredJob {
				job,
				interval,
				cancellation_token: CancellationToken::new(),
			},
		);
	}

	/// Spawn one loop per job. Each loop sleeps for its interval before the
	/// first run.
	#[instrument(skip(self))]
	pub async fn start(&self) {
		let mut handles = self.handles.lock().await;

		for (job_id, registered) in &self.jobs {
			let interval = registered.interval;
			let job = Arc::clone(&registered.job);
			let history = Arc::clone(&self.history);
			let mut shutdown_rx = self.shutdown_tx.subscribe();
			let cancellation_token = registered.cancellation_token.clone();
			let job_id = job_id.clone();

			let handle = tokio::spawn(async move {
				loop {
					tokio::select! {
						_ = tokio::time::sleep(interval) => {
							if cancellation_token.is_cancelled() {
								break;
							}
							let _ = run_job_with_retry(
								&job,
								&history,
								TriggerSource::Schedule,
								&cancellation_token,
							).await;
						}
						_ = shutdown_rx.recv() => {
							info!(job_id = %job_id, "Shutting down periodic job");
							break;
						}
					}
				}
			});

			handles.push(handle);
		}

		info!(job_count = handles.len(), "Job scheduler started");
	}

	/// Stop the loops and ask running jobs to stop at their next
	/// cancellation check.
	#[instrument(skip(self))]
	pub async fn shutdown(&self) {
		for registered in self.jobs.values() {
			registered.cancellation_token.cancel();
		}
		let _ = self.shutdown_tx.send(());

		let mut handles = self.handles.lock().await;
		for handle in handles.drain(..) {
			let _ = handle.await;
		}

		info!("Job scheduler shut down");
	}

	pub fn job_ids(&self) -> Vec<String> {
		self.jobs.keys().cloned().collect()
	}

	pub async fn job_status(&self, job_id: &str) -> Option<JobHealthStatus> {
		let registered = self.jobs.get(job_id)?;

		let last_run = self.history.get_last_run(job_id).await;
		let consecutive_failures = self.history.count_consecutive_failures(job_id).await;
		let status = determine_health_state(last_run.as_ref(), consecutive_failures);

		Some(JobHealthStatus {
			job_id: job_id.to_string(),
			name: registered.job.name().to_string(),
			status,
			last_run: last_run.map(Into::into),
			consecutive_failures,
		})
	}

	/// Worst state across all jobs, with per-job detail sorted by id.
	pub async fn health_status(&self) -> JobsHealthStatus {
		let mut ids = self.job_ids();
		ids.sort();

		let mut jobs = Vec::new();
		let mut worst_state = HealthState::Healthy;

		for job_id in &ids {
			if let Some(status) = self.job_status(job_id).await {
				if status.status == HealthState::Unhealthy {
					worst_state = HealthState::Unhealthy;
				} else if status.status == HealthState::Degraded && worst_state != HealthState::Unhealthy {
					worst_state = HealthState::Degraded;
				}
				jobs.push(status);
			}
		}

		JobsHealthStatus {
			status: worst_state,
			jobs,
		}
	}
}

async fn run_job_with_retry(
	job: &Arc<dyn Job>,
	history: &Arc<RunHistory>,
	triggered_by: TriggerSource,
	cancellation_token: &CancellationToken,
) -> Result<String> {
	let mut retry_count = 0u32;
	let run_id = uuid::Uuid::new_v4().to_string();
	let job_id = job.id().to_string();

	loop {
		let ctx = JobContext {
			run_id: run_id.clone(),
			triggered_by: if retry_count > 0 {
				TriggerSource::Retry
			} else {
				triggered_by
			},
			cancellation_token: cancellation_token.clone(),
		};

		if retry_count == 0 {
			let run = JobRun {
				id: run_id.clone(),
				job_id: job_id.clone(),
				status: JobStatus::Running,
				started_at: Utc::now(),
				completed_at: None,
				duration_ms: None,
				error_message: None,
				retry_count,
				triggered_by: ctx.triggered_by,
				metadata: None,
			};
			history.record_run_start(&run).await;
		} else {
			history.set_retry_count(&job_id, &run_id, retry_count).await;
		}

		match job.run(&ctx).await {
			Ok(output) => {
				history
					.record_run_complete(&job_id, &run_id, JobStatus::Succeeded, None, output.metadata)
					.await;
				info!(job_id = %job_id, run_id = %run_id, message = %output.message, "Job completed successfully");
				return Ok(run_id);
			}
			Err(JobError::Cancelled) => {
				history
					.record_run_complete(&job_id, &run_id, JobStatus::Cancelled, None, None)
					.await;
				info!(job_id = %job_id, run_id = %run_id, "Job cancelled");
				return Err(JobError::Cancelled);
			}
			Err(JobError::Failed { message, retryable }) => {
				if retryable && retry_count < MAX_RETRIES {
					retry_count += 1;
					let delay_secs = calculate_backoff_delay(retry_count);
					warn!(
						job_id = %job_id,
						run_id = %run_id,
						retry_count,
						delay_secs,
						error = %message,
						"Job failed, retrying"
					);
					tokio::time::sleep(Duration::from_secs(delay_secs)).await;
					continue;
				}

				history
					.record_run_complete(&job_id, &run_id, JobStatus::Failed, Some(message.clone()), None)
					.await;
				warn!(job_id = %job_id, run_id = %run_id, error = %message, "Job failed");
				return Err(JobError::Failed { message, retryable });
			}
			Err(e) => {
				let message = e.to_string();
				history
					.record_run_complete(&job_id, &run_id, JobStatus::Failed, Some(message.clone()), None)
					.await;
				warn!(job_id = %job_id, run_id = %run_id, error = %message, "Job failed with error");
				return Err(e);
			}
		}
	}
}

pub(crate) fn calculate_backoff_delay(retry_count: u32) -> u64 {
	let delay = BASE_RETRY_DELAY_SECS as f64 * RETRY_FACTOR.powi(retry_count as i32 - 1);
	(delay as u64).min(MAX_RETRY_DELAY_SECS)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::JobOutput;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicU32, Ordering};

	struct MockJob {
		id: String,
		calls: AtomicU32,
		fail_times: u32,
		retryable: bool,
	}

	impl MockJob {
		fn new(id: &str) -> Self {
			Self::failing(id, 0, false)
		}

		fn failing(id: &str, fail_times: u32, retryable: bool) -> Self {
			Self {
				id: id.to_string(),
				calls: AtomicU32::new(0),
				fail_times,
				retryable,
			}
		}
	}

	#[async_trait]
	impl Job for MockJob {
		fn id(&self) -> &str {
			&self.id
		}

		fn name(&self) -> &str {
			"Mock job"
		}

		fn description(&self) -> &str {
			"A mock job for testing"
		}

		async fn run(&self, ctx: &JobContext) -> std::result::Result<JobOutput, JobError> {
			ctx.check_cancelled()?;
			let call = self.calls.fetch_add(1, Ordering::SeqCst);
			if call < self.fail_times {
				return Err(JobError::Failed {
					message: format!("failure {call}"),
					retryable: self.retryable,
				});
			}
			Ok(JobOutput {
				message: "Mock job completed".to_string(),
				metadata: None,
			})
		}
	}

	mod backoff {
		use super::*;

		#[test]
		fn doubles_from_base() {
			assert_eq!(calculate_backoff_delay(1), BASE_RETRY_DELAY_SECS);
			assert_eq!(calculate_backoff_delay(2), 2);
			assert_eq!(calculate_backoff_delay(3), 4);
		}

		#[test]
		fn caps_at_max() {
			assert_eq!(calculate_backoff_delay(10), MAX_RETRY_DELAY_SECS);
			assert_eq!(calculate_backoff_delay(100), MAX_RETRY_DELAY_SECS);
		}
	}

	async fn run_once(scheduler: &JobScheduler, job: Arc<dyn Job>) -> Result<String> {
		run_job_with_retry(
			&job,
			&scheduler.history,
			TriggerSource::Schedule,
			&CancellationToken::new(),
		)
		.await
	}

	fn scheduler_with(job: Arc<MockJob>) -> JobScheduler {
		let mut scheduler = JobScheduler::new();
		scheduler.register_periodic(job, Duration::from_secs(60));
		scheduler
	}

	mod registration {
		use super::*;

		#[tokio::test]
		async fn registered_jobs_are_listed() {
			let mut scheduler = JobScheduler::new();
			scheduler.register_periodic(Arc::new(MockJob::new("reset")), Duration::from_secs(60));
			scheduler.register_periodic(Arc::new(MockJob::new("birthday")), Duration::from_secs(60));

			let mut ids = scheduler.job_ids();
			ids.sort();
			assert_eq!(ids, vec!["birthday".to_string(), "reset".to_string()]);
		}

		#[tokio::test]
		async fn unknown_job_has_no_status() {
			let scheduler = JobScheduler::new();
			assert!(scheduler.job_status("nope").await.is_none());
		}
	}

	mod runs {
		use super::*;

		#[tokio::test]
		async fn successful_run_is_healthy() {
			let job = Arc::new(MockJob::new("job"));
			let scheduler = scheduler_with(job.clone());

			run_once(&scheduler, job).await.unwrap();

			let status = scheduler.job_status("job").await.unwrap();
			assert_eq!(status.status, HealthState::Healthy);
			let last = status.last_run.unwrap();
			assert_eq!(last.status, JobStatus::Succeeded);
		}

		#[tokio::test(start_paused = true)]
		async fn retryable_failures_are_retried() {
			let job = Arc::new(MockJob::failing("job", 2, true));
			let scheduler = scheduler_with(job.clone());

			run_once(&scheduler, job.clone()).await.unwrap();
			assert_eq!(job.calls.load(Ordering::SeqCst), 3);
			assert_eq!(
				scheduler.history.get_last_run("job").await.unwrap().retry_count,
				2
			);
		}

		#[tokio::test]
		async fn fatal_failure_degrades_health() {
			let job = Arc::new(MockJob::failing("job", 1, false));
			let scheduler = scheduler_with(job.clone());

			let err = run_once(&scheduler, job).await.unwrap_err();
			assert!(matches!(err, JobError::Failed { retryable: false, .. }));

			let health = scheduler.health_status().await;
			assert_eq!(health.status, HealthState::Degraded);
			assert_eq!(health.jobs[0].consecutive_failures, 1);
		}

		#[tokio::test]
		async fn cancelled_job_reports_cancelled() {
			let job: Arc<dyn Job> = Arc::new(MockJob::new("job"));
			let scheduler = JobScheduler::new();
			let token = CancellationToken::new();
			token.cancel();

			let err = run_job_with_retry(&job, &scheduler.history, TriggerSource::Schedule, &token)
				.await
				.unwrap_err();
			assert!(matches!(err, JobError::Cancelled));
			let last = scheduler.history.get_last_run("job").await.unwrap();
			assert_eq!(last.status, JobStatus::Cancelled);
		}

		#[tokio::test(start_paused = true)]
		async fn periodic_job_runs_until_shutdown() {
			let job = Arc::new(MockJob::new("tick"));
			let mut scheduler = JobScheduler::new();
			scheduler.register_periodic(job.clone(), Duration::from_secs(10));

			scheduler.start().await;
			tokio::time::sleep(Duration::from_secs(35)).await;
			scheduler.shutdown().await;

			assert_eq!(job.calls.load(Ordering::SeqCst), 3);
		}
	}
}
