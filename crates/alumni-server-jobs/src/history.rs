// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory record of job runs.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::types::{JobRun, JobStatus};

/// Runs kept per job; older runs are dropped.
const MAX_RUNS_PER_JOB: usize = 50;

#[derive(Default)]
pub struct RunHistory {
	runs: Mutex<HashMap<String, Vec<JobRun>>>,
}

impl RunHistory {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn record_run_start(&self, run: &JobRun) {
		let mut runs = self.runs.lock().await;
		let entries = runs.entry(run.job_id.clone()).or_default();
		entries.push(run.clone());
		if entries.len() > MAX_RUNS_PER_JOB {
			let excess = entries.len() - MAX_RUNS_PER_JOB;
			entries.drain(..excess);
		}
	}

	pub async fn record_run_complete(
		&self,
		job_id: &str,
		run_id: &str,
		status: JobStatus,
		error_message: Option<String>,
		metadata: Option<serde_json::Value>,
	) {
		let mut runs = self.runs.lock().await;
		let Some(run) = runs
			.get_mut(job_id)
			.and_then(|entries| entries.iter_mut().rev().find(|r| r.id == run_id))
		else {
			return;
		};

		let now = Utc::now();
		run.status = status;
		run.completed_at = Some(now);
		run.duration_ms = Some((now - run.started_at).num_milliseconds());
		run.error_message = error_message;
		run.metadata = metadata;
	}

	pub async fn set_retry_count(&self, job_id: &str, run_id: &str, retry_count: u32) {
		let mut runs = self.runs.lock().await;
		if let Some(run) = runs
			.get_mut(job_id)
			.and_then(|entries| entries.iter_mut().rev().find(|r| r.id == run_id))
		{
			run.retry_count = retry_count;
		}
	}

	pub async fn get_last_run(&self, job_id: &str) -> Option<JobRun> {
		self.runs.lock().await.get(job_id)?.last().cloned()
	}

	/// Failed runs since the most recent non-failed one.
	pub async fn count_consecutive_failures(&self, job_id: &str) -> u32 {
		let runs = self.runs.lock().await;
		runs
			.get(job_id)
			.map(|entries| {
				entries
					.iter()
					.rev()
					.take_while(|r| r.status == JobStatus::Failed)
					.count() as u32
			})
			.unwrap_or(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::TriggerSource;

	fn run(id: &str) -> JobRun {
		JobRun {
			id: id.to_string(),
			job_id: "job".to_string(),
			status: JobStatus::Running,
			started_at: Utc::now(),
			completed_at: None,
			duration_ms: None,
			error_message: None,
			retry_count: 0,
			triggered_by: TriggerSource::Schedule,
			metadata: None,
		}
	}

	#[tokio::test]
	async fn completes_the_matching_run() {
		let history = RunHistory::new();
		history.record_run_start(&run("r1")).await;
		history
			.record_run_complete("job", "r1", JobStatus::Succeeded, None, None)
			.await;

		let last = history.get_last_run("job").await.unwrap();
		assert_eq!(last.status, JobStatus::Succeeded);
		assert!(last.completed_at.is_some());
	}

	#[tokio::test]
	async fn counts_trailing_failures_only() {
		let history = RunHistory::new();
		for (id, status) in [
			("r1", JobStatus::Failed),
			("r2", JobStatus::Succeeded),
			("r3", JobStatus::Failed),
			("r4", JobStatus::Failed),
		] {
			history.record_run_start(&run(id)).await;
			history.record_run_complete("job", id, status, None, None).await;
		}
		assert_eq!(history.count_consecutive_failures("job").await, 2);
		assert_eq!(history.count_consecutive_failures("other").await, 0);
	}

	#[tokio::test]
	async fn keeps_a_bounded_number_of_runs() {
		let history = RunHistory::new();
		for i in 0..(MAX_RUNS_PER_JOB + 10) {
			history.record_run_start(&run(&format!("r{i}"))).await;
		}
		let runs = history.runs.lock().await;
		assert_eq!(runs.get("job").map(Vec::len), Some(MAX_RUNS_PER_JOB));
	}
}
