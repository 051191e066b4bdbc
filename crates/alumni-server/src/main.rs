// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Alumni directory server binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alumni_server::jobs::{BirthdayEmailJob, PasswordResetCleanupJob};
use alumni_server::{build_notifier, build_service, create_app_state, create_router};
use alumni_server_auth::SystemClock;
use alumni_server_config::{LogFormat, ServerConfig};
use alumni_server_jobs::JobScheduler;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Alumni server - HTTP server for the alumni directory.
#[derive(Parser, Debug)]
#[command(name = "alumni-server", about = "Alumni directory server", version)]
struct Args {
	/// Config file to load instead of /etc/alumni/server.toml
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
	/// Create an approved administrator account and exit
	CreateAdmin {
		#[arg(long)]
		email: String,
		#[arg(long, env = "ALUMNI_ADMIN_PASSWORD")]
		password: String,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!(
			"alumni-server version: {}\nPlatform:              {}-{}",
			env!("CARGO_PKG_VERSION"),
			std::env::consts::ARCH,
			std::env::consts::OS,
		);
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => alumni_server_config::load_config_with_file(path)?,
		None => alumni_server_config::load_config()?,
	};
	init_tracing(&config);

	let pool = alumni_server_db::create_pool(&config.database.url).await?;
	alumni_server_db::run_migrations(&pool).await?;

	if let Some(Command::CreateAdmin { email, password }) = args.command {
		let service = build_service(
			pool,
			&config,
			build_notifier(&config)?,
			Arc::new(SystemClock),
		);
		let account = service.create_admin(&email, &password).await?;
		println!("created administrator {} ({})", account.email, account.id);
		return Ok(());
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting alumni-server"
	);

	let mut state = create_app_state(pool, &config)?;

	let mut scheduler = JobScheduler::new();
	scheduler.register_periodic(
		Arc::new(PasswordResetCleanupJob::new(Arc::clone(&state.service))),
		Duration::from_secs(config.jobs.reset_cleanup_interval_secs),
	);
	if config.jobs.birthday_emails_enabled {
		scheduler.register_periodic(
			Arc::new(BirthdayEmailJob::new(Arc::clone(&state.service))),
			Duration::from_secs(config.jobs.birthday_interval_secs),
		);
		tracing::info!("Registered birthday e-mail background job");
	}

	let scheduler = Arc::new(scheduler);
	state.scheduler = Some(Arc::clone(&scheduler));
	scheduler.start().await;

	let app = create_router(state);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
			scheduler.shutdown().await;
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}

fn init_tracing(config: &ServerConfig) {
	let fmt_layer = match config.logging.format {
		LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
		LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
	};

	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(fmt_layer)
		.init();
}
