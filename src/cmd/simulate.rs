//! Drives a scripted alert sequence through the real service and reports the
//! observed event stream as JSON.

use std::sync::{Arc, Mutex};

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    clock::TokioClock,
    config::AppConfig,
    engine::{lifecycle::AlertLifecycleManager, timeouts::StaticTimeouts},
    models::{AlertEvent, AlertMetadata},
    service::{AlertService, ServiceError},
};

/// Errors the simulation can fail with.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    /// The service worker went away mid-simulation.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    /// The worker task panicked.
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// The report could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments for the `simulate` subcommand.
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Number of alerts to post; every third one carries a full-screen
    /// intent.
    #[arg(short, long, default_value_t = 3)]
    count: u32,
    /// Delay between posted alerts, in milliseconds.
    #[arg(short, long, default_value_t = 500)]
    interval_ms: u64,
    /// Configuration directory. Defaults to `configs`.
    #[arg(long)]
    config_dir: Option<String>,
}

#[derive(Serialize)]
struct Report {
    top_entry: Option<String>,
    snoozed_packages: Vec<String>,
    events: Vec<AlertEvent>,
}

/// Runs the simulation and prints the report to stdout.
pub async fn execute(args: SimulateArgs) -> Result<(), Error> {
    let config = AppConfig::new(args.config_dir.as_deref())?;

    let mut manager = AlertLifecycleManager::new(
        config.timing(),
        Arc::new(TokioClock),
        Arc::new(StaticTimeouts::new(config.accessibility_minimum_ms)),
    );
    manager.set_user(config.user);

    let cancel = CancellationToken::new();
    let (service, join) =
        AlertService::start(manager, config.command_channel_capacity as usize, cancel.clone());

    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    service
        .subscribe(Box::new(move |event| {
            tracing::info!(?event, "Event observed.");
            sink.lock().unwrap().push(event.clone());
        }))
        .await?;

    let mut packages = Vec::new();
    for i in 0..args.count {
        let package = format!("com.example.app{}", i);
        let metadata = AlertMetadata {
            package_name: package.clone(),
            user_id: config.user,
            has_full_screen_intent: i % 3 == 2,
            ongoing: false,
            category: Default::default(),
        };
        service.add(format!("alert-{}", i), metadata).await?;
        packages.push(package);
        tokio::time::sleep(std::time::Duration::from_millis(args.interval_ms)).await;
    }

    let top_entry = service.top_entry().await?.map(|entry| entry.key);

    service.snooze_all().await?;
    let mut snoozed_packages = Vec::new();
    for package in packages {
        if service.is_snoozed(package.clone()).await? {
            snoozed_packages.push(package);
        }
    }

    // Let the auto-dismiss window elapse so timed expiry shows up in the
    // report, then release anything pinned.
    tokio::time::sleep(config.auto_dismiss_ms + config.accessibility_minimum_ms).await;
    service.unpin_all(true).await?;
    let _ = service.top_entry().await?;

    cancel.cancel();
    match tokio::time::timeout(config.shutdown_timeout, join).await {
        Ok(result) => result?,
        Err(_) => tracing::warn!(
            "Worker did not stop within {:?}; reporting what was captured.",
            config.shutdown_timeout
        ),
    }

    let events = captured.lock().unwrap().clone();
    let report = Report { top_entry, snoozed_packages, events };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
