//! Daily recalculation over a store snapshot.
//!
//! Usage:
//!   recalc <snapshot.json> [YYYY-MM-DD]
//!
//! Loads every environment of the snapshot, runs the daily pass (balance
//! refresh, then goal evaluation), projects each balance over the next 12
//! months and prints the reports with the updated snapshot as JSON.

use std::{fs, io};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fincontrol_core::EnvironmentService;
use fincontrol_core::projection::{PeriodUnit, ProjectedBalance};
use fincontrol_core::service::DailyReport;
use fincontrol_core::store::{InMemoryStore, StoreSnapshot};
use fincontrol_shared::types::EnvironmentId;
use fincontrol_shared::{AppConfig, AppError};

const PROJECTION_MONTHS: u32 = 12;

#[derive(Serialize)]
struct EnvironmentOutput {
    report: DailyReport,
    projection: Vec<ProjectedBalance>,
}

#[derive(Serialize)]
struct FailedEnvironment {
    environment_id: EnvironmentId,
    error_code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct Output {
    today: NaiveDate,
    environments: Vec<EnvironmentOutput>,
    failures: Vec<FailedEnvironment>,
    snapshot: StoreSnapshot,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: recalc <snapshot.json> [YYYY-MM-DD]")?;
    let today = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {raw}"))?,
        None => chrono::Utc::now().date_naive(),
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("cannot read {path}"))?;
    let snapshot: StoreSnapshot =
        serde_json::from_str(&raw).with_context(|| format!("invalid snapshot {path}"))?;
    let ids: Vec<EnvironmentId> = snapshot
        .environments
        .iter()
        .filter(|e| !e.is_deleted)
        .map(|e| e.id)
        .collect();
    info!(environments = ids.len(), %today, "Loaded snapshot");

    let store = InMemoryStore::from_snapshot(snapshot);
    let service = EnvironmentService::new(&store, config.engine);

    let mut environments = Vec::new();
    let mut failures = Vec::new();
    for (id, result) in service.run_daily_batch(&ids, today) {
        let outcome = result.and_then(|report| {
            let projection =
                service.project_balance(id, PROJECTION_MONTHS, PeriodUnit::Month, today)?;
            Ok(EnvironmentOutput { report, projection })
        });
        match outcome {
            Ok(output) => environments.push(output),
            Err(err) => {
                let err = AppError::from(err);
                warn!(environment_id = %id, error = %err, "Environment failed");
                failures.push(FailedEnvironment {
                    environment_id: id,
                    error_code: err.error_code(),
                    message: err.to_string(),
                });
            }
        }
    }

    let output = Output {
        today,
        environments,
        failures,
        snapshot: store.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    info!(writes = store.writes().total(), "Recalculation complete");

    Ok(())
}
