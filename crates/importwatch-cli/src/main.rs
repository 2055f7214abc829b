//! `importwatch` -- watch an import job until its status changes.
//!
//! # Environment variables
//!
//! | Variable                   | Flag             | Description                              |
//! |----------------------------|------------------|------------------------------------------|
//! | `IMPORTWATCH_PAGE_DATA`    | `--page-data`    | JSON file with the job page data         |
//! | `IMPORTWATCH_STATUS`       | `--status`       | Status the page was rendered with        |
//! | `IMPORTWATCH_JOB_ID`       | `--job-id`       | Job identifier                           |
//! | `IMPORTWATCH_STATUS_URL`   | `--status-url`   | Absolute status endpoint                 |
//! | `IMPORTWATCH_URL_TEMPLATE` | `--url-template` | Endpoint with a `{job_id}` placeholder   |
//! | `IMPORTWATCH_PAGE_URL`     | `--page-url`     | Page url the endpoint is derived from    |
//! | `RUST_LOG`                 |                  | Log filter (default `importwatch=info`)  |
//!
//! A `.env` file in the working directory is loaded first.

mod cli;
mod logging;
mod reloader;
mod settings;

use std::sync::Arc;

use anyhow::Result;
use importwatch_core::impls::HttpStatusSource;
use importwatch_core::ports::SystemClock;
use importwatch_core::{PollerState, StatusPoller};

use crate::reloader::ConsoleReloader;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let matches = cli::build_cli().get_matches();
    logging::init_logging(matches.get_flag("json-logs"), matches.get_flag("quiet"));

    let settings = Settings::from_matches(&matches)?;

    if settings.page.status.is_terminal() {
        tracing::info!(
            job_id = ?settings.page.job_id,
            status = %settings.page.status,
            "Job is not pending, nothing to watch"
        );
        return Ok(());
    }

    let url = settings
        .endpoint()?
        .resolve(settings.page.job_id.as_ref())?;
    let source = HttpStatusSource::new(url, settings.config.request_timeout)?;

    let mut poller = StatusPoller::new(
        &settings.page,
        Arc::new(source),
        Arc::new(SystemClock),
        Arc::new(ConsoleReloader::new(settings.json_output)),
        settings.config.clone(),
    );

    tokio::select! {
        state = poller.run() => log_final_state(&state),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping");
        }
    }

    let status = poller.status();
    tracing::debug!(
        polls = status.polls,
        failures = status.failures,
        scheduled_delay_ms = status.scheduled_delay_ms,
        "Poller finished"
    );

    Ok(())
}

fn log_final_state(state: &PollerState) {
    match state {
        PollerState::Reloaded { observed } => {
            tracing::info!(observed = %observed, "Job status changed")
        }
        PollerState::Stopped { reason } => {
            tracing::info!(reason = %reason, "Stopped watching")
        }
        PollerState::Idle | PollerState::Polling { .. } => {}
    }
}
