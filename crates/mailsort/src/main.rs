//! mailsort - files every inbox message into a per-recipient folder.
//!
//! Configuration comes from the environment (a `.env` file is honoured).
//! Exit status is 0 when every message was filed or skipped, 1 when the run
//! could not complete, and 2 when some messages could not be moved.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use mailsort_core::{Config, ImapConnector, RouteOutcome, RunReport};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "mailsort=info,mailsort_core=info,mailsort_imap=warn";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(report) => {
            summarize(&report);
            if report.has_failures() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<RunReport> {
    let config = Config::from_env().context("invalid configuration")?;
    info!(
        host = %config.imap.host,
        port = config.imap.port,
        user = %config.username,
        root = %config.routing.root,
        container = %config.routing.container,
        "starting mailsort"
    );

    let connector = ImapConnector::new(&config);
    let report = mailsort_core::run(&connector, &config.routing)
        .await
        .with_context(|| format!("run against {} failed", config.imap.host))?;
    Ok(report)
}

fn summarize(report: &RunReport) {
    info!(
        messages = report.total(),
        moved = report.moved(),
        skipped = report.skipped(),
        failed = report.failed(),
        folders_created = report.folders_created(),
        "run complete"
    );

    for outcome in report.failures() {
        if let RouteOutcome::Failed {
            uid,
            folder,
            stage,
            error,
        } = outcome
        {
            warn!(%uid, %folder, %stage, %error, "message not filed");
        }
    }
}
