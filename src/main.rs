mod billing;
mod config;
mod demo;
mod devex;
mod engine;
mod metrics;
mod models;
mod server;
mod storage;
mod types;
mod validator;

use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Config;
use crate::devex::DevexSnapshot;
use crate::engine::{CsvSource, IngestionCoordinator};
use crate::metrics::MonthlyMetrics;
use crate::storage::{MemoryStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: Two modes only, so plain argument matching is enough here.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: profit-radar serve [log_level:optional]");
        eprintln!("       profit-radar [input].csv [log_level:optional] > [report].csv");
        eprintln!("Log level: off, error, warn, info, debug or trace; falls back to PROFIT_RADAR_LOG, then error");
        exit(1);
    }

    init_tracing(log_level(args.get(2).cloned().or_else(|| std::env::var("PROFIT_RADAR_LOG").ok())));

    let config = Config::load()?;
    let storage = Arc::new(MemoryStorage::with_devex_rate(DevexSnapshot::initial(config.devex_rate, Utc::now())));

    if args[1] == "serve" {
        return server::serve(config, storage).await;
    }

    let timer = Instant::now();
    let rows = CsvSource::new().read(&args[1]).await?;

    let coordinator = IngestionCoordinator::new(storage.clone(), config.marketplace_cut);
    let summary = coordinator.process(config.local_user, &args[1], &rows)?;

    info!(
        "Processed {} rows in {:?}: {} accepted, {} rejected",
        rows.len(),
        timer.elapsed(),
        summary.processed_count,
        summary.error_count
    );

    let transactions = storage.transactions_for_user(config.local_user);
    write_results_to_stdout(&metrics::monthly_rollup(&transactions))?;

    Ok(())
}

fn log_level(requested: Option<String>) -> LevelFilter {
    let Some(requested) = requested else {
        return LevelFilter::ERROR;
    };

    requested.trim().parse().unwrap_or_else(|_| {
        eprintln!("Unknown log level '{requested}', logging errors only");
        LevelFilter::ERROR
    })
}

fn init_tracing(level: LevelFilter) {
    //NOTE: stdout carries the monthly report, every log line has to go to stderr.
    let stderr_layer = fmt::layer()
        .with_writer(stderr)
        .with_target(false)
        .with_filter(level);

    tracing_subscriber::registry().with(stderr_layer).init();
}

fn write_results_to_stdout(months: &[MonthlyMetrics]) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "month,transactions,gross_robux,marketplace_cut,ad_spend,net_robux,net_usd,avg_devex_rate")?;

    for month in months {
        let totals = &month.totals;

        writeln!(
            output,
            "{},{},{},{},{},{},{},{}",
            month.month.format("%Y-%m"),
            totals.transactions,
            totals.gross_robux,
            totals.marketplace_cut,
            totals.ad_spend,
            totals.net_robux,
            totals.net_usd,
            totals.avg_devex_rate
        )?;
    }

    output.flush()?;

    Ok(())
}
