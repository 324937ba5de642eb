use anyhow::{Context, Result};
use cfginv::aws::{AwsSettings, ConfigServiceRegistry};
use cfginv::config::Config;
use cfginv::output::{OutputFormat, RecordPrinter};
use cfginv::pipeline::{Pipeline, PipelineConfig, RunReport};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Dump AWS Config configuration items for every discovered resource
#[derive(Parser, Debug)]
#[command(name = "cfginv", version, about, long_about = None)]
struct Args {
    /// Comma separated list of resource types (default: built-in catalog)
    #[arg(short, long, alias = "resourceTypes", value_delimiter = ',')]
    resource_types: Vec<String>,

    /// Number of concurrent workers
    #[arg(short, long, alias = "workerCount", value_parser = clap::value_parser!(u16).range(1..))]
    worker_count: Option<u16>,

    /// Restrict the built-in catalog to these services (e.g. EC2,S3)
    #[arg(short, long, value_delimiter = ',')]
    service: Vec<String>,

    /// AWS region to query
    #[arg(long)]
    region: Option<String>,

    /// AWS shared-config profile
    #[arg(long)]
    profile: Option<String>,

    /// Include resources recorded as deleted
    #[arg(long)]
    include_deleted: bool,

    /// Record output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level for diagnostics (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write diagnostics to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Exit with status 2 if any listing or batch fetch failed
    #[arg(long)]
    fail_on_error: bool,

    /// Print the resource types that would be queried and exit
    #[arg(long)]
    list_types: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn setup_logging(level: LogLevel, log_file: Option<&Path>) -> Result<WorkerGuard> {
    let (writer, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let _log_guard = setup_logging(args.log_level, args.log_file.as_deref())?;
    let config = Config::load();

    let resource_types = config.effective_resource_types(&args.resource_types, &args.service);
    if args.list_types {
        for resource_type in &resource_types {
            println!("{}", resource_type);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let worker_count = config.effective_worker_count(args.worker_count.map(usize::from));
    let pipeline_config = PipelineConfig::new(resource_types, worker_count)?;

    let settings = AwsSettings {
        region: config.effective_region(args.region.as_deref()),
        profile: config.effective_profile(args.profile.as_deref()),
    };
    let registry = ConfigServiceRegistry::connect(&settings)
        .await
        .context("Failed to create AWS Config client")?
        .include_deleted(args.include_deleted);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let pipeline = Pipeline::new(Arc::new(registry), Arc::new(RecordPrinter::new(args.output)));
    let report = pipeline.run(&pipeline_config, cancel).await;
    log_summary(&report);

    if args.fail_on_error && report.has_failures() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupted, cancelling outstanding requests");
        cancel.cancel();
    }
}

fn log_summary(report: &RunReport) {
    tracing::info!(
        "Summary: {} resource types, {} records, {} fetch calls, {} empty types",
        report.resource_types,
        report.records_delivered,
        report.fetch_calls,
        report.empty_types + report.no_valid_types
    );

    if report.has_failures() || report.handler_failures > 0 {
        tracing::warn!(
            "Failures: {} listings, {} batches, {} handler calls, {} unprocessed keys",
            report.listing_failures,
            report.batch_failures,
            report.handler_failures,
            report.unprocessed_keys
        );
    }
    if report.all_types_failed() {
        tracing::error!("Every resource type failed to list");
    }
    if report.cancelled_types > 0 {
        tracing::warn!("{} resource types cancelled", report.cancelled_types);
    }
}
