//! CLI batch job pulling tweets for a keyword and landing them as CSV in S3
use std::env;
use std::fs::{self, File};

use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use structopt::StructOpt;

mod cli;
mod config;
mod pipeline;
mod storage_client;
mod twitter_client;
mod twitter_object;

use cli::CommandLineArgs;
use config::{RunConfig, Settings};
use storage_client::S3StorageClient;
use twitter_client::{TwitterClient, TwitterClientTrait};

const LOG_DIR: &str = "logs";

/// Entrypoint Function
///
/// It will use the following environment variable
/// * `PIPELINE_LOG_LEVEL` Log level setting e.g. `PIPELINE_LOG_LEVEL=debug`
fn main() -> Result<()> {
    let args = CommandLineArgs::from_args();
    let timestamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    init_logging(&timestamp)?;

    let raw_args: Vec<String> = env::args().skip(1).collect();
    info!("Arguments passed to command line: {:?}", raw_args);
    info!("Parsed arguments:");
    info!("\tsearch: {}", args.search);
    info!("\tcount: {}", args.count);
    info!("\tenv: {}", args.env);

    let settings = Settings::load(args.env)?;
    let run_config = RunConfig::new(&args, &timestamp)?;

    info!("Creating twitter session");
    let tw_client = TwitterClient::new(settings.twitter);
    let storage_client = S3StorageClient::new(&settings.aws)?;

    info!("Calling ingestion pipeline");
    let outcome = pipeline::run(&tw_client, &storage_client, &run_config)?;
    if !outcome.succeeded {
        // Upload failure is reported through the log; the batch job still exits 0
        warn!(
            "Run finished without a successful upload of {}",
            outcome.object_key
        );
    }
    Ok(())
}

/// Construct the run-scoped logger: terminal output plus one append-only
/// log file named after the run timestamp
fn init_logging(timestamp: &str) -> Result<()> {
    let level = env::var("PIPELINE_LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    fs::create_dir_all(LOG_DIR)?;
    let log_file = File::create(format!(
        "{}/twitter_datapipeline_{}.log",
        LOG_DIR, timestamp
    ))?;

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    CombinedLogger::init(vec![
        TermLogger::new(
            level,
            log_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, log_config, log_file),
    ])?;
    Ok(())
}
