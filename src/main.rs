use approuter::Flow;
use approuter::console;
use approuter::core::config::{self, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "approuter", about = "Navigation router registry demo")]
struct Args {
    /// Scripted flow to run
    #[arg(short, long, default_value_t, value_enum)]
    flow: Flow,

    /// Delay between flow steps in milliseconds
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Log level for approuter.log
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Refuse duplicate router ids instead of overwriting
    #[arg(long)]
    strict: bool,

    /// Config file (defaults to ~/.approuter/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the navigation log as JSON to this path
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let (file_config, config_error) = match loaded {
        Ok(file_config) => (file_config, None),
        Err(e) => (config::AppRouterConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            log_level: args.log_level,
            step_delay_ms: args.step_delay_ms,
            strict_registration: args.strict,
        },
    );

    // Initialize file logger - writes to approuter.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Using default config: {}", e);
        eprintln!("warning: {e}, using defaults");
    }
    log::info!("AppRouter starting up with flow: {:?}", args.flow);
    log::debug!("Resolved config: {:?}", resolved);

    console::run(args.flow, resolved, args.export).await
}
