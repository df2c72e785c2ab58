#![forbid(unsafe_code)]

mod app;
mod event;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use app::{App, AppOptions, TransportConfig};

#[derive(Parser, Debug)]
#[command(
    name = "panelkit",
    version,
    about = "Headless host for the movable overlay panels"
)]
struct Cli {
    /// Settings file (TOML); missing means defaults
    #[arg(long, default_value = "panelkit.toml", value_name = "PATH")]
    settings: PathBuf,

    /// Persisted panel geometry and ui scale
    #[arg(long, default_value = "panelkit_store.toml", value_name = "PATH")]
    store: PathBuf,

    /// Input script (TOML); the built-in demo runs when omitted
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long, default_value = "600", value_name = "N")]
    ticks: u64,

    /// Wall-clock length of one tick
    #[arg(long = "tick-ms", default_value = "16", value_name = "MS")]
    tick_ms: u64,

    /// Also write debug logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Reload the settings file when it changes
    #[arg(long)]
    watch: bool,

    /// Simulated transport latency
    #[arg(long = "latency-ms", default_value = "40", value_name = "MS")]
    latency_ms: u64,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::try_init()?;
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_file.as_ref()) {
        eprintln!("logging disabled: {}", e);
    }

    let options = AppOptions {
        settings_path: cli.settings,
        store_path: cli.store,
        script_path: cli.script,
        max_ticks: cli.ticks,
        tick_interval: Duration::from_millis(cli.tick_ms),
        watch_settings: cli.watch,
        transport: TransportConfig {
            latency: Duration::from_millis(cli.latency_ms),
            ..TransportConfig::default()
        },
    };
    let app = match App::new(options) {
        Ok(app) => app,
        Err(e) => {
            log::error!("startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match app.run() {
        Some(_) => ExitCode::SUCCESS,
        None => ExitCode::FAILURE,
    }
}
