use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sleep_predictor::config::Overrides;
use sleep_predictor::utils::input::TerminalConsole;
use sleep_predictor::{App, AppConfig, Artifacts};

/// Predict sleep disorders from lifestyle and health data
#[derive(Parser)]
#[command(name = "sleep-predictor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Classifier artifact (.bin or .json)
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Label encoders artifact (.bin or .json)
    #[arg(long, value_name = "FILE")]
    encoders: Option<PathBuf>,

    /// Feature list artifact (.bin or .json)
    #[arg(long, value_name = "FILE")]
    features: Option<PathBuf>,

    /// Directory receiving generated reports
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let overrides = Overrides {
        model: cli.model,
        encoders: cli.encoders,
        features: cli.features,
        report_dir: cli.report_dir,
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)
        .context("failed loading configuration")?;

    std::fs::create_dir_all(&config.report_dir).with_context(|| {
        format!("failed creating report dir {}", config.report_dir.display())
    })?;
    let artifacts = Artifacts::load(&config.artifacts).context("failed loading artifacts")?;

    let credentials = config.credentials();
    info!(
        username = credentials.username(),
        report_dir = %config.report_dir.display(),
        "sleep-predictor started"
    );

    let app = App::new(artifacts, credentials, config.report_dir);
    let mut console = TerminalConsole::new();
    app.run(&mut console)?;

    info!("sleep-predictor stopped");
    Ok(())
}
