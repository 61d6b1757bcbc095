use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Serialize;
use skytrack_core::config::{AppConfig, LogFormat};
use skytrack_service::Tracker;
use std::path::{Path, PathBuf};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// SkyTrack - ADS-B aircraft tracker with military, proximity and emergency alerts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "SKYTRACK_CONFIG", default_value = "config/skytrack.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feed and send notifications until interrupted
    Run,
    /// Check that the configured feed answers with aircraft data
    Check,
    /// Show one aircraft from a fresh poll
    Aircraft {
        /// ICAO hex code
        hex: String,
    },
    /// List military aircraft in a fresh poll
    Military,
    /// Download the military registry now
    ReloadDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config)?;

    if config.metrics.enabled {
        PrometheusBuilder::new()
            .with_http_listener(config.metrics.listen)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!(listen = %config.metrics.listen, "Prometheus metrics exporter started");
    }

    if !matches!(cli.command, Command::Run) {
        // One-shot commands only inspect; they never notify.
        config.notifications.device = None;
    } else if config.notifications.target_device().is_some() && config.notifications.webhook_url.is_none() {
        warn!("No webhook_url configured, notifications will only be logged");
    }

    let tracker = Tracker::new(config).context("Failed to build tracker")?;

    match cli.command {
        Command::Run => run(tracker).await,
        Command::Check => {
            let probe = tracker.check_feed().await.context("Feed check failed")?;
            print_json(&probe)
        }
        Command::Aircraft { hex } => {
            tracker.refresh_military_database().await;
            tracker.refresh_now().await.context("Feed poll failed")?;
            print_json(&tracker.aircraft_details(&hex))
        }
        Command::Military => {
            tracker.refresh_military_database().await;
            tracker.refresh_now().await.context("Feed poll failed")?;
            print_json(&tracker.military_report())
        }
        Command::ReloadDb => print_json(&tracker.reload_military_database().await),
    }
}

async fn run(tracker: Tracker) -> Result<()> {
    tracker.start();
    info!("SkyTrack running, press Ctrl-C to stop");

    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Received shutdown signal, stopping tracker...");
    tracker.shutdown().await;
    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::from_config_builder(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))
    } else {
        // Tracing is not up yet.
        eprintln!("Config file {:?} not found, using defaults", path);
        Ok(AppConfig::default())
    }
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let level = config.logging.parse_level()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
