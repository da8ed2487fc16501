//! Command-line entry point for the warp menu synthesizer.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use warp_menu::config::{AggregationConfig, Settings, WatchMode};
use warp_menu::{directory_synthesizer, directory_watcher, init_logging};

/// Command-line options.
#[derive(Parser)]
#[command(name = "warp-menu", version)]
struct Cli {
    /// Directory holding one `<name>.yaml` file per resource
    #[arg(long, default_value = ".")]
    store: PathBuf,
    /// Namespace of the watched resources (overrides WATCH_NAMESPACE)
    #[arg(long)]
    namespace: Option<String>,
    /// Output path of the menu file (overrides WARP_MENU_PATH)
    #[arg(long)]
    menu_path: Option<PathBuf>,
    /// Resource event filter: identity or content (overrides WARP_WATCH_MODE)
    #[arg(long, value_parser = |value: &str| value.parse::<WatchMode>())]
    watch_mode: Option<WatchMode>,
    /// Directory poll interval in milliseconds (overrides WARP_POLL_INTERVAL_MS)
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single synthesis pass and exit
    Once,
    /// Synthesize, then re-synthesize on every accepted change until Ctrl-C
    Watch,
    /// Validate an aggregation config file and print it as JSON
    Check {
        /// Path to the YAML aggregation config
        path: PathBuf,
    },
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let namespace = self.namespace.clone();
        let mut settings = Settings::from_lookup(|key| match key {
            "WATCH_NAMESPACE" if namespace.is_some() => namespace.clone(),
            _ => std::env::var(key).ok(),
        })
        .context("failed to read settings")?;
        if let Some(path) = &self.menu_path {
            settings.menu_path = path.clone();
        }
        if let Some(mode) = self.watch_mode {
            settings.watch_mode = mode;
        }
        if let Some(millis) = self.poll_interval_ms {
            if millis == 0 {
                bail!("--poll-interval-ms must be greater than zero");
            }
            settings.poll_interval = Duration::from_millis(millis);
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Command::Check { path } => {
            let config = AggregationConfig::load_from_path(path)
                .with_context(|| format!("invalid config {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Once => {
            let synthesizer = directory_synthesizer(&cli.store, cli.settings()?)
                .context("failed to open resource store")?;
            let menu = synthesizer.run_once().await.context("synthesis failed")?;
            info!(
                "menu written (categories={}, entries={})",
                menu.categories.len(),
                menu.entry_count()
            );
        }
        Command::Watch => {
            let watcher = directory_watcher(&cli.store, cli.settings()?)
                .context("failed to open resource store")?;
            let (shutdown, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    error!("failed to listen for interrupt: {err}");
                    std::future::pending::<()>().await;
                }
                info!("interrupt received, shutting down");
                let _ = shutdown.send(true);
            });
            watcher.run(shutdown_rx).await.context("watch failed")?;
        }
    }
    Ok(())
}
