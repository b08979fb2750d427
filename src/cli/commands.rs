//! CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use crate::config::{AppConfig, SharedConfig};
use crate::core::{wait_for_signal, Poller, Shutdown};
use crate::monitor::{AppleScriptTitleProbe, PgrepProbe, SessionTracker};
use crate::presence::{DiscordIpc, PresencePublisher};

use super::interactive::{run_command_loop, HELP};

#[derive(Parser, Debug)]
#[command(name = "ableton-presence")]
#[command(about = "Show your Ableton Live session as Discord rich presence", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/ableton-presence/config.yml)
    #[arg(long)]
    pub config: Option<String>,

    /// Seconds between presence updates
    #[arg(long)]
    pub interval: Option<u64>,

    /// Initial custom status
    #[arg(long)]
    pub status: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(interval) = self.interval {
            anyhow::ensure!(interval > 0, "--interval must be greater than zero");
            config.poll_interval_secs = interval;
        }
        if let Some(status) = self.status.as_deref().map(str::trim) {
            anyhow::ensure!(!status.is_empty(), "--status must not be empty");
            config.custom_status = status.to_string();
        }

        Ok(config)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.app_config()?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = rt.block_on(serve(config));

    // Stdin reads park a blocking thread that never returns on its own
    rt.shutdown_background();
    result
}

async fn serve(config: AppConfig) -> Result<()> {
    println!("Starting Ableton Live Discord Rich Presence...");

    let mut publisher = PresencePublisher::new(DiscordIpc::new(), config.app_id.clone());
    publisher
        .connect()
        .await
        .context("Failed to connect to Discord")?;

    println!("Connected to Discord!");
    println!("{}", HELP);

    let shared = SharedConfig::new(config.clone());
    let shutdown = Shutdown::new();

    let poller = Poller::new(
        shared.clone(),
        Box::new(PgrepProbe::new(
            config.process_pattern.clone(),
            config.probe_timeout(),
        )),
        Box::new(AppleScriptTitleProbe::new(
            &config.application_name,
            &config.process_pattern,
            config.probe_timeout(),
        )),
        SessionTracker::new(config.idle_reset_threshold()),
        publisher,
        config.poll_interval(),
    );

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Received termination signal");
        signal_shutdown.trigger();
    });

    let input_shutdown = shutdown.clone();
    let input_config = shared.clone();
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = run_command_loop(stdin, input_config, input_shutdown).await {
            tracing::warn!("Command input failed: {}", e);
        }
    });

    poller.run(shutdown.subscribe()).await;
    Ok(())
}
