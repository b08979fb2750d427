//! Ableton Presence - Discord rich presence for Ableton Live sessions

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ableton_presence=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Ableton Presence v{}", env!("CARGO_PKG_VERSION"));

    // Run CLI
    ableton_presence::cli::run()?;

    Ok(())
}
