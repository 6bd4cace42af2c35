//! TubeQA entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubeqa::cli::{Cli, Output};
use tubeqa::config::Settings;
use tubeqa::server::run_server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(std::path::Path::new(path))?,
        None => Settings::load()?,
    };
    cli.apply(&mut settings);

    // Initialize logging
    let log_level = cli.log_level(&settings);
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("tubeqa={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.temp_dir())?;

    if let Err(e) = run_server(settings).await {
        Output::error(&format!("{:#}", e));
        return Err(e);
    }

    Ok(())
}
