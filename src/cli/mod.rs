//! Command-line interface for tubeqa.

mod browser;
mod output;

pub use browser::open_browser;
pub use output::Output;

use crate::config::Settings;
use clap::Parser;

/// TubeQA - ask questions about YouTube videos
///
/// Starts a local web app. Paste a YouTube link, get a summary of the video,
/// then ask follow-up questions answered from its transcript.
#[derive(Parser, Debug)]
#[command(name = "tubeqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Host to bind to (overrides server.host)
    #[arg(long, env = "TUBEQA_HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, env = "TUBEQA_PORT")]
    pub port: Option<u16>,

    /// Do not open the UI in a browser on startup
    #[arg(long)]
    pub no_browser: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if self.no_browser {
            settings.server.open_browser = false;
        }
    }

    /// Log level filter for this crate.
    pub fn log_level<'a>(&self, settings: &'a Settings) -> &'a str {
        match self.verbose {
            0 => settings.general.log_level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    }
}
