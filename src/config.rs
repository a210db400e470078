//! Configuration and CLI argument handling

use clap::Parser;

use crate::render::projector::TimeFormat;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "timer-viewer")]
#[command(about = "A polling display client for networked countdown timers")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Base URL of the timer server
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    pub server: String,

    /// Poll interval for the status endpoint in milliseconds
    #[arg(short, long, default_value = "100")]
    pub poll_interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "1000")]
    pub request_timeout_ms: u64,

    /// Presentation policy for the remaining-time readout
    #[arg(long, value_enum, default_value_t = TimeFormat::Compact)]
    pub time_format: TimeFormat,

    /// Timer ids the display provides slots for (fixed for the session)
    #[arg(long = "timer-id", default_values_t = ["1".to_string(), "2".to_string()])]
    pub timer_ids: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// URL of the timer status endpoint
    pub fn status_url(&self) -> String {
        format!("{}/api/timer_status", self.server.trim_end_matches('/'))
    }

    /// URL of an uploaded alert sound
    pub fn audio_url(&self, filename: &str) -> String {
        format!(
            "{}/static/audio/{}",
            self.server.trim_end_matches('/'),
            filename
        )
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
