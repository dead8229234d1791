//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

use crate::navigator::NavTuning;
use crate::selector::ProcessingMode;

pub use defaults::{
    DEFAULT_NAV_COOLDOWN_MS, DEFAULT_NAV_DEADZONE, MAX_NAV_COOLDOWN_MS, STDIN_SCRIPT,
};

/// CLI options for the promptdeck driver.
#[derive(Debug, Parser, Clone)]
#[command(about = "promptdeck prompt menu driver", author, version)]
pub struct AppConfig {
    /// Category table (.yaml, .yml or .json); the built-in catalog is used when omitted
    #[arg(long, env = "PROMPTDECK_CATEGORIES", value_name = "FILE")]
    pub categories: Option<PathBuf>,

    /// Print the loaded categories and exit
    #[arg(long = "list-categories", default_value_t = false)]
    pub list_categories: bool,

    /// Replay newline-delimited JSON input frames from FILE ("-" for stdin)
    #[arg(long, value_name = "FILE")]
    pub script: Option<String>,

    /// Emit connection calls as newline-delimited JSON events
    #[arg(long = "json-ipc", default_value_t = false)]
    pub json_ipc: bool,

    /// Minimum time between accepted navigation steps (milliseconds)
    #[arg(long = "nav-cooldown-ms", default_value_t = DEFAULT_NAV_COOLDOWN_MS)]
    pub nav_cooldown_ms: u64,

    /// Stick deflection required before navigation fires (0.0 - 1.0, exclusive)
    #[arg(long = "nav-deadzone", default_value_t = DEFAULT_NAV_DEADZONE)]
    pub nav_deadzone: f32,

    /// Mode the connection is in before the first prompt
    #[arg(long = "initial-mode", value_enum, default_value_t = ProcessingMode::Scene)]
    pub initial_mode: ProcessingMode,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "PROMPTDECK_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "PROMPTDECK_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging prompt payloads and typed text (debug log only)
    #[arg(
        long = "log-content",
        env = "PROMPTDECK_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,
}

impl AppConfig {
    pub fn logging_enabled(&self) -> bool {
        (self.logs || self.log_timings) && !self.no_logs
    }

    pub fn nav_tuning(&self) -> NavTuning {
        NavTuning {
            deadzone: self.nav_deadzone,
            cooldown_secs: self.nav_cooldown_ms as f64 / 1000.0,
        }
    }

    pub fn reads_script_from_stdin(&self) -> bool {
        self.script.as_deref() == Some(STDIN_SCRIPT)
    }
}
