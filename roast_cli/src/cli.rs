//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "roast", version, about = "Coffee roast profiler CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/roast_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a roast profile from the device
    Record {
        /// Serial device path (overrides [port].path)
        #[arg(long, value_name = "PATH")]
        port: Option<String>,

        /// Baud rate (overrides [port].baud)
        #[arg(long)]
        baud: Option<u32>,

        /// Write the finalized profile as CSV
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print per-round temperatures and rate of rise while recording
        #[arg(long, action = ArgAction::SetTrue)]
        live: bool,

        /// Use the built-in simulated roaster instead of a serial device
        #[arg(long, action = ArgAction::SetTrue)]
        simulate: bool,

        /// Rounds the simulated roaster reports before finishing
        #[arg(long, value_name = "N", default_value_t = 60)]
        sim_rounds: u32,

        /// Send the start-roast command before polling
        #[arg(long, action = ArgAction::SetTrue)]
        start_roast: bool,

        /// Cycle-parameter payload sent before polling (passed through raw)
        #[arg(long, value_name = "PARAMS")]
        cycle_params: Option<String>,
    },
    /// Recompute rate of rise from a saved profile CSV
    Analyze {
        /// Profile CSV produced by `record --output`
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Also evaluate the rate of rise at this time (seconds)
        #[arg(long, value_name = "SECONDS")]
        at: Option<f64>,
    },
    /// List serial devices
    Ports,
}
