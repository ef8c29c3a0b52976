//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "ranger", version, about = "Ultrasonic rangefinder CLI")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/ranger.toml")]
    pub config: PathBuf,

    /// Print results and errors as JSON lines; log as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable real-time mode (SCHED_FIFO + mlockall) to reduce edge-timestamp jitter
    #[arg(
        long,
        action = ArgAction::SetTrue,
        long_help = "Enable real-time mode on Linux: SCHED_FIFO priority and mlockall(MCL_CURRENT|MCL_FUTURE).\n\nPulse widths are measured from interrupt timestamps, so scheduling latency shows up directly as millimetres of error. Requires CAP_SYS_NICE/CAP_IPC_LOCK (or root). Ignored with a warning elsewhere."
    )]
    pub rt: bool,

    /// SCHED_FIFO priority for --rt (clamped to the system range)
    #[arg(long, value_name = "PRIO")]
    pub rt_prio: Option<i32>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one distance reading
    Measure {
        /// Re-acquire up to this many extra times when no reading is plausible
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Take readings repeatedly until Ctrl-C (or --count)
    Watch {
        /// Query rate in Hz
        #[arg(long, default_value_t = 1.0)]
        hz: f32,
        /// Stop after this many successful readings
        #[arg(long)]
        count: Option<u64>,
    },
    /// Open the capture device and report whether it is usable
    SelfCheck,
}
