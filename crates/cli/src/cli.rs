//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Camera Bridge - device-to-transport acquisition bridge
#[derive(Parser, Debug)]
#[command(
    name = "cam-bridge",
    author,
    version,
    about = "Camera acquisition bridge",
    long_about = "A runtime bridge between a frame-producing camera device and a \n\
                  publish-subscribe transport.\n\n\
                  Loads a typed parameter map, binds the camera by serial number, \n\
                  moves frames through a bounded handoff queue, and emits image and \n\
                  metadata messages with periodic throughput reports."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CAM_BRIDGE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CAM_BRIDGE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the acquisition bridge
    Run(RunArgs),

    /// Validate the run configuration and parameter map without running
    Validate(ValidateArgs),

    /// Display parameter map information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to the bridge configuration file (TOML)
    #[arg(short, long, default_value = "bridge.toml", env = "CAM_BRIDGE_CONFIG")]
    pub config: PathBuf,

    /// Stop after this many seconds (0 = run until ctrl-c)
    #[arg(long, default_value = "0", env = "CAM_BRIDGE_DURATION")]
    pub duration: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "CAM_BRIDGE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the bridge configuration file to validate
    #[arg(short, long, default_value = "bridge.toml")]
    pub config: PathBuf,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the bridge configuration file
    #[arg(short, long, default_value = "bridge.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
