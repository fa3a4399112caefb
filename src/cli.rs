use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fastuator",
    version,
    about = "Health, probe, info and metrics endpoints for axum services",
    long_about = "Serves a minimal host application with the fastuator endpoints installed: aggregated health, Kubernetes liveness and readiness probes, build info and Prometheus metrics."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Server bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log filter used when RUST_LOG is not set
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit human-readable logs instead of JSON
    #[arg(long, env = "FASTUATOR_PLAIN_LOGS")]
    pub plain_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default)
    Serve,

    /// Validate configuration file
    Config {
        /// Configuration file to validate
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Run the configured health checks once and print the result
    Check {
        /// Include per-check details
        #[arg(short, long)]
        details: bool,

        /// Which check list to run
        #[arg(long, value_enum, default_value_t = ProbeKind::Health)]
        probe: ProbeKind,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Health,
    Liveness,
    Readiness,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
