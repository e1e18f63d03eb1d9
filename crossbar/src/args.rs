use std::path::PathBuf;

use clap::Parser;

/// Crossbar LLM gateway
#[derive(Debug, Parser)]
#[command(name = "crossbar", about = "Health-aware gateway fronting multiple LLM providers")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "crossbar.toml", env = "CROSSBAR_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "CROSSBAR_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
