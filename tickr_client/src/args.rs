//! Command-line arguments for TickrShell.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use tickr_common::net::{CLIENT_PUB_PORT, SERVICE_PUB_PORT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Host where the DataService publishes quote updates.
    #[clap(long, default_value = "localhost")]
    pub service_host: String,

    /// TCP port of the DataService publisher (inbound updates).
    #[clap(long, default_value_t = SERVICE_PUB_PORT)]
    pub service_port: u16,

    /// Local TCP port to bind the intent publisher on (outbound commands).
    #[clap(long, default_value_t = CLIENT_PUB_PORT)]
    pub publish_port: u16,
}
