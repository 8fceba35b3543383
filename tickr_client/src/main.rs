//! TickrShell — an interactive terminal client for tracking live stock
//! quotes. The client publishes user intents to an external DataService
//! over a pub/sub bus and renders quote updates, price histories, and
//! subscription restorations as they arrive asynchronously.
//!
//! Usage example (CLI):
//! ```bash
//! tickr_client --service-host 192.168.0.10 --service-port 5555
//! ```
//!
//! The REPL verbs are listed by `help`; `exit` (or Ctrl+C) shuts the
//! session down cooperatively.
#![warn(missing_docs)]
mod app;
mod args;
mod bus;
mod command;
mod currency;
mod render;
mod state;

use std::process::ExitCode;
use std::sync::atomic::Ordering;

use clap::Parser;
use log::info;

use crate::app::CliApp;
use crate::args::Args;

fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> tickr_common::Result<()> {
    let app = CliApp::connect(args)?;

    {
        let running = app.running_handle();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            running.store(false, Ordering::SeqCst);
        })
        .expect("Error setting Ctrl+C handler");
    }

    print!("{}", render::welcome_banner());
    print!("{}", render::usage_costs());
    app.run()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
