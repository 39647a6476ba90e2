//! Binary crate for the `forecast` desktop app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The forecast window

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod ui;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run()
}
