// src/main.rs

//! system-executor
//!
//! Entry point for the system-executor binary.
//!
//! The service accepts JSON commands over HTTP and performs local side
//! effects: creating, deleting and listing files, and launching
//! applications. All real work lives in `runner`, `runtime` and `engine`.
//!
//! Responsibilities of this file:
//! - Load an optional `.env`
//! - Parse CLI arguments
//! - Initialise the async runtime
//! - Hand off execution to the runner

mod cli;
mod config;
mod engine;
mod execution_id;
mod runner;
mod runtime;
mod sinks;
mod util;

use anyhow::Result;
use clap::Parser;

/// Program entry point.
///
/// Multi-threaded Tokio: each connection gets its own task, and blocking
/// filesystem work moves to the blocking pool.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    runner::run(cli).await
}
