// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Local HTTP action executor.
///
/// `system_executor.yaml` (or `--config`) sets defaults; environment
/// variables override the file and CLI flags override both.
#[derive(Parser, Debug)]
#[command(
    name = "system-executor",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// All supported CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve `/health` and `/execute` over HTTP.
    Serve {
        /// Path to config file
        ///
        /// Defaults to ./system_executor.yaml when present.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override bind address
        ///
        /// Example:
        /// --bind 0.0.0.0
        #[arg(long)]
        bind: Option<String>,

        /// Override listening port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one JSON command locally and print the result.
    ///
    /// Example:
    /// exec '{"action":"list_directory","path":"/tmp"}'
    ///
    /// Pass `-` to read the command from stdin.
    Exec {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON command, or `-` for stdin
        command: String,
    },

    /// Validate configuration and print the effective settings.
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
