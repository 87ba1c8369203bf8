// src/runner.rs

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::engine::validate::validate_config;
use crate::engine::{encode, AssembledBody, Dispatcher};
use crate::execution_id::ExecutionId;
use crate::runtime;
use crate::sinks::TracingEventSink;

use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "system_executor=info,tower_http=info";
const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where log lines go. `exec` keeps stdout for the JSON result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Stdout,
    Stderr,
}

/// Entry point from `main.rs`.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { config, bind, port } => {
            let mut cfg = Config::resolve(config.as_deref())?;

            // CLI overrides
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }

            ensure_valid(&cfg)?;
            init_tracing(&cfg, LogTarget::Stdout);

            tracing::info!(
                port = cfg.server.port,
                max_body_bytes = cfg.limits.max_body_bytes,
                launcher = %cfg.launcher.program,
                "starting system executor"
            );

            runtime::serve(&cfg)
                .await
                .context("System executor HTTP server failed")
        }

        Command::Exec { config, command } => {
            let cfg = Config::resolve(config.as_deref())?;
            ensure_valid(&cfg)?;
            init_tracing(&cfg, LogTarget::Stderr);

            run_exec(&cfg, &command).await
        }

        Command::Check { config } => run_check(config.as_deref()),
    }
}

/* ---------------- exec ---------------- */

async fn run_exec(cfg: &Config, command: &str) -> Result<()> {
    let raw = if command == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read command from stdin")?;
        buf
    } else {
        command.as_bytes().to_vec()
    };

    let dispatcher = Dispatcher::from_config(cfg);
    let body = AssembledBody::whole(raw, cfg.limits.max_body_bytes);
    let mut sink = TracingEventSink::new();

    let result = dispatcher
        .dispatch_body(body, &ExecutionId::new(), &mut sink)
        .await;

    println!("{}", encode(&result));

    if !result.success {
        bail!("Action failed");
    }
    Ok(())
}

/* ---------------- check ---------------- */

fn run_check(config: Option<&Path>) -> Result<()> {
    let cfg = Config::resolve(config)?;
    let validation = validate_config(&cfg);

    let report = serde_json::json!({
        "valid": validation.is_valid(),
        "errors": validation.errors,
        "config": cfg,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !validation.is_valid() {
        bail!("Invalid configuration");
    }
    Ok(())
}

fn ensure_valid(cfg: &Config) -> Result<()> {
    let validation = validate_config(cfg);
    if !validation.is_valid() {
        bail!("Invalid configuration: {}", validation.describe());
    }
    Ok(())
}

/* ---------------- logging ---------------- */

/// Install the `[timestamp] LEVEL message` subscriber.
///
/// `RUST_LOG` wins over `log.filter`, which wins over the built-in default.
fn init_tracing(cfg: &Config, target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = cfg
            .log
            .filter
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        EnvFilter::new(directive)
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()));

    let installed = match target {
        LogTarget::Stdout => builder.try_init(),
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };

    if let Err(err) = installed {
        eprintln!("Tracing already initialised, skipping duplicate subscriber: {err}");
    }
}
