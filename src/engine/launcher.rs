// src/engine/launcher.rs

//! Application launching.
//!
//! The application name is appended to the launcher argv as one discrete
//! argument. No shell ever sees it, so metacharacters in the name are inert.
//! Names starting with `-` are refused before spawning, since the launcher
//! would parse them as options.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde_json::json;
use tokio::process::Command;

use crate::config::LauncherConfig;
use crate::engine::{ExecutionResult, ExecutorError};

#[derive(Debug, Clone)]
pub struct Launcher {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Launcher {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(cfg: &LauncherConfig, timeout: Duration) -> Self {
        Self::new(cfg.program.clone(), cfg.args.clone(), timeout)
    }

    /// Ask the OS to open `app_name`. Success means the launcher exited 0
    /// within the timeout.
    pub async fn open_application(&self, app_name: &str) -> ExecutionResult {
        match self.launch(app_name).await {
            Ok(()) => ExecutionResult::ok(
                format!("Application launched: {app_name}"),
                json!({ "app": app_name }),
            ),
            Err(err) => err.into(),
        }
    }

    async fn launch(&self, app_name: &str) -> Result<(), ExecutorError> {
        let launch_error = |reason: String| ExecutorError::Launch {
            app: app_name.to_string(),
            reason,
        };

        if app_name.starts_with('-') {
            return Err(launch_error("application name must not start with '-'".to_string()));
        }

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(app_name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(
            program = %self.program,
            app = %app_name,
            timeout_ms = self.timeout.as_millis() as u64,
            "spawning application launcher"
        );

        let mut child = command.spawn().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                launch_error(format!("launcher `{}` not available", self.program))
            } else {
                launch_error(format!("failed to start launcher: {}", err.kind()))
            }
        })?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(launch_error(describe_status(status))),
            Ok(Err(err)) => Err(launch_error(format!("wait failed: {}", err.kind()))),
            Err(_) => {
                if let Err(err) = child.kill().await {
                    tracing::warn!(app = %app_name, error = %err, "failed to kill timed out launcher");
                }
                Err(launch_error(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn launcher(program: &str, args: &[&str], timeout_ms: u64) -> Launcher {
        Launcher::new(
            program,
            args.iter().map(|a| a.to_string()).collect(),
            Duration::from_millis(timeout_ms),
        )
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let result = launcher("true", &[], 5_000).open_application("Calculator").await;

        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Application launched: Calculator");
        assert_eq!(result.data.unwrap()["app"], "Calculator");
    }

    #[tokio::test]
    async fn nonzero_exit_is_failure_naming_app() {
        let result = launcher("false", &[], 5_000).open_application("Calculator").await;

        assert!(!result.success);
        assert_eq!(result.message, "Error: cannot launch Calculator (exit status 1)");
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn missing_launcher_is_failure() {
        let result = launcher("definitely-not-a-launcher-binary", &[], 5_000)
            .open_application("Calculator")
            .await;

        assert!(!result.success);
        assert!(result.message.contains("Calculator"));
        assert!(result.message.contains("not available"));
    }

    #[tokio::test]
    async fn hanging_launch_times_out() {
        let result = launcher("sleep", &[], 100).open_application("5").await;

        assert!(!result.success);
        assert!(result.message.contains("timed out after 100ms"));
    }

    #[tokio::test]
    async fn app_name_is_one_argument_not_shell_text() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join("injected");
        let app = format!("Calc\"; touch {}; echo \"", marker.display());

        // `test -n X` exits 0 only if X arrives as a single non-empty argument.
        let result = launcher("test", &["-n"], 5_000).open_application(&app).await;

        assert!(result.success, "{}", result.message);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn option_like_app_name_is_refused() {
        // `ls --version` would exit 0 if the name reached the launcher.
        let result = launcher("ls", &[], 5_000).open_application("--version").await;

        assert!(!result.success);
        assert_eq!(
            result.message,
            "Error: cannot launch --version (application name must not start with '-')"
        );
        assert!(result.data.is_none());
    }
}
