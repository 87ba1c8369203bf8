use std::net::IpAddr;

use serde::Serialize;

use crate::config::Config;

/* ---------------- validation output ---------------- */

#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn push_error(&mut self, code: &'static str, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            code,
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.valid && self.errors.is_empty()
    }

    /// One line per error, for startup failures.
    pub fn describe(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn validate_config(cfg: &Config) -> ValidationResult {
    let mut result = ValidationResult::ok();

    validate_server(cfg, &mut result);
    validate_limits(cfg, &mut result);
    validate_defaults(cfg, &mut result);
    validate_launcher(cfg, &mut result);

    result
}

/* ---------------- server ---------------- */

fn validate_server(cfg: &Config, result: &mut ValidationResult) {
    if cfg.server.bind.parse::<IpAddr>().is_err() {
        result.push_error(
            "SERVER_BIND_INVALID",
            format!("server.bind is not an IP address: {:?}", cfg.server.bind),
        );
    }
}

/* ---------------- limits ---------------- */

fn validate_limits(cfg: &Config, result: &mut ValidationResult) {
    let limits = &cfg.limits;

    if limits.max_body_bytes == 0 {
        result.push_error(
            "LIMIT_BODY_INVALID",
            "max_body_bytes must be greater than zero",
        );
    }

    if limits.max_message_chars == 0 {
        result.push_error(
            "LIMIT_MESSAGE_INVALID",
            "max_message_chars must be greater than zero",
        );
    }

    if limits.launch_timeout_ms == 0 {
        result.push_error(
            "LIMIT_LAUNCH_TIMEOUT_INVALID",
            "launch_timeout_ms must be greater than zero",
        );
    }
}

/* ---------------- defaults ---------------- */

fn validate_defaults(cfg: &Config, result: &mut ValidationResult) {
    let defaults = &cfg.defaults;

    for (key, value) in [
        ("create_file_path", &defaults.create_file_path),
        ("delete_file_path", &defaults.delete_file_path),
        ("list_directory_path", &defaults.list_directory_path),
    ] {
        if value.trim().is_empty() {
            result.push_error(
                "DEFAULT_PATH_EMPTY",
                format!("defaults.{key} must not be empty"),
            );
        }
    }

    if let Some(app) = &defaults.application {
        if app.trim().is_empty() {
            result.push_error(
                "DEFAULT_APPLICATION_EMPTY",
                "defaults.application must be omitted or non-empty",
            );
        }
    }
}

/* ---------------- launcher ---------------- */

fn validate_launcher(cfg: &Config, result: &mut ValidationResult) {
    if cfg.launcher.program.trim().is_empty() {
        result.push_error(
            "LAUNCHER_PROGRAM_MISSING",
            "launcher.program is not configured",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let result = validate_config(&Config::default());
        assert!(result.is_valid(), "{}", result.describe());
    }

    #[test]
    fn collects_every_problem() {
        let mut cfg = Config::default();
        cfg.server.bind = "localhost:80".into();
        cfg.limits.max_body_bytes = 0;
        cfg.limits.launch_timeout_ms = 0;
        cfg.defaults.list_directory_path = "  ".into();
        cfg.launcher.program = String::new();

        let result = validate_config(&cfg);
        let codes: Vec<_> = result.errors.iter().map(|e| e.code).collect();

        assert!(!result.is_valid());
        assert_eq!(
            codes,
            vec![
                "SERVER_BIND_INVALID",
                "LIMIT_BODY_INVALID",
                "LIMIT_LAUNCH_TIMEOUT_INVALID",
                "DEFAULT_PATH_EMPTY",
                "LAUNCHER_PROGRAM_MISSING",
            ]
        );
        assert!(result.describe().contains("list_directory_path"));
    }

    #[test]
    fn port_zero_is_allowed_for_ephemeral_binding() {
        let mut cfg = Config::default();
        cfg.server.port = 0;
        assert!(validate_config(&cfg).is_valid());
    }
}
