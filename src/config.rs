// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use crate::util::read_to_string;

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "system_executor.yaml";

pub const ENV_BIND: &str = "SYSTEM_EXECUTOR_BIND";
pub const ENV_PORT: &str = "SYSTEM_EXECUTOR_PORT";

/// Root configuration loaded from `system_executor.yaml`.
///
/// Every section is optional; a missing file means built-in defaults,
/// which reproduce the reference service (port 5002, 8 KiB bodies,
/// `/tmp` defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener address.
    pub server: ServerConfig,

    /// Body, message and launch limits.
    pub limits: Limits,

    /// Arguments substituted when a request omits them.
    pub defaults: Defaults,

    /// Program used by `open_application`.
    pub launcher: LauncherConfig,

    pub log: LogConfig,
}

/// Example in system_executor.yaml:
///
/// server:
///   bind: 127.0.0.1
///   port: 5002
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5002,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Request bodies beyond this size are rejected as truncated.
    pub max_body_bytes: usize,

    /// Result messages are clipped to this many characters.
    pub max_message_chars: usize,

    /// Launcher processes still running after this are killed.
    pub launch_timeout_ms: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_bytes: 8192,
            max_message_chars: 512,
            launch_timeout_ms: 10_000,
        }
    }
}

impl Limits {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }
}

/// Per-action default arguments.
///
/// defaults:
///   create_file_path: /tmp/hopper_default.txt
///   create_file_content: Default content
///   delete_file_path: /tmp/hopper_default.txt
///   list_directory_path: /tmp
///   application: ~
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub create_file_path: String,
    pub create_file_content: String,
    pub delete_file_path: String,
    pub list_directory_path: String,
    pub application: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            create_file_path: "/tmp/hopper_default.txt".to_string(),
            create_file_content: "Default content".to_string(),
            delete_file_path: "/tmp/hopper_default.txt".to_string(),
            list_directory_path: "/tmp".to_string(),
            application: None,
        }
    }
}

/// Launcher invocation: `program args... <app_name>`.
///
/// launcher:
///   program: open
///   args: ["-a"]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self {
                program: "open".to_string(),
                args: vec!["-a".to_string()],
            }
        } else {
            Self {
                program: "gtk-launch".to_string(),
                args: Vec::new(),
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive. `RUST_LOG` wins when set.
    pub filter: Option<String>,
}

impl Config {
    /// Load and parse a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)?;

        let cfg: Config =
            serde_yaml::from_str(&raw).context("Failed to parse YAML config")?;

        Ok(cfg)
    }

    /// Load the named file, or the default file if present, or built-in
    /// defaults; then apply environment overrides.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => Config::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Config::load(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Apply `SYSTEM_EXECUTOR_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {port:?}"))?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address: {:?}", self.server.bind))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_reference_service() {
        let cfg = Config::default();
        assert_eq!(cfg.server.port, 5002);
        assert_eq!(cfg.limits.max_body_bytes, 8192);
        assert_eq!(cfg.defaults.create_file_path, "/tmp/hopper_default.txt");
        assert_eq!(cfg.defaults.create_file_content, "Default content");
        assert_eq!(cfg.defaults.list_directory_path, "/tmp");
        assert!(cfg.defaults.application.is_none());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system_executor.yaml");
        std::fs::write(
            &path,
            "server:\n  port: 6100\nlimits:\n  launch_timeout_ms: 250\nlauncher:\n  program: xdg-open\n  args: []\n",
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();

        assert_eq!(cfg.server.port, 6100);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.limits.launch_timeout(), Duration::from_millis(250));
        assert_eq!(cfg.limits.max_body_bytes, 8192);
        assert_eq!(cfg.launcher.program, "xdg-open");
        assert!(cfg.launcher.args.is_empty());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Config::resolve(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "server: [unclosed").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn overrides_replace_bind_and_port() {
        let vars: HashMap<&str, &str> = [(ENV_BIND, "0.0.0.0"), (ENV_PORT, " 7000 ")].into();
        let mut cfg = Config::default();

        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(cfg.socket_addr().unwrap(), "0.0.0.0:7000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn non_numeric_port_override_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(|k| (k == ENV_PORT).then(|| "http".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn ipv6_bind_address_is_supported() {
        let mut cfg = Config::default();
        cfg.server.bind = "::1".to_string();
        assert_eq!(cfg.socket_addr().unwrap(), "[::1]:5002".parse::<SocketAddr>().unwrap());
    }
}
