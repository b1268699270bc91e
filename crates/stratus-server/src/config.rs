//! Server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file,
//! environment variables, then command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use stratus_monitoring::TracingConfig;

/// Top-level server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: HttpConfig,

    /// Store connection configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable permissive CORS
    #[serde(default)]
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            enable_cors: false,
        }
    }
}

/// Store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Cloud project hosting the store instance
    #[serde(default)]
    pub project_id: Option<String>,

    /// Store instance identifier
    #[serde(default)]
    pub instance_id: Option<String>,

    /// Table holding the climate data
    #[serde(default = "default_table")]
    pub table: String,

    /// JSON fixture loaded into the in-memory backend at startup
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            instance_id: None,
            table: default_table(),
            seed_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7000
}

fn default_table() -> String {
    "climate_data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Overrides collected from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub table: Option<String>,
    pub seed_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub enable_cors: bool,
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config")
    }

    /// Apply `PROJECT_ID`, `INSTANCE_ID` (or `_INSTANCE_ID`) and `STRATUS_*` variables
    /// resolved through `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(project_id) = lookup("PROJECT_ID") {
            self.store.project_id = Some(project_id);
        }
        if let Some(instance_id) = lookup("INSTANCE_ID").or_else(|| lookup("_INSTANCE_ID")) {
            self.store.instance_id = Some(instance_id);
        }
        if let Some(table) = lookup("STRATUS_TABLE") {
            self.store.table = table;
        }
        if let Some(seed) = lookup("STRATUS_SEED_PATH") {
            self.store.seed_path = Some(PathBuf::from(seed));
        }
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref bind_addr) = overrides.bind_addr {
            self.server.bind_addr = bind_addr.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(ref table) = overrides.table {
            self.store.table = table.clone();
        }
        if let Some(ref seed_path) = overrides.seed_path {
            self.store.seed_path = Some(seed_path.clone());
        }
        if let Some(ref log_level) = overrides.log_level {
            self.telemetry.log_level = log_level.clone();
        }
        if overrides.json_logs {
            self.telemetry.json = true;
        }
        if overrides.enable_cors {
            self.server.enable_cors = true;
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be > 0");
        }
        self.listen_addr()?;

        if self.store.table.trim().is_empty() {
            anyhow::bail!("store.table must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "telemetry.log_level must be one of {:?}, got: {}",
                valid_levels,
                self.telemetry.log_level
            );
        }
        Ok(())
    }

    /// Socket address the HTTP listener binds to
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.bind_addr, self.server.port)
            .parse()
            .with_context(|| format!("invalid server.bind_addr: {}", self.server.bind_addr))
    }

    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            log_level: self.telemetry.log_level.clone(),
            json: self.telemetry.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.store.table, "climate_data");
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_addr().unwrap().to_string(), "0.0.0.0:7000");
    }

    #[test]
    fn test_partial_toml() {
        let config = ServerConfig::from_toml(
            r#"
            [server]
            port = 8080

            [store]
            table = "weather"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.store.table, "weather");
        assert!(config.store.seed_path.is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[telemetry]\nlog_level = \"debug\"\njson = true").unwrap();
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.telemetry.log_level, "debug");
        assert!(config.tracing_config().json);
    }

    #[test]
    fn test_env_then_overrides() {
        let env: HashMap<&str, &str> = [
            ("PROJECT_ID", "climate-prod"),
            ("_INSTANCE_ID", "bt-1"),
            ("STRATUS_TABLE", "from_env"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.store.project_id.as_deref(), Some("climate-prod"));
        assert_eq!(config.store.instance_id.as_deref(), Some("bt-1"));
        assert_eq!(config.store.table, "from_env");

        config.apply_overrides(&ConfigOverrides {
            table: Some("from_cli".into()),
            port: Some(9000),
            ..Default::default()
        });
        assert_eq!(config.store.table, "from_cli");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ServerConfig::default();
        config.telemetry.log_level = "verbose".into();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.store.table = "  ".into();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.server.bind_addr = "not an address".into();
        assert!(config.validate().is_err());
    }
}
