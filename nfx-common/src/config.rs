//! Bootstrap configuration for NeuroFleetX services
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (clap, which also reads `NFX_*` environment variables)
//! 2. `PORT` environment variable (port only)
//! 3. TOML configuration file
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error: a warning is logged and the
//! remaining tiers apply. A TOML file that exists but cannot be parsed is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Directory under the platform config dir holding service TOML files
pub const CONFIG_DIR_NAME: &str = "neurofleetx";

/// Environment variable naming an explicit TOML config path
pub const CONFIG_PATH_ENV: &str = "NFX_CONFIG";

/// Legacy port variable honored for deployment compatibility
pub const PORT_ENV: &str = "PORT";

/// Compiled defaults used when no other tier supplies a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: default_log_level(),
        }
    }
}

/// Service configuration file contents
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Interface to bind
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP port
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line or through `NFX_*` variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge all tiers into a single configuration
    pub fn resolve(overrides: ConfigOverrides, toml: Option<TomlConfig>) -> Result<Self> {
        let defaults = CompiledDefaults::default();
        let toml = toml.unwrap_or_default();

        let port = match overrides.port {
            Some(port) => port,
            None => match port_from_env()? {
                Some(port) => port,
                None => toml.port.unwrap_or(defaults.port),
            },
        };

        let host = overrides
            .host
            .or(toml.host)
            .unwrap_or(defaults.host);

        let log_level = overrides.log_level.unwrap_or(toml.logging.level);

        if host.trim().is_empty() {
            return Err(Error::Config("Host must not be empty".to_string()));
        }

        Ok(Self {
            host,
            port,
            log_level,
        })
    }

    /// Socket address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn port_from_env() -> Result<Option<u16>> {
    match std::env::var(PORT_ENV) {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", PORT_ENV, value, e))),
        Err(_) => Ok(None),
    }
}

/// Default TOML path for a service, e.g. `~/.config/neurofleetx/nfx-ai.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(format!("{}.toml", module_name)))
}

/// Choose the TOML path: explicit argument, then `NFX_CONFIG`, then platform default
pub fn resolve_config_path(cli_path: Option<&Path>, module_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path(module_name)
}

/// Load a TOML config file; `Ok(None)` when the file does not exist
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(Some(config))
}
