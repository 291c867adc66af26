use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

const DEFAULT_PORT: u16 = 4280;
const DEFAULT_LOG_LEVEL: &str = "info";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".vibeboard"),
        None => PathBuf::from(".vibeboard"),
    }
}

/// Board configuration (`config.toml` in the data directory).
///
/// Every field has a default; a missing or partial config file is fine.
/// CLI flags and `VIBEBOARD_*` env vars override file values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// HTTP API port (default: 4280).
    pub port: u16,
    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access).
    pub bind_address: String,
    /// Data directory holding the SQLite database and config.toml.
    pub data_dir: PathBuf,
    /// Log level / env-filter directive (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: default_bind_address(),
            data_dir: default_data_dir(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BoardConfig {
    /// Resolve the effective config: defaults, overlaid by
    /// `<data_dir>/config.toml` when present, overlaid by explicit overrides.
    pub fn new(
        port: Option<u16>,
        bind_address: Option<String>,
        data_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        let dir = data_dir.clone().unwrap_or_else(default_data_dir);
        let mut config = Self::load_file(&dir.join("config.toml"));

        config.data_dir = dir;
        if let Some(port) = port {
            config.port = port;
        }
        if let Some(bind_address) = bind_address {
            config.bind_address = bind_address;
        }
        if let Some(log_level) = log_level {
            config.log_level = log_level;
        }
        config
    }

    /// Parse the config file, falling back to defaults on a missing or
    /// malformed file rather than aborting startup.
    fn load_file(path: &std::path::Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("could not parse {}: {e} — using defaults", path.display());
                Self::default()
            }
        }
    }
}
