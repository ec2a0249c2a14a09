//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use proctor_core::clock::{DEFAULT_BUDGET_SECONDS, DEFAULT_WARNING_THRESHOLD_SECONDS};
use proctor_core::engine::SessionConfig;
use proctor_core::store::KeyValueStore;

use crate::fs::JsonFileStore;

/// Timing settings applied to every new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Fixed time budget per session.
    #[serde(default = "default_budget")]
    pub budget_seconds: u32,
    /// Remaining seconds at which the low-time warning fires.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_seconds: u32,
}

fn default_budget() -> u32 {
    DEFAULT_BUDGET_SECONDS
}
fn default_warning_threshold() -> u32 {
    DEFAULT_WARNING_THRESHOLD_SECONDS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            budget_seconds: default_budget(),
            warning_threshold_seconds: default_warning_threshold(),
        }
    }
}

impl SessionSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            budget_seconds: self.budget_seconds,
            warning_threshold_seconds: self.warning_threshold_seconds,
        }
    }
}

/// Top-level proctor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProctorConfig {
    /// Directory holding the `tests` and `submissions` collections.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub session: SessionSettings,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./proctor-data")
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session: SessionSettings::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        // Substituted values are never rescanned
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `proctor.toml` in the current directory
/// 2. `~/.config/proctor/config.toml`
///
/// Environment variable overrides: `PROCTOR_DATA_DIR`, `PROCTOR_BUDGET_SECONDS`.
pub fn load_config() -> Result<ProctorConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ProctorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("proctor.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ProctorConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ProctorConfig::default(),
    };

    apply_env_overrides(&mut config);

    if let Some(raw) = config.data_dir.to_str() {
        config.data_dir = PathBuf::from(resolve_env_vars(raw));
    }

    Ok(config)
}

fn apply_env_overrides(config: &mut ProctorConfig) {
    if let Ok(dir) = std::env::var("PROCTOR_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    if let Ok(raw) = std::env::var("PROCTOR_BUDGET_SECONDS") {
        match raw.trim().parse::<u32>() {
            Ok(secs) if secs > 0 => config.session.budget_seconds = secs,
            _ => tracing::warn!("ignoring invalid PROCTOR_BUDGET_SECONDS={raw:?}"),
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("proctor"))
}

/// Open the store configured by `config`.
pub fn open_store(config: &ProctorConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store = JsonFileStore::open(&config.data_dir).with_context(|| {
        format!("failed to open data directory: {}", config.data_dir.display())
    })?;
    Ok(Arc::new(store))
}
