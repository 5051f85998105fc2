//! Banker configuration stored in `banker.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "banker.toml";

/// Banker configuration (TOML).
///
/// Missing fields default to values that work out of the box with the
/// classic example state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BankerConfig {
    /// State file loaded when no `--state` is given. If it does not exist the
    /// classic example is used.
    pub state_path: PathBuf,

    /// JSON schema for state files. When unset or missing the schema
    /// embedded in the binary is used.
    pub schema_path: Option<PathBuf>,

    /// Print the trace of each safety check and request in the shell.
    pub show_trace: bool,

    /// Shell prompt.
    pub prompt: String,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for BankerConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("banker-state.json"),
            schema_path: None,
            show_trace: true,
            prompt: "banker> ".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl BankerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.state_path.as_os_str().is_empty() {
            return Err(anyhow!("state_path must not be empty"));
        }
        if self.prompt.is_empty() {
            return Err(anyhow!("prompt must not be empty"));
        }
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log_level must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BankerConfig::default()`.
pub fn load_config(path: &Path) -> Result<BankerConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = BankerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BankerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    debug!(path = %path.display(), state_path = %cfg.state_path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &BankerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
