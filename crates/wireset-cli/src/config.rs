// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI configuration: protocol choice and read limits, stored as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wireset::{ProtocolConfig, ProtocolKind};

/// File name looked up inside the platform config directory.
const CONFIG_FILE: &str = "config.json";

/// Persisted CLI settings. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Protocol used when `--protocol` is not given.
    pub protocol: ProtocolKind,
    /// Limits applied while decoding.
    pub limits: ProtocolConfig,
}

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    /// I/O error while reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid config JSON.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// `<platform config dir>/config.json` (e.g. `~/.config/wireset/config.json`).
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "flyingrobots", "wireset").map(|p| p.config_dir().join(CONFIG_FILE))
}

/// Parse config JSON; an empty blob means defaults.
pub fn parse(bytes: &[u8]) -> Result<CliConfig, ConfigError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CliConfig::default());
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Load from `explicit` (must exist) or from the default location (may be absent).
pub fn load(explicit: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(CliConfig::default()),
        },
    };
    match fs::read(&path) {
        Ok(bytes) => parse(&bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::NotFound(path))
            } else {
                Ok(CliConfig::default())
            }
        }
        Err(err) => Err(ConfigError::Io(err)),
    }
}
