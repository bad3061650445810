use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::RosterConfig;

/// Config file name, looked up next to the data file
pub const CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read `roster.toml` from `dir`. A missing file yields the default config.
pub fn read_config(dir: &Path) -> Result<RosterConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RosterConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

/// Like `read_config`, but reports problems on stderr and falls back to defaults
pub fn load_config(dir: &Path) -> RosterConfig {
    read_config(dir).unwrap_or_else(|e| {
        eprintln!("warning: {}; using default settings", e);
        RosterConfig::default()
    })
}
