//! Layered configuration for the `opquery` tool.
//!
//! Precedence: CLI > environment > config files > defaults. Files are tried in
//! order: the explicit path, `OPQUERY_CONFIG`, `~/.config/opquery.toml`,
//! `./opquery.toml`. The first file that sets a field wins.

use crate::cluster::TopologyKind;
use crate::errors::DbError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_dir: Option<PathBuf>,
    pub log_config: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_retention: Option<usize>,
    pub default_database: Option<String>,
    pub topology: Option<TopologyKind>,
}

impl AppConfig {
    /// Fills every unset field from `other`.
    pub fn merge_missing(&mut self, other: Self) {
        if self.log_dir.is_none() {
            self.log_dir = other.log_dir;
        }
        if self.log_config.is_none() {
            self.log_config = other.log_config;
        }
        if self.log_level.is_none() {
            self.log_level = other.log_level;
        }
        if self.log_retention.is_none() {
            self.log_retention = other.log_retention;
        }
        if self.default_database.is_none() {
            self.default_database = other.default_database;
        }
        if self.topology.is_none() {
            self.topology = other.topology;
        }
    }

    /// # Errors
    /// Returns `Config` for an unknown topology name or a non-numeric retention.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_vars(|k| std::env::var(k).ok())
    }

    /// Environment lookup with an injectable source.
    ///
    /// # Errors
    /// See [`AppConfig::from_env`].
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, DbError> {
        let log_retention = match get("OPQUERY_LOG_RETENTION") {
            Some(s) => Some(
                s.parse::<usize>()
                    .map_err(|e| DbError::Config(format!("OPQUERY_LOG_RETENTION: {e}")))?,
            ),
            None => None,
        };
        let topology = match get("OPQUERY_TOPOLOGY") {
            Some(s) => Some(
                TopologyKind::from_name(&s)
                    .ok_or_else(|| DbError::Config(format!("unknown topology '{s}'")))?,
            ),
            None => None,
        };
        Ok(Self {
            log_dir: get("OPQUERY_LOG_DIR").map(PathBuf::from),
            log_config: get("OPQUERY_LOG_CONFIG").map(PathBuf::from),
            log_level: get("OPQUERY_LOG_LEVEL"),
            log_retention,
            default_database: get("OPQUERY_DEFAULT_DB"),
            topology,
        })
    }

    /// # Errors
    /// Returns `Io` if the file cannot be read and `Config` if it is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, DbError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DbError::Io(format!("{}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| DbError::Config(format!("{}: {e}", path.display())))
    }
}

/// Candidate config files, most specific first.
#[must_use]
pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var("OPQUERY_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Some(dir) = dirs_next::config_dir() {
        paths.push(dir.join("opquery.toml"));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join("opquery.toml"));
    }
    paths
}

/// Environment first, then each existing file in [`config_paths`] order.
///
/// # Errors
/// Fails on a malformed environment value or an unreadable/invalid file.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, DbError> {
    let mut cfg = AppConfig::from_env()?;
    for path in config_paths(explicit) {
        if path.exists() {
            cfg.merge_missing(AppConfig::from_file(&path)?);
        }
    }
    Ok(cfg)
}
