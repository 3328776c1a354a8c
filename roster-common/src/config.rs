//! Configuration loading and resolution
//!
//! Each setting resolves with the priority:
//! 1. Command-line argument or environment variable (merged by the binary's CLI parser)
//! 2. TOML config file
//! 3. OS-dependent compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5780";
/// Default log level when neither CLI nor TOML set one
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "roster.db";
/// Bundled feed document name inside the root folder
pub const FEED_FILE: &str = "employee.json";

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub feed_path: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub bind: Option<String>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config file if one exists.
    ///
    /// An explicit path must exist. Without one, the platform locations are
    /// searched and a missing file yields `Ok(None)`.
    pub fn load_optional(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        for candidate in default_config_paths() {
            if candidate.exists() {
                info!("Loading config file: {}", candidate.display());
                return Self::load(&candidate).map(Some);
            }
            debug!("No config file at {}", candidate.display());
        }

        Ok(None)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub feed_path: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub bind: Option<String>,
    pub log_level: Option<String>,
}

/// Where the import pipeline reads its document from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedLocation::File(path) => write!(f, "{}", path.display()),
            FeedLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RosterConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub feed: FeedLocation,
    pub bind: String,
    pub log_level: String,
}

impl RosterConfig {
    /// Merge overrides, TOML and compiled defaults
    pub fn resolve(overrides: &ConfigOverrides, toml: Option<&TomlConfig>) -> Self {
        let root_folder = overrides
            .root_folder
            .clone()
            .or_else(|| toml.and_then(|t| t.root_folder.clone()))
            .unwrap_or_else(default_root_folder);

        let database_path = overrides
            .database
            .clone()
            .or_else(|| toml.and_then(|t| t.database.clone()))
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE));

        let feed = resolve_feed(overrides, toml, &root_folder);

        let bind = overrides
            .bind
            .clone()
            .or_else(|| toml.and_then(|t| t.bind.clone()))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let log_level = overrides
            .log_level
            .clone()
            .or_else(|| toml.and_then(|t| t.log_level.clone()))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self {
            root_folder,
            database_path,
            feed,
            bind,
            log_level,
        }
    }
}

/// A URL wins over a path at the same priority tier
fn resolve_feed(
    overrides: &ConfigOverrides,
    toml: Option<&TomlConfig>,
    root_folder: &Path,
) -> FeedLocation {
    if let Some(url) = &overrides.feed_url {
        return FeedLocation::Url(url.clone());
    }
    if let Some(path) = &overrides.feed_path {
        return FeedLocation::File(path.clone());
    }
    if let Some(toml) = toml {
        if let Some(url) = &toml.feed_url {
            return FeedLocation::Url(url.clone());
        }
        if let Some(path) = &toml.feed_path {
            return FeedLocation::File(path.clone());
        }
    }
    FeedLocation::File(root_folder.join(FEED_FILE))
}

/// Candidate config file locations, most specific first
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("roster").join("config.toml"));
    }
    if cfg!(unix) {
        paths.push(PathBuf::from("/etc/roster/config.toml"));
    }
    paths
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/roster (or /var/lib/roster for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("roster"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/roster"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("roster"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/roster"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("roster"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\roster"))
    } else {
        PathBuf::from("./roster_data")
    }
}
