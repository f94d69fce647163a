//! Configuration file discovery and environment variable handling.
//!
//! Settings reach the checker from four places, nearest first: CLI flags,
//! `DS_*` environment variables, a discovered TOML file, built-in defaults.
//! This module covers the file and environment layers; precedence is
//! applied by the caller.

use crate::error::SiftError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default worker count for batch runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Default per-lookup timeout (duration string, e.g. "5s", "750ms", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default WHOIS fallback setting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_fallback: Option<bool>,
}

/// Configuration discovery and loading.
#[derive(Debug, Default)]
pub struct ConfigManager;

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if reading or parsing fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, SiftError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SiftError::file_error(
                path.to_string_lossy(),
                "configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SiftError::file_error(
                path.to_string_lossy(),
                format!("failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)
            .map_err(|e| SiftError::config(format!("failed to parse TOML configuration: {}", e)))?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load the nearest configuration file.
    ///
    /// Candidate locations are tried nearest first; only the first file
    /// that exists is loaded. A missing file at every location is fine and
    /// yields an empty configuration, but a file that exists and fails to
    /// parse is an error.
    pub fn discover_and_load(&self) -> Result<FileConfig, SiftError> {
        match self.discover() {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                self.load_file(&path)
            }
            None => Ok(FileConfig::default()),
        }
    }

    /// Find the nearest existing configuration file, if any.
    fn discover(&self) -> Option<PathBuf> {
        let local = ["./.domain-sift.toml", "./domain-sift.toml"];
        for candidate in &local {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        if let Some(xdg_path) = self.xdg_config_path() {
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = env::var_os("HOME") {
            let path = Path::new(&home).join(".domain-sift.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Configuration path per the XDG Base Directory Specification.
    fn xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        Some(config_dir.join("domain-sift").join("config.toml"))
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), SiftError> {
        if let Some(defaults) = &config.defaults {
            if let Some(workers) = defaults.workers {
                if workers == 0 {
                    return Err(SiftError::config("worker count must be at least 1"));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_duration_string(timeout_str).is_none() {
                    return Err(SiftError::config(format!(
                        "invalid timeout '{}', use a format like '5s', '750ms', '2m'",
                        timeout_str
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors the CLI options.
///
/// Values are read from `DS_*` variables by [`load_env_config`].
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub workers: Option<usize>,
    pub timeout: Option<Duration>,
    pub whois_fallback: Option<bool>,
}

/// Load configuration from `DS_*` environment variables.
///
/// Malformed values are logged as warnings and ignored rather than
/// failing the run.
pub fn load_env_config() -> EnvConfig {
    let mut env_config = EnvConfig::default();

    if let Ok(val) = env::var("DS_WORKERS") {
        match val.parse::<usize>() {
            Ok(workers) if workers > 0 => {
                debug!(workers, "using DS_WORKERS");
                env_config.workers = Some(workers);
            }
            _ => {
                warn!(value = %val, "ignoring invalid DS_WORKERS, must be a positive integer");
            }
        }
    }

    if let Ok(val) = env::var("DS_TIMEOUT") {
        match parse_duration_string(&val) {
            Some(timeout) => {
                debug!(timeout = ?timeout, "using DS_TIMEOUT");
                env_config.timeout = Some(timeout);
            }
            None => {
                warn!(value = %val, "ignoring invalid DS_TIMEOUT, use a format like '5s', '750ms', '2m'");
            }
        }
    }

    if let Ok(val) = env::var("DS_WHOIS_FALLBACK") {
        match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => {
                debug!("using DS_WHOIS_FALLBACK=true");
                env_config.whois_fallback = Some(true);
            }
            "false" | "0" | "no" | "off" => {
                debug!("using DS_WHOIS_FALLBACK=false");
                env_config.whois_fallback = Some(false);
            }
            _ => {
                warn!(value = %val, "ignoring invalid DS_WHOIS_FALLBACK, use true/false");
            }
        }
    }

    env_config
}

/// Parse a duration string like "5s", "750ms", "2m", or bare seconds.
///
/// # Returns
///
/// The parsed duration, or None if the string is not recognized.
pub fn parse_duration_string(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    if let Some(millis) = input.strip_suffix("ms") {
        millis.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = input.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = input.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .map(|m| Duration::from_secs(m * 60))
    } else {
        // Assume seconds if no unit
        input.parse::<u64>().ok().map(Duration::from_secs)
    }
}
