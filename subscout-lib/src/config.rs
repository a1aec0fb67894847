//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and from
//! `SUBSCOUT_*` environment variables. Precedence (applied by the CLI):
//! CLI flags > environment variables > local config > home config > XDG
//! config > built-in defaults.

use crate::error::SubscoutError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 50
/// timeout = 1.5
/// pretty = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-lookup timeout in seconds (fractional allowed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,

    /// Default pretty output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Suppress the end-of-run summary by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, SubscoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SubscoutError::source(
                path.to_string_lossy(),
                "configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SubscoutError::source(
                path.to_string_lossy(),
                format!("failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            SubscoutError::config(format!("failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is loaded first (lowest precedence), then the home
    /// directory config, then the local directory config on top.
    pub fn discover_and_load(&self) -> Result<FileConfig, SubscoutError> {
        let mut merged = FileConfig::default();
        let mut loaded_files = Vec::new();

        if let Some(xdg_path) = self.xdg_config_path() {
            if let Ok(config) = self.load_file(&xdg_path) {
                merged = merge_configs(merged, config);
                loaded_files.push(xdg_path);
            }
        }

        if let Some(home_path) = self.home_config_path() {
            if let Ok(config) = self.load_file(&home_path) {
                merged = merge_configs(merged, config);
                loaded_files.push(home_path);
            }
        }

        if let Some(local_path) = self.local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged = merge_configs(merged, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("Multiple config files found, later entries win:");
            for path in &loaded_files {
                eprintln!("   {}", path.display());
            }
        }

        Ok(merged)
    }

    /// Configuration file in the current directory.
    fn local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./subscout.toml", "./.subscout.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Configuration file in the user's home directory.
    fn home_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let path = Path::new(&home).join(".subscout.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Configuration file per the XDG Base Directory Specification.
    fn xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("subscout").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), SubscoutError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 {
                    return Err(SubscoutError::config("concurrency must be at least 1"));
                }
            }

            if let Some(timeout) = defaults.timeout {
                if !timeout.is_finite() || timeout <= 0.0 {
                    return Err(SubscoutError::config(format!(
                        "invalid timeout {}: must be a positive number of seconds",
                        timeout
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Merge two file configurations; values from `higher` win.
fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    FileConfig {
        defaults: match (lower.defaults, higher.defaults) {
            (Some(mut lower_defaults), Some(higher_defaults)) => {
                if higher_defaults.concurrency.is_some() {
                    lower_defaults.concurrency = higher_defaults.concurrency;
                }
                if higher_defaults.timeout.is_some() {
                    lower_defaults.timeout = higher_defaults.timeout;
                }
                if higher_defaults.pretty.is_some() {
                    lower_defaults.pretty = higher_defaults.pretty;
                }
                if higher_defaults.quiet.is_some() {
                    lower_defaults.quiet = higher_defaults.quiet;
                }
                Some(lower_defaults)
            }
            (None, Some(higher_defaults)) => Some(higher_defaults),
            (Some(lower_defaults), None) => Some(lower_defaults),
            (None, None) => None,
        },
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// Values that can be set via `SUBSCOUT_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<f64>,
    pub quiet: Option<bool>,
    pub config: Option<String>,
}

/// Load configuration from `SUBSCOUT_*` environment variables.
///
/// Invalid values are reported as warnings (when `verbose`) and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut config = EnvConfig::default();

    if let Ok(value) = env::var("SUBSCOUT_CONCURRENCY") {
        match value.parse::<usize>() {
            Ok(n) if n > 0 => config.concurrency = Some(n),
            _ if verbose => {
                eprintln!("Ignoring invalid SUBSCOUT_CONCURRENCY value: {}", value)
            }
            _ => {}
        }
    }

    if let Ok(value) = env::var("SUBSCOUT_TIMEOUT") {
        match value.parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs > 0.0 => config.timeout = Some(secs),
            _ if verbose => eprintln!("Ignoring invalid SUBSCOUT_TIMEOUT value: {}", value),
            _ => {}
        }
    }

    if let Ok(value) = env::var("SUBSCOUT_QUIET") {
        config.quiet = parse_env_bool(&value);
        if config.quiet.is_none() && verbose {
            eprintln!("Ignoring invalid SUBSCOUT_QUIET value: {}", value);
        }
    }

    if let Ok(value) = env::var("SUBSCOUT_CONFIG") {
        if !value.trim().is_empty() {
            config.config = Some(value);
        }
    }

    config
}

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
