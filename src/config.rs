/*!
 * Configuration types for the livery CLI
 */

use crate::error::{LiveryError, Result};
use livery_core_manifest::{
    BuildOptions, CollectOptions, DEFAULT_MAX_FILE_BYTES, DEFAULT_PATTERN, LIVERIES_DIR_NAME,
    MANIFEST_FILE_NAME,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "livery.toml";

/// Main configuration for manifest builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Directory holding the `*.meta.json` files
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Manifest output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// File-name glob for metadata files
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Per-file size limit in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Write `generated_at` into the manifest
    #[serde(default = "default_true")]
    pub stamp_time: bool,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output: default_output(),
            pattern: default_pattern(),
            max_file_bytes: default_max_file_bytes(),
            stamp_time: true,
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(LIVERIES_DIR_NAME)
}

fn default_output() -> PathBuf {
    PathBuf::from(MANIFEST_FILE_NAME)
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl PublishConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LiveryError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| LiveryError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `explicit` if given, else `livery.toml` in `dir` if present, else defaults
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Self::from_file(&candidate);
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| LiveryError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Options for a build that writes the manifest
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            input_dir: self.input_dir.clone(),
            output: Some(self.output.clone()),
            collect: self.collect_options(),
            stamp_time: self.stamp_time,
        }
    }

    /// Options for a validation-only run
    pub fn check_options(&self) -> BuildOptions {
        BuildOptions {
            output: None,
            stamp_time: false,
            ..self.build_options()
        }
    }

    fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            pattern: self.pattern.clone(),
            max_file_bytes: self.max_file_bytes,
        }
    }
}
