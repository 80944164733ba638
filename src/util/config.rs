//! Configuration file support for cafpack.
//!
//! cafpack reads two configuration file locations:
//! - Global: `~/.cafpack/config.toml` - User-wide defaults
//! - Project: `.cafpack/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command line
//! flags take precedence over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::abi::DEFAULT_PROBE_TIMEOUT;
use crate::core::options::RawOptions;

/// cafpack configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package options (shared, static, log_level)
    pub options: RawOptions,

    /// Toolchain settings
    pub toolchain: ToolchainSettings,

    /// Build settings
    pub build: BuildConfig,
}

/// Toolchain settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the C++ compiler (e.g., /usr/bin/g++-9)
    pub compiler: Option<PathBuf>,

    /// Compiler family, skips detection when set together with `version`
    pub family: Option<String>,

    /// Compiler version, skips detection when set together with `family`
    pub version: Option<String>,

    /// Deadline for compiler probes in seconds
    pub probe_timeout: Option<u64>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// CMake build type (Release, Debug, ...)
    pub build_type: Option<String>,

    /// Upstream version to fetch
    pub version: Option<String>,

    /// Override for the source archive URL
    pub source_url: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.options.merge(other.options);

        if other.toolchain.compiler.is_some() {
            self.toolchain.compiler = other.toolchain.compiler;
        }
        if other.toolchain.family.is_some() {
            self.toolchain.family = other.toolchain.family;
        }
        if other.toolchain.version.is_some() {
            self.toolchain.version = other.toolchain.version;
        }
        if other.toolchain.probe_timeout.is_some() {
            self.toolchain.probe_timeout = other.toolchain.probe_timeout;
        }

        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.version.is_some() {
            self.build.version = other.build.version;
        }
        if other.build.source_url.is_some() {
            self.build.source_url = other.build.source_url;
        }
    }

    /// Probe deadline, falling back to the built-in default.
    pub fn probe_timeout(&self) -> Duration {
        self.toolchain
            .probe_timeout
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }

    /// CMake build type, `Release` unless configured.
    pub fn build_type(&self) -> &str {
        self.build.build_type.as_deref().unwrap_or("Release")
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cafpack/config.toml)
/// 2. Global config (~/.cafpack/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Load configuration for a project rooted at `project_root`.
pub fn load_project_config(project_root: &Path) -> Config {
    let project_path = project_config_path(project_root);
    match global_config_path() {
        Some(global) => load_config(&global, &project_path),
        None => load_config(&PathBuf::new(), &project_path),
    }
}

/// Get the global cafpack config directory (~/.cafpack).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cafpack"))
}

/// Get the global config path (~/.cafpack/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.cafpack/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cafpack").join("config.toml")
}
