//! User-facing build options and their normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::toolchain::check_link_mode;
use crate::util::diagnostic::RecipeError;

/// Log verbosity compiled into the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[default]
    None,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// All recognized levels, quietest first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::None,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::None => "NONE",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl FromStr for LogLevel {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RecipeError::InvalidOptions {
                field: "logLevel".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildOptions {
    pub shared: bool,
    #[serde(rename = "static")]
    pub static_: bool,
    pub log_level: LogLevel,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            shared: false,
            static_: true,
            log_level: LogLevel::None,
        }
    }
}

impl BuildOptions {
    pub fn new(shared: bool, static_: bool, log_level: LogLevel) -> Self {
        BuildOptions {
            shared,
            static_,
            log_level,
        }
    }
}

impl fmt::Display for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shared={} static={} log_level={}",
            self.shared, self.static_, self.log_level
        )
    }
}

/// Unvalidated options as they arrive from flags or config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    #[serde(deserialize_with = "bool_or_string")]
    pub shared: Option<String>,
    #[serde(rename = "static", deserialize_with = "bool_or_string")]
    pub static_: Option<String>,
    pub log_level: Option<String>,
}

/// Config files may spell booleans either as TOML booleans or as strings.
fn bool_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    Ok(
        Option::<BoolOrString>::deserialize(deserializer)?.map(|value| match value {
            BoolOrString::Bool(b) => b.to_string(),
            BoolOrString::Str(s) => s,
        }),
    )
}

impl RawOptions {
    /// Layer `other` on top of `self`; set fields in `other` win.
    pub fn merge(&mut self, other: RawOptions) {
        if other.shared.is_some() {
            self.shared = other.shared;
        }
        if other.static_.is_some() {
            self.static_ = other.static_;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, RecipeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(RecipeError::InvalidOptions {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Normalize raw options into [`BuildOptions`].
///
/// Missing fields take the defaults (`shared=false`, `static=true`,
/// `log_level=NONE`). Fails on unrecognized values and on an empty
/// link mode.
pub fn resolve_options(raw: &RawOptions) -> Result<BuildOptions, RecipeError> {
    let defaults = BuildOptions::default();

    let shared = match &raw.shared {
        Some(value) => parse_bool("shared", value)?,
        None => defaults.shared,
    };
    let static_ = match &raw.static_ {
        Some(value) => parse_bool("static", value)?,
        None => defaults.static_,
    };
    let log_level = match &raw.log_level {
        Some(value) => value.parse()?,
        None => defaults.log_level,
    };

    let options = BuildOptions {
        shared,
        static_,
        log_level,
    };
    check_link_mode(&options)?;

    tracing::debug!("Resolved options: {}", options);
    Ok(options)
}
