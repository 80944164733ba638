//! Compiler identity: family and numerically ordered version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::util::diagnostic::RecipeError;

/// Compiler family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompilerFamily {
    Gcc,
    Clang,
    Msvc,
    /// Any compiler without a known minimum version (apple-clang, icc, ...)
    Other(String),
}

impl CompilerFamily {
    /// Name used in settings and package ids.
    pub fn as_str(&self) -> &str {
        match self {
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
            CompilerFamily::Msvc => "msvc",
            CompilerFamily::Other(name) => name,
        }
    }

    /// Map a family name or common alias to a family. Never fails.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcc" | "g++" | "gnu" => CompilerFamily::Gcc,
            "clang" | "clang++" => CompilerFamily::Clang,
            "msvc" | "cl" | "visual studio" | "visualstudio" => CompilerFamily::Msvc,
            other => CompilerFamily::Other(other.to_string()),
        }
    }
}

impl FromStr for CompilerFamily {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CompilerFamily::from_name(s))
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CompilerFamily {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CompilerFamily {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(CompilerFamily::from_name(&s))
    }
}

/// A compiler version compared numerically, component by component.
///
/// Compiler versions are rarely full semver (`4.8`, `14`, `3.10`), so
/// missing components default to zero. The text is kept as written for
/// display and error messages.
#[derive(Debug, Clone)]
pub struct CompilerVersion {
    version: Version,
    text: String,
}

impl CompilerVersion {
    /// Build a version from numeric components.
    pub fn new(major: u64, minor: u64) -> Self {
        CompilerVersion {
            version: Version::new(major, minor, 0),
            text: format!("{}.{}", major, minor),
        }
    }

    /// Build a major-only version (`14`).
    pub fn major_only(major: u64) -> Self {
        CompilerVersion {
            version: Version::new(major, 0, 0),
            text: major.to_string(),
        }
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    /// `major.minor.patch`, equal for versions that compare equal.
    pub fn normalized(&self) -> String {
        self.version.to_string()
    }

    /// The version as originally written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for CompilerVersion {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || RecipeError::InvalidVersion(s.to_string());

        if text.is_empty() {
            return Err(invalid());
        }

        let mut parts = [0u64; 3];
        for (i, component) in text.split('.').enumerate() {
            // Anything beyond patch level does not affect ordering
            if i >= parts.len() {
                break;
            }
            parts[i] = component.parse().map_err(|_| invalid())?;
        }

        Ok(CompilerVersion {
            version: Version::new(parts[0], parts[1], parts[2]),
            text: text.to_string(),
        })
    }
}

impl PartialEq for CompilerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for CompilerVersion {}

impl PartialOrd for CompilerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompilerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for CompilerVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for CompilerVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compiler identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerIdentity {
    /// Compiler family (gcc, clang, msvc)
    pub family: CompilerFamily,
    /// Compiler version
    pub version: CompilerVersion,
}

impl CompilerIdentity {
    pub fn new(family: CompilerFamily, version: CompilerVersion) -> Self {
        CompilerIdentity { family, version }
    }

    /// Parse a family name and version string.
    pub fn parse(family: &str, version: &str) -> Result<Self, RecipeError> {
        Ok(CompilerIdentity {
            family: CompilerFamily::from_name(family),
            version: version.parse()?,
        })
    }

    pub fn is_gcc(&self) -> bool {
        self.family == CompilerFamily::Gcc
    }
}

impl fmt::Display for CompilerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family, self.version)
    }
}
