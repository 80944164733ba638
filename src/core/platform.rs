//! Platform and architecture facts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Windows,
    Macos,
    Linux,
    Other,
}

impl Os {
    /// Detect the host operating system at compile time
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::Macos
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Macos => "macos",
            Os::Linux => "linux",
            Os::Other => "other",
        }
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win" => Ok(Os::Windows),
            "macos" | "darwin" | "osx" => Ok(Os::Macos),
            "linux" => Ok(Os::Linux),
            "other" => Ok(Os::Other),
            other => Err(format!("unknown operating system `{}`", other)),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86,
    X86_64,
    Other,
}

impl Arch {
    /// Detect the host architecture at compile time
    pub const fn current() -> Self {
        if cfg!(target_arch = "x86") {
            Arch::X86
        } else if cfg!(target_arch = "x86_64") {
            Arch::X86_64
        } else {
            Arch::Other
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Other => "other",
        }
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" => Ok(Arch::X86),
            "x86_64" | "amd64" | "x64" => Ok(Arch::X86_64),
            "other" => Ok(Arch::Other),
            other => Err(format!("unknown architecture `{}`", other)),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform facts supplied by the environment at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformFacts {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformFacts {
    pub const fn new(os: Os, arch: Arch) -> Self {
        PlatformFacts { os, arch }
    }

    /// Facts for the machine running cafpack.
    pub const fn host() -> Self {
        PlatformFacts {
            os: Os::current(),
            arch: Arch::current(),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    pub fn is_macos(&self) -> bool {
        self.os == Os::Macos
    }

    pub fn is_x86(&self) -> bool {
        self.arch == Arch::X86
    }
}

impl fmt::Display for PlatformFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}
