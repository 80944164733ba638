//! libstdc++ ABI resolution.
//!
//! gcc 5 introduced a second libstdc++ ABI. Which one a toolchain uses by
//! default is a configure-time choice of the gcc installation, so the only
//! reliable way to find out is to ask the compiler.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::compiler::{CompilerIdentity, CompilerVersion};
use crate::util::process::{ProcessBuilder, ProcessError};

/// Marker gcc prints in its configure line when the new ABI is the default.
pub const NEW_ABI_MARKER: &str = "with-default-libstdcxx-abi=new";

/// Default deadline for the compiler probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// libstdc++ ABI variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LibcxxVariant {
    /// Pre-C++11 ABI
    #[serde(rename = "libstdc++")]
    Legacy,
    /// C++11 ABI
    #[serde(rename = "libstdc++11")]
    DualAbi,
}

impl LibcxxVariant {
    /// Name of the standard library setting.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LibcxxVariant::Legacy => "libstdc++",
            LibcxxVariant::DualAbi => "libstdc++11",
        }
    }

    /// Value for `_GLIBCXX_USE_CXX11_ABI`.
    pub const fn cxx11_abi_flag(&self) -> u8 {
        match self {
            LibcxxVariant::Legacy => 0,
            LibcxxVariant::DualAbi => 1,
        }
    }
}

impl fmt::Display for LibcxxVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of ABI resolution. `libcxx` is absent for non-gcc compilers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedAbi {
    pub libcxx: Option<LibcxxVariant>,
}

impl ResolvedAbi {
    pub const fn absent() -> Self {
        ResolvedAbi { libcxx: None }
    }

    pub const fn of(variant: LibcxxVariant) -> Self {
        ResolvedAbi {
            libcxx: Some(variant),
        }
    }
}

impl fmt::Display for ResolvedAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.libcxx {
            Some(variant) => write!(f, "{}", variant),
            None => f.write_str("(none)"),
        }
    }
}

/// What a compiler reported about its own configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    pub success: bool,
    pub stderr: String,
}

/// Capability to ask a compiler for its verbose version report.
pub trait CompilerProbe {
    fn probe(&self) -> Result<ProbeOutput, ProcessError>;
}

/// Runs `<compiler> --version -v` as a child process.
#[derive(Debug, Clone)]
pub struct ProcessProbe {
    program: PathBuf,
    timeout: Duration,
}

impl ProcessProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ProcessProbe {
            program: program.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ProcessProbe {
    fn default() -> Self {
        ProcessProbe::new("g++")
    }
}

impl CompilerProbe for ProcessProbe {
    fn probe(&self) -> Result<ProbeOutput, ProcessError> {
        let cmd = ProcessBuilder::new(&self.program)
            .args(["--version", "-v"])
            .env("LC_ALL", "C");
        tracing::debug!("Probing compiler ABI: {}", cmd.display_command());

        let output = cmd.exec_with_timeout(self.timeout)?;
        Ok(ProbeOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Resolve the standard library ABI for a compiler.
///
/// Only gcc has a choice. gcc older than 5 always uses the legacy ABI.
/// Newer gcc is probed; any probe failure falls back to the legacy ABI
/// with a warning.
pub fn resolve_abi(compiler: &CompilerIdentity, probe: &dyn CompilerProbe) -> ResolvedAbi {
    if !compiler.is_gcc() {
        return ResolvedAbi::absent();
    }

    if compiler.version < CompilerVersion::major_only(5) {
        return ResolvedAbi::of(LibcxxVariant::Legacy);
    }

    let variant = match probe.probe() {
        Ok(output) if output.success => {
            if output.stderr.contains(NEW_ABI_MARKER) {
                LibcxxVariant::DualAbi
            } else {
                LibcxxVariant::Legacy
            }
        }
        Ok(_) => {
            tracing::warn!(
                "Compiler probe exited with an error, assuming {}",
                LibcxxVariant::Legacy
            );
            LibcxxVariant::Legacy
        }
        Err(e) => {
            tracing::warn!("ABI detection failed ({}), assuming {}", e, LibcxxVariant::Legacy);
            LibcxxVariant::Legacy
        }
    };

    tracing::debug!("Resolved libcxx for {}: {}", compiler, variant);
    ResolvedAbi::of(variant)
}
