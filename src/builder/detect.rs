//! Compiler detection from version banners.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::core::compiler::{CompilerFamily, CompilerIdentity, CompilerVersion};
use crate::util::process::ProcessBuilder;

static MSVC_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Microsoft \(R\) C/C\+\+ Optimizing Compiler Version (\d+)\.(\d+)")
        .expect("valid regex")
});

static CLANG_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(Apple )?(?:\S+ )?clang version (\d+(?:\.\d+)*)").expect("valid regex")
});

static GCC_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\S*(?:g\+\+|gcc|c\+\+)(?:-\d+)?(?:\.exe)? \(.*\) (\d+(?:\.\d+)*)")
        .expect("valid regex")
});

/// Visual Studio major version for a `cl.exe` compiler version.
fn msvc_toolset(major: u64, minor: u64) -> Option<u64> {
    match (major, minor) {
        (19, 0..=9) => Some(14),
        (19, 10..=19) => Some(15),
        (19, 20..=29) => Some(16),
        (19, 30..) => Some(17),
        (18, _) => Some(12),
        (17, _) => Some(11),
        _ => None,
    }
}

/// Identify a compiler from its `--version` output.
pub fn parse_version_banner(text: &str) -> Option<CompilerIdentity> {
    if let Some(caps) = MSVC_BANNER.captures(text) {
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let toolset = msvc_toolset(major, minor)?;
        return Some(CompilerIdentity::new(
            CompilerFamily::Msvc,
            CompilerVersion::major_only(toolset),
        ));
    }

    if let Some(caps) = CLANG_BANNER.captures(text) {
        let family = if caps.get(1).is_some() {
            CompilerFamily::Other("apple-clang".to_string())
        } else {
            CompilerFamily::Clang
        };
        let version = caps[2].parse().ok()?;
        return Some(CompilerIdentity::new(family, version));
    }

    if let Some(caps) = GCC_BANNER.captures(text) {
        let version = caps[1].parse().ok()?;
        return Some(CompilerIdentity::new(CompilerFamily::Gcc, version));
    }

    None
}

/// Run a compiler and identify it from its version banner.
pub fn detect_compiler(compiler: &Path, timeout: Duration) -> Result<CompilerIdentity> {
    let cmd = ProcessBuilder::new(compiler)
        .arg("--version")
        .env("LC_ALL", "C");
    tracing::debug!("Detecting compiler: {}", cmd.display_command());

    let output = cmd
        .exec_with_timeout(timeout)
        .with_context(|| format!("failed to query compiler version: {}", compiler.display()))?;

    // cl.exe prints its banner on stderr
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    match parse_version_banner(&text) {
        Some(identity) => {
            tracing::info!("Detected compiler {} at {}", identity, compiler.display());
            Ok(identity)
        }
        None => bail!(
            "could not identify compiler `{}`\n\
             \n\
             Pass `--compiler-family` and `--compiler-version` explicitly.",
            compiler.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gcc_banner() {
        let banner = "g++ (Ubuntu 9.4.0-1ubuntu1~20.04.1) 9.4.0\n\
                      Copyright (C) 2019 Free Software Foundation, Inc.\n";
        let id = parse_version_banner(banner).unwrap();
        assert_eq!(id.family, CompilerFamily::Gcc);
        assert_eq!(id.version.as_str(), "9.4.0");

        let banner = "gcc (GCC) 11.2.1 20211203 (Red Hat 11.2.1-7)\n";
        let id = parse_version_banner(banner).unwrap();
        assert_eq!(id.version, "11.2.1".parse().unwrap());

        let banner = "x86_64-linux-gnu-g++-10 (Debian 10.2.1-6) 10.2.1 20210110\n";
        assert!(parse_version_banner(banner).unwrap().is_gcc());
    }

    #[test]
    fn test_parse_clang_banner() {
        let banner = "clang version 3.10.0 (tags/RELEASE_310/final)\nTarget: x86_64-pc-linux-gnu\n";
        let id = parse_version_banner(banner).unwrap();
        assert_eq!(id.family, CompilerFamily::Clang);
        assert_eq!(id.version.as_str(), "3.10.0");

        let banner = "Ubuntu clang version 14.0.0-1ubuntu1\n";
        assert_eq!(parse_version_banner(banner).unwrap().family, CompilerFamily::Clang);
    }

    #[test]
    fn test_parse_apple_clang_banner() {
        let banner = "Apple clang version 13.0.0 (clang-1300.0.29.30)\n";
        let id = parse_version_banner(banner).unwrap();
        assert_eq!(id.family, CompilerFamily::Other("apple-clang".to_string()));
    }

    #[test]
    fn test_parse_msvc_banner() {
        let banner = "Microsoft (R) C/C++ Optimizing Compiler Version 19.29.30133 for x64\n";
        let id = parse_version_banner(banner).unwrap();
        assert_eq!(id.family, CompilerFamily::Msvc);
        assert_eq!(id.version.as_str(), "16");

        let banner = "Microsoft (R) C/C++ Optimizing Compiler Version 18.00.40629 for x86\n";
        assert_eq!(parse_version_banner(banner).unwrap().version.as_str(), "12");
    }

    #[test]
    fn test_unknown_banner() {
        assert!(parse_version_banner("tcc version 0.9.27\n").is_none());
    }
}
