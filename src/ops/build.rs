//! Implementation of `cafpack build`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::builder::cmake::{is_cmake_project, BuildRequest, NativeBuild};
use crate::builder::fetch::ArchiveFetch;
use crate::core::recipe;
use crate::ops::configure::Configuration;
use crate::ops::package::{package, PackageDescriptor};
use crate::util::fs::write_string;

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Workspace root; sources, build outputs and the package live below it
    pub root: PathBuf,

    /// Archive to fetch when the sources are missing
    pub source_url: Url,

    /// Where the package is assembled, defaults to `<root>/package`
    pub package_dir: Option<PathBuf>,

    /// Run the native build with parallel jobs
    pub parallel: bool,
}

impl BuildOptions {
    /// Defaults for a workspace: upstream archive of `version`, parallel build.
    pub fn new(root: impl Into<PathBuf>, version: &str) -> Result<Self> {
        let source_url = parse_source_url(&recipe::source_url(version))?;
        Ok(BuildOptions {
            root: root.into(),
            source_url,
            package_dir: None,
            parallel: true,
        })
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(recipe::SOURCE_DIR)
    }

    pub fn package_dir(&self) -> PathBuf {
        self.package_dir
            .clone()
            .unwrap_or_else(|| self.root.join("package"))
    }
}

/// Parse a source archive URL.
pub fn parse_source_url(raw: &str) -> Result<Url> {
    Url::parse(raw).with_context(|| format!("invalid source URL: {}", raw))
}

/// Fetch, build and package CAF for `config`.
///
/// The native build runs with the workspace root as its build directory,
/// so built libraries land in `<root>/lib`.
pub fn build(
    config: &Configuration,
    opts: &BuildOptions,
    fetcher: &dyn ArchiveFetch,
    native: &dyn NativeBuild,
) -> Result<PackageDescriptor> {
    let source_dir = opts.source_dir();
    ensure_sources(&source_dir, &opts.source_url, fetcher)?;

    let request = BuildRequest {
        source_dir: &source_dir,
        build_dir: &opts.root,
        defines: &config.defines,
        build_type: &config.build_type,
        parallel: opts.parallel,
    };
    native.build(&request)?;

    package(config, &opts.root, &opts.package_dir())
}

/// Records which archive a fetched source tree came from.
const SOURCE_MARKER: &str = ".cafpack-source";

fn ensure_sources(source_dir: &Path, url: &Url, fetcher: &dyn ArchiveFetch) -> Result<()> {
    if source_dir.exists() {
        check_source_origin(source_dir, url)?;
    } else {
        fetcher.fetch(url, source_dir)?;
        write_string(&source_dir.join(SOURCE_MARKER), url.as_str())?;
    }

    if !is_cmake_project(source_dir) {
        anyhow::bail!(
            "no CMakeLists.txt in {}\n\
             hint: remove the directory to fetch fresh sources",
            source_dir.display()
        );
    }
    Ok(())
}

/// Refuse to reuse sources fetched from a different archive.
///
/// Trees without a marker were put there by hand and are trusted.
fn check_source_origin(source_dir: &Path, url: &Url) -> Result<()> {
    let marker = source_dir.join(SOURCE_MARKER);
    if !marker.exists() {
        tracing::info!(
            "Using existing sources in {} (requested {}, origin unknown)",
            source_dir.display(),
            url
        );
        return Ok(());
    }

    let origin = std::fs::read_to_string(&marker)
        .with_context(|| format!("failed to read {}", marker.display()))?;
    let origin = origin.trim();
    if origin != url.as_str() {
        anyhow::bail!(
            "sources in {} were fetched from {}, but {} was requested\n\
             hint: remove the directory to fetch fresh sources",
            source_dir.display(),
            origin,
            url
        );
    }

    tracing::info!("Using existing sources in {} ({})", source_dir.display(), url);
    Ok(())
}
