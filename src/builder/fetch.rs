//! Source archive retrieval.

use std::path::Path;

use anyhow::{bail, Context, Result};
use url::Url;

use crate::util::fs::remove_dir_all_if_exists;
use crate::util::hash::sha256_bytes;

/// The archive fetch collaborator.
pub trait ArchiveFetch {
    /// Download `url` and extract it so its single top-level directory
    /// ends up at `dest`.
    fn fetch(&self, url: &Url, dest: &Path) -> Result<()>;
}

/// Downloads `.tar.gz` archives over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpFetch;

impl ArchiveFetch for HttpFetch {
    fn fetch(&self, url: &Url, dest: &Path) -> Result<()> {
        tracing::info!("Fetching sources from {}", url);

        let response = reqwest::blocking::get(url.as_str())
            .with_context(|| format!("failed to download archive from {}", url))?;

        if !response.status().is_success() {
            bail!(
                "failed to download archive from {}: HTTP {}",
                url,
                response.status()
            );
        }

        let bytes = response
            .bytes()
            .with_context(|| "failed to read archive response body")?;

        tracing::debug!(
            "Downloaded {} bytes (sha256 {})",
            bytes.len(),
            sha256_bytes(&bytes)
        );

        unpack_into(&bytes, dest)
            .with_context(|| format!("failed to extract archive from {}", url))
    }
}

/// Extract an archive next to `dest`, then move its top-level directory to `dest`.
pub fn unpack_into(data: &[u8], dest: &Path) -> Result<()> {
    if dest.exists() {
        bail!("destination already exists: {}", dest.display());
    }

    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let staging = parent.join(".cafpack-extract");

    remove_dir_all_if_exists(&staging)?;
    extract_tarball(data, &staging)?;
    let root = single_root(&staging)?;

    std::fs::rename(&root, dest).with_context(|| {
        format!("failed to move {} to {}", root.display(), dest.display())
    })?;
    remove_dir_all_if_exists(&staging)?;

    tracing::info!("Extracted sources to {}", dest.display());
    Ok(())
}

/// The only directory inside `dir`.
fn single_root(dir: &Path) -> Result<std::path::PathBuf> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }

    match dirs.as_slice() {
        [root] => Ok(root.clone()),
        [] => bail!("archive contains no top-level directory"),
        _ => bail!(
            "archive contains {} top-level directories, expected one",
            dirs.len()
        ),
    }
}

/// Extract a gzipped tarball into `dest`.
///
/// Entries that would escape `dest` are rejected.
pub fn extract_tarball(data: &[u8], dest: &Path) -> Result<()> {
    use flate2::read::GzDecoder;
    use std::io::Cursor;
    use tar::Archive;

    let decoder = GzDecoder::new(Cursor::new(data));
    let mut archive = Archive::new(decoder);

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    for entry in archive
        .entries()
        .context("failed to read tarball entries")?
    {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry.path().context("failed to get entry path")?.into_owned();

        // unpack_in refuses absolute paths and `..` components
        let unpacked = entry.unpack_in(dest).with_context(|| {
            format!("failed to extract entry: {}", entry_path.display())
        })?;

        if !unpacked {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }
    }

    Ok(())
}
