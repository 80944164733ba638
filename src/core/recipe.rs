//! Metadata for the packaged library.

/// Package name.
pub const NAME: &str = "caf";
/// Upstream version packaged by default.
pub const VERSION: &str = "0.15.5";
pub const DESCRIPTION: &str = "An open source implementation of the Actor Model in C++";
pub const HOMEPAGE: &str = "http://actor-framework.org";
pub const LICENSE: &str = "BSD-3-Clause";

/// Upstream repository; release archives live under `/archive/`.
pub const PROJECT_URL: &str = "https://github.com/actor-framework/actor-framework";

/// Directory the extracted sources are moved to, relative to the workspace.
pub const SOURCE_DIR: &str = "sources";

/// Release archive URL for a version.
pub fn source_url(version: &str) -> String {
    format!("{}/archive/{}.tar.gz", PROJECT_URL, version)
}
