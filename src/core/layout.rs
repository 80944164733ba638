//! Package layout: which built files land where in the package.

use serde::Serialize;

use crate::core::options::BuildOptions;

/// Include destination shared by all public headers.
pub const INCLUDE_DIR: &str = "include/caf";
/// Library destination for every static and shared artifact.
pub const LIB_DIR: &str = "lib";
/// License destination.
pub const LICENSES_DIR: &str = "licenses";

/// Library subdirectories whose headers are public.
const HEADER_SOURCES: [&str; 2] = ["sources/libcaf_core/caf", "sources/libcaf_io/caf"];

/// Shared object extensions across platforms.
const SHARED_PATTERNS: [&str; 3] = ["*.dylib", "*.so", "*.so.*"];

/// Static archive extensions across platforms.
const STATIC_PATTERNS: [&str; 2] = ["*.a", "*.lib"];

/// One file collection rule, evaluated relative to the build root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRule {
    /// Glob matched against paths relative to `source`
    pub pattern: String,
    /// Directory searched, relative to the build root
    pub source: String,
    /// Directory written, relative to the package root
    pub destination: String,
    /// Preserve the path below `source` in the destination
    pub keep_path: bool,
    pub ignore_case: bool,
}

impl CollectionRule {
    fn new(pattern: &str, source: &str, destination: &str) -> Self {
        CollectionRule {
            pattern: pattern.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            keep_path: true,
            ignore_case: false,
        }
    }

    fn flatten(mut self) -> Self {
        self.keep_path = false;
        self
    }

    fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

/// Collection rules in priority order.
///
/// Library artifacts are collected by extension for every link mode; a
/// kind that was not built simply matches nothing.
pub fn artifact_manifest(_options: &BuildOptions) -> Vec<CollectionRule> {
    let headers = HEADER_SOURCES
        .iter()
        .map(|src| CollectionRule::new("*.hpp", src, INCLUDE_DIR));

    let libraries = SHARED_PATTERNS
        .iter()
        .chain(STATIC_PATTERNS.iter())
        .map(|pattern| CollectionRule::new(pattern, LIB_DIR, LIB_DIR));

    let licenses = std::iter::once(
        CollectionRule::new("license*", ".", LICENSES_DIR)
            .flatten()
            .ignore_case(),
    );

    headers.chain(libraries).chain(licenses).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::LogLevel;

    #[test]
    fn test_manifest_layout() {
        let rules = artifact_manifest(&BuildOptions::default());
        assert_eq!(rules.len(), 8);

        let headers: Vec<_> = rules.iter().filter(|r| r.pattern == "*.hpp").collect();
        assert_eq!(headers.len(), 2);
        assert!(headers.iter().all(|r| r.destination == INCLUDE_DIR && r.keep_path));
        assert_eq!(headers[0].source, "sources/libcaf_core/caf");
        assert_eq!(headers[1].source, "sources/libcaf_io/caf");

        let license = rules.last().unwrap();
        assert_eq!(license.pattern, "license*");
        assert_eq!(license.destination, LICENSES_DIR);
        assert!(license.ignore_case);
        assert!(!license.keep_path);
    }

    #[test]
    fn test_manifest_ignores_link_mode() {
        let shared_only = artifact_manifest(&BuildOptions::new(true, false, LogLevel::None));
        let static_only = artifact_manifest(&BuildOptions::new(false, true, LogLevel::Debug));
        assert_eq!(shared_only, static_only);

        let lib_patterns: Vec<_> = shared_only
            .iter()
            .filter(|r| r.destination == LIB_DIR)
            .map(|r| r.pattern.as_str())
            .collect();
        assert_eq!(lib_patterns, ["*.dylib", "*.so", "*.so.*", "*.a", "*.lib"]);
    }
}
