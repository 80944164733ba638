//! Package stage: collect built files and describe the package.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::defines::DefineSet;
use crate::core::layout::{artifact_manifest, CollectionRule};
use crate::core::options::BuildOptions;
use crate::core::package_info::link_libraries;
use crate::core::recipe;
use crate::ops::configure::Configuration;
use crate::util::fs::{copy_file, ensure_dir, find_matching, write_string};

/// Name of the descriptor written into the package folder.
pub const DESCRIPTOR_NAME: &str = "cafinfo.json";

/// One file copied into the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedFile {
    /// Relative to the build root
    pub source: PathBuf,
    /// Relative to the package root
    pub destination: PathBuf,
}

/// Metadata consumed by downstream dependency resolution.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    pub license: String,
    pub package_id: String,
    pub settings: BTreeMap<String, String>,
    pub options: BuildOptions,
    pub defines: DefineSet,
    pub libs: Vec<String>,
    pub files: Vec<CollectedFile>,
}

/// Apply the collection rules of `config` to `build_root`, writing into
/// `package_dir`.
pub fn package(
    config: &Configuration,
    build_root: &Path,
    package_dir: &Path,
) -> Result<PackageDescriptor> {
    ensure_dir(package_dir)?;

    let rules = artifact_manifest(&config.options);
    let mut files = Vec::new();
    for rule in &rules {
        let collected = collect(rule, build_root, package_dir)?;
        tracing::debug!(
            "{} from {}: {} file(s)",
            rule.pattern,
            rule.source,
            collected.len()
        );
        files.extend(collected);
    }

    let descriptor = PackageDescriptor {
        name: recipe::NAME.to_string(),
        version: recipe::VERSION.to_string(),
        license: recipe::LICENSE.to_string(),
        package_id: config.package_id(),
        settings: settings_map(config),
        options: config.options,
        defines: config.defines.clone(),
        libs: link_libraries(&config.options),
        files,
    };

    let json = serde_json::to_string_pretty(&descriptor)
        .context("failed to serialize package descriptor")?;
    write_string(&package_dir.join(DESCRIPTOR_NAME), &json)?;

    tracing::info!(
        "Packaged {} file(s) into {}",
        descriptor.files.len(),
        package_dir.display()
    );
    Ok(descriptor)
}

/// Copy the files one rule selects. Unmatched rules copy nothing.
fn collect(rule: &CollectionRule, build_root: &Path, package_dir: &Path) -> Result<Vec<CollectedFile>> {
    let source_dir = build_root.join(&rule.source);
    let matches = find_matching(&source_dir, &rule.pattern, rule.ignore_case, &[package_dir])
        .with_context(|| format!("failed to collect `{}` from {}", rule.pattern, rule.source))?;

    let mut collected = Vec::with_capacity(matches.len());
    for relative in matches {
        let destination = if rule.keep_path {
            Path::new(&rule.destination).join(&relative)
        } else {
            // Flattened: a rule without keep_path always yields file names
            let Some(name) = relative.file_name() else {
                continue;
            };
            Path::new(&rule.destination).join(name)
        };

        copy_file(&source_dir.join(&relative), &package_dir.join(&destination))?;
        collected.push(CollectedFile {
            source: Path::new(&rule.source).join(&relative),
            destination,
        });
    }

    Ok(collected)
}

fn settings_map(config: &Configuration) -> BTreeMap<String, String> {
    let mut settings = BTreeMap::new();
    settings.insert("os".to_string(), config.platform.os.to_string());
    settings.insert("arch".to_string(), config.platform.arch.to_string());
    settings.insert("compiler".to_string(), config.compiler.family.to_string());
    settings.insert(
        "compiler.version".to_string(),
        config.compiler.version.to_string(),
    );
    if let Some(libcxx) = config.abi.libcxx {
        settings.insert("compiler.libcxx".to_string(), libcxx.to_string());
    }
    settings.insert("build_type".to_string(), config.build_type.clone());
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::abi::{LibcxxVariant, ResolvedAbi};
    use crate::core::compiler::CompilerIdentity;
    use crate::core::defines::build_defines;
    use crate::core::options::LogLevel;
    use crate::core::platform::{Arch, Os, PlatformFacts};
    use tempfile::TempDir;

    fn configuration(options: BuildOptions) -> Configuration {
        let platform = PlatformFacts::new(Os::Linux, Arch::X86_64);
        let abi = ResolvedAbi::of(LibcxxVariant::DualAbi);
        Configuration {
            platform,
            compiler: CompilerIdentity::parse("gcc", "9").unwrap(),
            options,
            abi,
            build_type: "Release".to_string(),
            defines: build_defines(&platform, &options, &abi).unwrap(),
        }
    }

    fn touch(root: &Path, rel: &str) {
        write_string(&root.join(rel), rel).unwrap();
    }

    /// A build tree shaped like a finished CAF build.
    fn build_tree(root: &Path) {
        touch(root, "sources/LICENSE");
        touch(root, "sources/libcaf_core/caf/actor.hpp");
        touch(root, "sources/libcaf_core/caf/detail/type_list.hpp");
        touch(root, "sources/libcaf_core/src/actor.cpp");
        touch(root, "sources/libcaf_io/caf/io/broker.hpp");
        touch(root, "sources/libcaf_io/caf/io/License.txt");
        touch(root, "lib/libcaf_core_static.a");
        touch(root, "lib/libcaf_io_static.a");
        touch(root, "lib/CMakeLists.txt");
    }

    #[test]
    fn test_package_layout() {
        let tmp = TempDir::new().unwrap();
        build_tree(tmp.path());
        let package_dir = tmp.path().join("package");

        let descriptor = package(&configuration(BuildOptions::default()), tmp.path(), &package_dir)
            .unwrap();

        // Headers from both libraries merged, subpaths kept
        assert!(package_dir.join("include/caf/actor.hpp").exists());
        assert!(package_dir.join("include/caf/detail/type_list.hpp").exists());
        assert!(package_dir.join("include/caf/io/broker.hpp").exists());
        assert!(!package_dir.join("include/caf/actor.cpp").exists());

        // Libraries by extension only
        assert!(package_dir.join("lib/libcaf_core_static.a").exists());
        assert!(package_dir.join("lib/libcaf_io_static.a").exists());
        assert!(!package_dir.join("lib/CMakeLists.txt").exists());

        // Licenses flattened regardless of case
        assert!(package_dir.join("licenses/LICENSE").exists());
        assert!(package_dir.join("licenses/License.txt").exists());

        assert_eq!(descriptor.files.len(), 7);
        assert_eq!(descriptor.libs, ["caf_io_static", "caf_core_static"]);
        assert_eq!(descriptor.settings["compiler.libcxx"], "libstdc++11");
        assert!(package_dir.join(DESCRIPTOR_NAME).exists());
    }

    #[test]
    fn test_shared_only_still_collects_static_rules() {
        let tmp = TempDir::new().unwrap();
        build_tree(tmp.path());
        let package_dir = tmp.path().join("package");

        let options = BuildOptions::new(true, false, LogLevel::None);
        let descriptor = package(&configuration(options), tmp.path(), &package_dir).unwrap();

        // Static archives present in the tree are collected anyway
        assert!(package_dir.join("lib/libcaf_core_static.a").exists());
        assert_eq!(descriptor.libs, ["caf_io", "caf_core"]);
    }

    #[test]
    fn test_repackaging_ignores_previous_package() {
        let tmp = TempDir::new().unwrap();
        build_tree(tmp.path());
        let package_dir = tmp.path().join("package");
        let config = configuration(BuildOptions::default());

        let first = package(&config, tmp.path(), &package_dir).unwrap();
        let second = package(&config, tmp.path(), &package_dir).unwrap();
        assert_eq!(first.files, second.files);
    }

    #[test]
    fn test_empty_tree_packages_nothing() {
        let tmp = TempDir::new().unwrap();
        let package_dir = tmp.path().join("package");

        let descriptor = package(&configuration(BuildOptions::default()), tmp.path(), &package_dir)
            .unwrap();
        assert!(descriptor.files.is_empty());

        let json = std::fs::read_to_string(package_dir.join(DESCRIPTOR_NAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "caf");
        assert_eq!(value["options"]["static"], true);
        assert_eq!(value["defines"]["CAF_BUILD_STATIC_ONLY"], "ON");
    }
}
