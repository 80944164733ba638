//! Package identifiers.
//!
//! Two builds whose settings and options are equal produce binary
//! compatible packages, so they share an id.

use crate::core::abi::ResolvedAbi;
use crate::core::compiler::CompilerIdentity;
use crate::core::options::BuildOptions;
use crate::core::platform::PlatformFacts;
use crate::util::hash::Fingerprint;

/// Inputs that determine binary compatibility.
#[derive(Debug, Clone, Copy)]
pub struct PackageSettings<'a> {
    pub platform: &'a PlatformFacts,
    pub compiler: &'a CompilerIdentity,
    pub abi: &'a ResolvedAbi,
    pub build_type: &'a str,
    pub options: &'a BuildOptions,
}

/// Compute the hex package id.
pub fn package_id(settings: &PackageSettings<'_>) -> String {
    let mut fp = Fingerprint::new();
    fp.update_kv("os", settings.platform.os.as_str())
        .update_kv("arch", settings.platform.arch.as_str())
        .update_kv("compiler", settings.compiler.family.as_str())
        .update_kv("compiler.version", &settings.compiler.version.normalized())
        .update_opt(settings.abi.libcxx.map(|v| v.as_str()))
        .update_kv("build_type", settings.build_type)
        .update_bool(settings.options.shared)
        .update_bool(settings.options.static_)
        .update_kv("log_level", settings.options.log_level.as_str());
    fp.finish()
}
