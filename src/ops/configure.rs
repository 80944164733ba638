//! Configure stage: from raw inputs to a frozen build configuration.

use serde::Serialize;

use crate::core::abi::{resolve_abi, CompilerProbe, ResolvedAbi};
use crate::core::compiler::CompilerIdentity;
use crate::core::defines::{build_defines, DefineSet};
use crate::core::options::{resolve_options, BuildOptions, RawOptions};
use crate::core::package_id::{package_id, PackageSettings};
use crate::core::platform::PlatformFacts;
use crate::core::toolchain::validate;
use crate::util::diagnostic::RecipeError;

/// Inputs to the configure stage.
#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    pub platform: PlatformFacts,
    pub compiler: CompilerIdentity,
    pub options: RawOptions,
    pub build_type: String,
}

/// A validated configuration. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    pub platform: PlatformFacts,
    pub compiler: CompilerIdentity,
    pub options: BuildOptions,
    pub abi: ResolvedAbi,
    pub build_type: String,
    pub defines: DefineSet,
}

impl Configuration {
    /// Settings that determine binary compatibility.
    pub fn settings(&self) -> PackageSettings<'_> {
        PackageSettings {
            platform: &self.platform,
            compiler: &self.compiler,
            abi: &self.abi,
            build_type: &self.build_type,
            options: &self.options,
        }
    }

    pub fn package_id(&self) -> String {
        package_id(&self.settings())
    }
}

/// Run every pre-flight step in order, stopping at the first fatal error.
///
/// The probe is consulted at most once; its answer is stored in the
/// returned configuration.
pub fn configure(
    request: &ConfigureRequest,
    probe: &dyn CompilerProbe,
) -> Result<Configuration, RecipeError> {
    let options = resolve_options(&request.options)?;
    validate(&request.compiler, &options)?;

    let abi = resolve_abi(&request.compiler, probe);
    let defines = build_defines(&request.platform, &options, &abi)?;

    tracing::info!(
        "Configured {} on {} ({})",
        request.compiler,
        request.platform,
        options
    );

    Ok(Configuration {
        platform: request.platform,
        compiler: request.compiler.clone(),
        options,
        abi,
        build_type: request.build_type.clone(),
        defines,
    })
}
