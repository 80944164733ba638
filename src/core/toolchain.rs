//! Pre-flight toolchain gate.
//!
//! Rejects compilers that cannot build the library and option sets that
//! select no link mode, before any source is fetched or built.

use crate::core::compiler::{CompilerFamily, CompilerIdentity, CompilerVersion};
use crate::core::options::BuildOptions;
use crate::util::diagnostic::RecipeError;

/// Oldest supported version for a compiler family, if it has one.
pub fn minimum_version(family: &CompilerFamily) -> Option<CompilerVersion> {
    match family {
        CompilerFamily::Gcc => Some(CompilerVersion::new(4, 8)),
        CompilerFamily::Clang => Some(CompilerVersion::new(3, 4)),
        CompilerFamily::Msvc => Some(CompilerVersion::major_only(14)),
        CompilerFamily::Other(_) => None,
    }
}

/// Check the compiler and link mode. Versions compare numerically.
pub fn validate(compiler: &CompilerIdentity, options: &BuildOptions) -> Result<(), RecipeError> {
    if let Some(minimum) = minimum_version(&compiler.family) {
        if compiler.version < minimum {
            return Err(RecipeError::too_old(
                compiler.family.as_str(),
                minimum,
                &compiler.version,
            ));
        }
    }

    check_link_mode(options)?;

    tracing::debug!("Toolchain {} accepted", compiler);
    Ok(())
}

/// At least one of shared or static must be selected.
pub fn check_link_mode(options: &BuildOptions) -> Result<(), RecipeError> {
    if !options.shared && !options.static_ {
        return Err(RecipeError::UnsupportedToolchain {
            reason: "no link mode selected".to_string(),
            minimum: None,
            found: None,
        });
    }
    Ok(())
}
