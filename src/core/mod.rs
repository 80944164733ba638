//! Configuration and packaging decisions for CAF.
//!
//! Everything here is a pure function of its inputs, except ABI
//! resolution which asks the compiler through [`abi::CompilerProbe`]:
//! - Toolchain gating and option normalization
//! - libstdc++ ABI resolution
//! - CMake define composition
//! - Package layout, link libraries and package ids

pub mod abi;
pub mod compiler;
pub mod defines;
pub mod layout;
pub mod options;
pub mod package_id;
pub mod package_info;
pub mod platform;
pub mod recipe;
pub mod toolchain;

pub use abi::{resolve_abi, CompilerProbe, LibcxxVariant, ProcessProbe, ResolvedAbi};
pub use compiler::{CompilerFamily, CompilerIdentity, CompilerVersion};
pub use defines::{build_defines, DefineSet};
pub use layout::{artifact_manifest, CollectionRule};
pub use options::{resolve_options, BuildOptions, LogLevel, RawOptions};
pub use package_id::{package_id, PackageSettings};
pub use package_info::link_libraries;
pub use platform::{Arch, Os, PlatformFacts};
pub use toolchain::validate;
