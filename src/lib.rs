//! cafpack - Build configuration and packaging for the C++ Actor Framework
//!
//! This crate validates toolchains, resolves build options and the C++
//! standard library ABI, derives CMake defines, and packages the built
//! CAF libraries together with the metadata consumers link against.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use core::{BuildOptions, CompilerIdentity, DefineSet, PlatformFacts, ResolvedAbi};
pub use ops::{Configuration, PackageDescriptor};
pub use util::diagnostic::RecipeError;
