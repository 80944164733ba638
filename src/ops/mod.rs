//! High-level operations.
//!
//! This module contains the implementation of cafpack commands.

pub mod build;
pub mod configure;
pub mod matrix;
pub mod package;

pub use build::{build, parse_source_url, BuildOptions};
pub use configure::{configure, ConfigureRequest, Configuration};
pub use matrix::build_matrix;
pub use package::{package, CollectedFile, PackageDescriptor, DESCRIPTOR_NAME};
