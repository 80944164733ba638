//! Native build collaborators.
//!
//! Compiler detection, source retrieval and the CMake driver.

pub mod cmake;
pub mod detect;
pub mod fetch;

pub use cmake::{BuildRequest, CMakeBuild, NativeBuild};
pub use detect::{detect_compiler, parse_version_banner};
pub use fetch::{ArchiveFetch, HttpFetch};
