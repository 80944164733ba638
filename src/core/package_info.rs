//! Libraries a consumer links against.

use crate::core::options::BuildOptions;

pub const IO_SHARED: &str = "caf_io";
pub const CORE_SHARED: &str = "caf_core";
pub const IO_STATIC: &str = "caf_io_static";
pub const CORE_STATIC: &str = "caf_core_static";

/// Ordered link library names for the selected link modes.
///
/// The I/O layer precedes core in each pair, shared pair first.
// TODO: confirm io-before-core ordering against single-pass static linkers
// before changing it; existing consumers rely on this exact list.
pub fn link_libraries(options: &BuildOptions) -> Vec<String> {
    let mut libs = Vec::with_capacity(4);
    if options.shared {
        libs.extend([IO_SHARED, CORE_SHARED].map(String::from));
    }
    if options.static_ {
        libs.extend([IO_STATIC, CORE_STATIC].map(String::from));
    }
    libs
}
