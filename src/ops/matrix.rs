//! Option combinations worth building for a platform.

use crate::core::options::{BuildOptions, LogLevel};
use crate::core::platform::PlatformFacts;

/// The option sets a release build covers on `platform`.
///
/// Windows only ships static libraries, so its matrix has a single entry.
/// Elsewhere each link mode is built alone and both together.
pub fn build_matrix(platform: &PlatformFacts) -> Vec<BuildOptions> {
    if platform.is_windows() {
        return vec![BuildOptions::new(false, true, LogLevel::None)];
    }

    vec![
        BuildOptions::new(false, true, LogLevel::None),
        BuildOptions::new(true, false, LogLevel::None),
        BuildOptions::new(true, true, LogLevel::None),
    ]
}
