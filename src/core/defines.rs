//! CMake define composition.
//!
//! The define set is a fold over a fixed, ordered rule table. Each rule
//! is a predicate over the build inputs plus the defines it contributes.
//! A rule may repeat a define with the same value, but never change one.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::abi::ResolvedAbi;
use crate::core::options::{BuildOptions, LogLevel};
use crate::core::platform::PlatformFacts;
use crate::util::diagnostic::RecipeError;

/// Name → value mapping passed to CMake as `-DNAME=VALUE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefineSet {
    defines: BTreeMap<String, String>,
}

impl DefineSet {
    pub fn new() -> Self {
        DefineSet::default()
    }

    /// Set a define. Re-setting the same value is a no-op.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RecipeError> {
        let name = name.into();
        let value = value.into();

        match self.defines.get(&name) {
            Some(existing) if *existing != value => Err(RecipeError::DefineConflict {
                name,
                existing: existing.clone(),
                attempted: value,
            }),
            Some(_) => Ok(()),
            None => {
                self.defines.insert(name, value);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `-DNAME=VALUE` arguments in name order.
    pub fn to_cmake_args(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("-D{}={}", name, value))
            .collect()
    }
}

impl fmt::Display for DefineSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct DefineInputs<'a> {
    pub platform: &'a PlatformFacts,
    pub options: &'a BuildOptions,
    pub abi: &'a ResolvedAbi,
}

/// One composition rule: when `applies` holds, `defines` are added.
struct Rule {
    name: &'static str,
    applies: fn(&DefineInputs<'_>) -> bool,
    defines: fn(&DefineInputs<'_>) -> Vec<(&'static str, String)>,
}

const ON: &str = "ON";

fn on(name: &'static str) -> (&'static str, String) {
    (name, ON.to_string())
}

/// Composition rules, applied in order.
const RULES: &[Rule] = &[
    Rule {
        name: "language standard",
        applies: |_| true,
        defines: |_| vec![("CMAKE_CXX_STANDARD", "11".to_string())],
    },
    Rule {
        // OpenSSL cannot be located reliably on these targets
        name: "disable openssl",
        applies: |i| i.platform.is_windows() || i.platform.is_x86(),
        defines: |_| vec![on("CAF_NO_OPENSSL")],
    },
    Rule {
        name: "library only",
        applies: |_| true,
        defines: |_| {
            vec![
                on("CAF_NO_EXAMPLES"),
                on("CAF_NO_TOOLS"),
                on("CAF_NO_UNIT_TESTS"),
                on("CAF_NO_PYTHON"),
            ]
        },
    },
    Rule {
        name: "32-bit macos",
        applies: |i| i.platform.is_macos() && i.platform.is_x86(),
        defines: |_| vec![("CMAKE_OSX_ARCHITECTURES", "i386".to_string())],
    },
    Rule {
        name: "static linkage",
        applies: |i| i.options.static_,
        defines: |i| {
            if i.options.shared {
                vec![on("CAF_BUILD_STATIC")]
            } else {
                vec![on("CAF_BUILD_STATIC_ONLY")]
            }
        },
    },
    Rule {
        name: "log level",
        applies: |i| i.options.log_level != LogLevel::None,
        defines: |i| vec![("CAF_LOG_LEVEL", i.options.log_level.to_string())],
    },
    Rule {
        name: "libstdc++ abi",
        applies: |i| i.abi.libcxx.is_some(),
        defines: |i| match i.abi.libcxx {
            Some(variant) => vec![
                ("CONAN_LIBCXX", variant.as_str().to_string()),
                (
                    "CMAKE_CXX_FLAGS",
                    format!("-D_GLIBCXX_USE_CXX11_ABI={}", variant.cxx11_abi_flag()),
                ),
            ],
            None => Vec::new(),
        },
    },
];

/// Compose the define set for a build.
pub fn build_defines(
    platform: &PlatformFacts,
    options: &BuildOptions,
    abi: &ResolvedAbi,
) -> Result<DefineSet, RecipeError> {
    let inputs = DefineInputs {
        platform,
        options,
        abi,
    };

    RULES
        .iter()
        .filter(|rule| (rule.applies)(&inputs))
        .try_fold(DefineSet::new(), |mut set, rule| {
            tracing::trace!("Applying define rule: {}", rule.name);
            for (name, value) in (rule.defines)(&inputs) {
                set.insert(name, value)?;
            }
            Ok(set)
        })
}
