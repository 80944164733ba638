//! Native build through CMake.

use std::path::{Path, PathBuf};

use crate::core::defines::DefineSet;
use crate::util::diagnostic::RecipeError;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Everything the native build needs.
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    /// Directory containing the top-level `CMakeLists.txt`
    pub source_dir: &'a Path,
    /// Out-of-source build directory
    pub build_dir: &'a Path,
    pub defines: &'a DefineSet,
    /// `CMAKE_BUILD_TYPE` / multi-config `--config`
    pub build_type: &'a str,
    pub parallel: bool,
}

/// The native build collaborator. Returns pass/fail only.
pub trait NativeBuild {
    fn build(&self, request: &BuildRequest<'_>) -> Result<(), RecipeError>;
}

/// CMake build adapter.
#[derive(Debug, Clone)]
pub struct CMakeBuild {
    cmake: PathBuf,
}

impl CMakeBuild {
    /// Use the `cmake` found in PATH.
    pub fn new() -> Result<Self, RecipeError> {
        match find_cmake() {
            Some(cmake) => Ok(CMakeBuild { cmake }),
            None => Err(RecipeError::NativeBuildFailure {
                stage: "setup".to_string(),
                output: "CMake not found\n\
                         \n\
                         CMake is required to build CAF.\n\
                         Install CMake and ensure it's in your PATH."
                    .to_string(),
            }),
        }
    }

    /// Use a specific cmake binary.
    pub fn with_program(cmake: impl Into<PathBuf>) -> Self {
        CMakeBuild {
            cmake: cmake.into(),
        }
    }

    /// Arguments for the configure step.
    pub fn configure_args(request: &BuildRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            request.source_dir.display().to_string(),
            "-B".to_string(),
            request.build_dir.display().to_string(),
            format!("-DCMAKE_BUILD_TYPE={}", request.build_type),
        ];
        args.extend(request.defines.to_cmake_args());
        args
    }

    /// Arguments for the build step.
    pub fn build_args(request: &BuildRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            request.build_dir.display().to_string(),
        ];
        if request.parallel {
            args.push("--parallel".to_string());
        }
        // Multi-config generators (Visual Studio, Xcode) ignore CMAKE_BUILD_TYPE
        args.push("--config".to_string());
        args.push(request.build_type.to_string());
        args
    }

    fn run(&self, stage: &str, args: Vec<String>) -> Result<(), RecipeError> {
        let cmd = ProcessBuilder::new(&self.cmake).args(args);
        tracing::debug!("Running: {}", cmd.display_command());

        let output = cmd.exec().map_err(|e| RecipeError::NativeBuildFailure {
            stage: stage.to_string(),
            output: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(RecipeError::NativeBuildFailure {
                stage: stage.to_string(),
                output: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

impl NativeBuild for CMakeBuild {
    fn build(&self, request: &BuildRequest<'_>) -> Result<(), RecipeError> {
        std::fs::create_dir_all(request.build_dir).map_err(|e| {
            RecipeError::NativeBuildFailure {
                stage: "setup".to_string(),
                output: format!(
                    "failed to create build directory {}: {}",
                    request.build_dir.display(),
                    e
                ),
            }
        })?;

        tracing::info!("Configuring CMake project");
        self.run("configure", Self::configure_args(request))?;

        tracing::info!("Building CMake project");
        self.run("build", Self::build_args(request))
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn defines() -> DefineSet {
        let mut set = DefineSet::new();
        set.insert("CMAKE_CXX_STANDARD", "11").unwrap();
        set.insert("CAF_NO_EXAMPLES", "ON").unwrap();
        set
    }

    #[test]
    fn test_configure_args() {
        let defines = defines();
        let request = BuildRequest {
            source_dir: Path::new("sources"),
            build_dir: Path::new("sources/build"),
            defines: &defines,
            build_type: "Release",
            parallel: true,
        };

        let args = CMakeBuild::configure_args(&request);
        assert_eq!(
            args,
            [
                "-S",
                "sources",
                "-B",
                "sources/build",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DCAF_NO_EXAMPLES=ON",
                "-DCMAKE_CXX_STANDARD=11",
            ]
        );

        let args = CMakeBuild::build_args(&request);
        assert_eq!(
            args,
            ["--build", "sources/build", "--parallel", "--config", "Release"]
        );
    }

    #[test]
    fn test_missing_cmake_binary_fails() {
        let tmp = TempDir::new().unwrap();
        let defines = defines();
        let build_dir = tmp.path().join("build");
        let request = BuildRequest {
            source_dir: tmp.path(),
            build_dir: &build_dir,
            defines: &defines,
            build_type: "Release",
            parallel: false,
        };

        let err = CMakeBuild::with_program(tmp.path().join("no-cmake-here"))
            .build(&request)
            .unwrap_err();
        assert!(matches!(
            err,
            RecipeError::NativeBuildFailure { ref stage, .. } if stage == "configure"
        ));
    }

    #[test]
    fn test_is_cmake_project() {
        let tmp = TempDir::new().unwrap();

        assert!(!is_cmake_project(tmp.path()));

        std::fs::write(
            tmp.path().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.10)",
        )
        .unwrap();

        assert!(is_cmake_project(tmp.path()));
    }
}
