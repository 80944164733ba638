//! CLI integration tests for cafpack.
//!
//! These tests drive the binary with explicit compiler identities so no
//! real toolchain is needed, except where a probe result is irrelevant.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the cafpack binary command, isolated from the user's global config.
fn cafpack(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cafpack").unwrap();
    cmd.env("HOME", home).env_remove("CXX").arg("--no-color");
    cmd
}

/// Create a temporary directory for workspaces.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn configure_json(tmp: &TempDir, extra: &[&str]) -> serde_json::Value {
    let output = cafpack(tmp.path())
        .arg("configure")
        .arg("--path")
        .arg(tmp.path())
        .args(["--os", "linux", "--arch", "x86_64", "--json"])
        .args(extra)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// cafpack configure
// ============================================================================

#[test]
fn test_configure_rejects_old_gcc() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["configure", "--compiler-family", "gcc", "--compiler-version", "4.7"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("gcc too old"))
        .stderr(predicate::str::contains("requires >= 4.8, found 4.7"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_configure_rejects_no_link_mode() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["configure", "--compiler-family", "clang", "--compiler-version", "6"])
        .args(["--shared", "false", "--static", "false"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no link mode selected"))
        .stderr(predicate::str::contains("--static true"));
}

#[test]
fn test_configure_rejects_unknown_log_level() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["configure", "--compiler-family", "clang", "--compiler-version", "6"])
        .args(["--log-level", "verbose"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value `verbose`"));
}

#[test]
fn test_configure_requires_family_and_version_together() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["configure", "--compiler-family", "gcc"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be given together"));
}

#[test]
fn test_configure_compares_versions_numerically() {
    let tmp = temp_dir();
    let config = configure_json(
        &tmp,
        &["--compiler-family", "clang", "--compiler-version", "3.10"],
    );

    assert_eq!(config["compiler"]["family"], "clang");
    assert_eq!(config["compiler"]["version"], "3.10");
    assert_eq!(config["options"]["shared"], false);
    assert_eq!(config["options"]["static"], true);
    assert!(config["abi"]["libcxx"].is_null());
    assert_eq!(config["defines"]["CAF_BUILD_STATIC_ONLY"], "ON");
    assert_eq!(config["defines"]["CMAKE_CXX_STANDARD"], "11");
    assert_eq!(config["package_id"].as_str().unwrap().len(), 64);
}

#[test]
fn test_configure_legacy_abi_for_gcc4() {
    let tmp = temp_dir();
    let config = configure_json(
        &tmp,
        &[
            "--compiler-family",
            "gcc",
            "--compiler-version",
            "4.9",
            "--log-level",
            "debug",
        ],
    );

    assert_eq!(config["abi"]["libcxx"], "libstdc++");
    assert_eq!(config["defines"]["CONAN_LIBCXX"], "libstdc++");
    assert_eq!(config["defines"]["CAF_LOG_LEVEL"], "DEBUG");
}

/// A gcc driver that reports the new libstdc++ ABI.
#[cfg(unix)]
fn fake_gcc(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("bin/g++-12");
    write(
        dir,
        "bin/g++-12",
        "#!/bin/sh\n\
         echo 'g++-12 (GCC) 12.2.0'\n\
         echo 'Configured with: ../configure --with-default-libstdcxx-abi=new' >&2\n",
    );
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_configure_probes_the_detected_compiler() {
    let tmp = temp_dir();
    let gcc = fake_gcc(tmp.path());

    // Only the compiler from CXX exists; there is no `g++` to fall back to
    let output = cafpack(tmp.path())
        .env("CXX", &gcc)
        .env("PATH", tmp.path().join("bin"))
        .arg("configure")
        .arg("--path")
        .arg(tmp.path())
        .args(["--os", "linux", "--arch", "x86_64", "--json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["compiler"]["family"], "gcc");
    assert_eq!(config["compiler"]["version"], "12.2.0");
    assert_eq!(config["abi"]["libcxx"], "libstdc++11");
    assert_eq!(
        config["defines"]["CMAKE_CXX_FLAGS"],
        "-D_GLIBCXX_USE_CXX11_ABI=1"
    );
}

#[test]
fn test_configure_windows_defines() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["configure", "--compiler-family", "msvc", "--compiler-version", "15"])
        .args(["--os", "windows", "--arch", "x86_64", "--shared", "true"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-DCAF_NO_OPENSSL=ON"))
        .stdout(predicate::str::contains("-DCAF_BUILD_STATIC=ON"))
        .stdout(predicate::str::contains("CAF_BUILD_STATIC_ONLY").not());
}

#[test]
fn test_configure_reads_project_config() {
    let tmp = temp_dir();
    write(
        tmp.path(),
        ".cafpack/config.toml",
        r#"
[options]
shared = true
static = false

[toolchain]
family = "clang"
version = "5.0"

[build]
build_type = "Debug"
"#,
    );

    let config = configure_json(&tmp, &[]);
    assert_eq!(config["compiler"]["family"], "clang");
    assert_eq!(config["options"]["shared"], true);
    assert_eq!(config["options"]["static"], false);
    assert_eq!(config["build_type"], "Debug");
    assert!(config["defines"].get("CAF_BUILD_STATIC").is_none());

    // Flags override the file
    let config = configure_json(&tmp, &["--static", "true", "--build-type", "Release"]);
    assert_eq!(config["options"]["static"], true);
    assert_eq!(config["build_type"], "Release");
    assert_eq!(config["defines"]["CAF_BUILD_STATIC"], "ON");
}

// ============================================================================
// cafpack package
// ============================================================================

#[test]
fn test_package_existing_build_tree() {
    let tmp = temp_dir();
    write(tmp.path(), "sources/LICENSE", "BSD");
    write(tmp.path(), "sources/libcaf_core/caf/actor.hpp", "");
    write(tmp.path(), "sources/libcaf_io/caf/io/broker.hpp", "");
    write(tmp.path(), "lib/libcaf_core_static.a", "");
    write(tmp.path(), "lib/libcaf_io_static.a", "");

    cafpack(tmp.path())
        .arg("package")
        .arg("--path")
        .arg(tmp.path())
        .args(["--compiler-family", "clang", "--compiler-version", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaged 5 file(s)"));

    let package_dir = tmp.path().join("package");
    assert!(package_dir.join("include/caf/actor.hpp").exists());
    assert!(package_dir.join("include/caf/io/broker.hpp").exists());
    assert!(package_dir.join("licenses/LICENSE").exists());

    let descriptor: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(package_dir.join("cafinfo.json")).unwrap())
            .unwrap();
    assert_eq!(descriptor["name"], "caf");
    assert_eq!(descriptor["version"], "0.15.5");
    assert_eq!(
        descriptor["libs"],
        serde_json::json!(["caf_io_static", "caf_core_static"])
    );
}

// ============================================================================
// cafpack info / matrix
// ============================================================================

#[test]
fn test_info_lists_libraries() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("caf 0.15.5"))
        .stdout(predicate::str::contains("caf_io_static"))
        .stdout(predicate::str::contains("caf_core_static"))
        .stdout(predicate::str::contains("include/caf"));
}

#[test]
fn test_info_json_for_both_link_modes() {
    let tmp = temp_dir();

    let output = cafpack(tmp.path())
        .args(["info", "--shared", "true", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        info["libs"],
        serde_json::json!(["caf_io", "caf_core", "caf_io_static", "caf_core_static"])
    );
    assert_eq!(info["layout"].as_array().unwrap().len(), 8);
}

#[test]
fn test_matrix_windows_static_only() {
    let tmp = temp_dir();

    let output = cafpack(tmp.path())
        .args(["matrix", "--os", "windows", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let matrix: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = matrix.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["shared"], false);
    assert_eq!(entries[0]["static"], true);
}

#[test]
fn test_matrix_linux() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["matrix", "--os", "linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared=true static=false"))
        .stdout(predicate::str::contains("shared=false static=true"))
        .stdout(predicate::str::contains("shared=true static=true"));
}

#[test]
fn test_unknown_os_rejected() {
    let tmp = temp_dir();

    cafpack(tmp.path())
        .args(["matrix", "--os", "plan9"])
        .assert()
        .failure();
}
