//! `cafpack toolchain` command

use anyhow::Result;

use crate::cli::ToolchainArgs;
use cafpack::builder::detect_compiler;
use cafpack::core::{resolve_abi, PlatformFacts, ProcessProbe};
use cafpack::core::toolchain::minimum_version;
use cafpack::util::config::load_project_config;
use cafpack::util::process::{find_cmake, find_cxx_compiler};

pub fn execute(args: ToolchainArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let config = load_project_config(&root);
    let timeout = config.probe_timeout();

    println!("Toolchain:");
    println!();

    let compiler = args
        .compiler
        .or(config.toolchain.compiler)
        .or_else(find_cxx_compiler);

    match compiler {
        Some(path) => {
            println!("  CXX:      {}", path.display());
            match detect_compiler(&path, timeout) {
                Ok(identity) => {
                    println!("            {}", identity);
                    match minimum_version(&identity.family) {
                        Some(min) if identity.version < min => {
                            println!("            unsupported, requires >= {}", min)
                        }
                        Some(min) => println!("            supported (>= {})", min),
                        None => println!("            no minimum version known"),
                    }
                    let probe = ProcessProbe::new(path.clone()).timeout(timeout);
                    println!("  libcxx:   {}", resolve_abi(&identity, &probe));
                }
                Err(e) => println!("            {:#}", e),
            }
        }
        None => println!("  CXX:      not found"),
    }

    match find_cmake() {
        Some(cmake) => println!("  CMake:    {}", cmake.display()),
        None => println!("  CMake:    not found"),
    }

    println!();
    println!("  Host:     {}", PlatformFacts::host());

    println!();
    println!("Environment:");
    if let Ok(cxx) = std::env::var("CXX") {
        println!("  CXX={}", cxx);
    }
    if let Ok(flags) = std::env::var("CXXFLAGS") {
        println!("  CXXFLAGS={}", flags);
    }

    Ok(())
}
