//! `cafpack configure` command

use anyhow::{Context, Result};
use serde::Serialize;

use super::Session;
use crate::cli::ConfigureArgs;
use cafpack::ops::Configuration;

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    configuration: &'a Configuration,
    package_id: String,
}

pub fn execute(args: ConfigureArgs) -> Result<()> {
    let session = Session::load(&args.settings)?;
    let config = session.configure()?;

    if args.json {
        let report = Report {
            configuration: &config,
            package_id: config.package_id(),
        };
        let json = serde_json::to_string_pretty(&report)
            .context("failed to serialize configuration")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Configuration:");
    println!();
    println!("  Platform:   {}", config.platform);
    println!("  Compiler:   {}", config.compiler);
    println!("  Options:    {}", config.options);
    println!("  libcxx:     {}", config.abi);
    println!("  Build type: {}", config.build_type);
    println!("  Package id: {}", config.package_id());
    println!();
    println!("CMake defines:");
    for arg in config.defines.to_cmake_args() {
        println!("  {}", arg);
    }

    Ok(())
}
