//! `cafpack build` command

use anyhow::Result;

use super::Session;
use crate::cli::BuildArgs;
use cafpack::builder::{CMakeBuild, HttpFetch};
use cafpack::core::recipe;
use cafpack::ops::{self, parse_source_url, BuildOptions};

pub fn execute(args: BuildArgs) -> Result<()> {
    let session = Session::load(&args.settings)?;
    let config = session.configure()?;

    let build_config = &session.config.build;
    let version = args
        .caf_version
        .as_deref()
        .or(build_config.version.as_deref())
        .unwrap_or(recipe::VERSION);

    let mut opts = BuildOptions::new(&session.root, version)?;
    if let Some(url) = args.source_url.as_deref().or(build_config.source_url.as_deref()) {
        opts.source_url = parse_source_url(url)?;
    }
    opts.package_dir = args.package_dir;
    opts.parallel = !args.no_parallel;

    let cmake = CMakeBuild::new()?;
    let descriptor = ops::build(&config, &opts, &HttpFetch, &cmake)?;

    println!(
        "Built {} {} ({})",
        descriptor.name, descriptor.version, descriptor.package_id
    );
    println!("  Package: {}", opts.package_dir().display());
    println!("  Libs:    {}", descriptor.libs.join(" "));

    Ok(())
}
