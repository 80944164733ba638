//! `cafpack info` command

use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::InfoArgs;
use cafpack::core::{artifact_manifest, link_libraries, recipe, resolve_options, RawOptions};

pub fn execute(args: InfoArgs) -> Result<()> {
    let options = resolve_options(&RawOptions {
        shared: args.shared,
        static_: args.static_,
        log_level: None,
    })?;
    let libs = link_libraries(&options);
    let rules = artifact_manifest(&options);

    if args.json {
        let info = json!({
            "name": recipe::NAME,
            "version": recipe::VERSION,
            "description": recipe::DESCRIPTION,
            "homepage": recipe::HOMEPAGE,
            "license": recipe::LICENSE,
            "url": recipe::source_url(recipe::VERSION),
            "options": options,
            "libs": libs,
            "layout": rules,
        });
        let json = serde_json::to_string_pretty(&info).context("failed to serialize info")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{} {}", recipe::NAME, recipe::VERSION);
    println!("  {}", recipe::DESCRIPTION);
    println!();
    println!("  Homepage: {}", recipe::HOMEPAGE);
    println!("  License:  {}", recipe::LICENSE);
    println!("  Sources:  {}", recipe::source_url(recipe::VERSION));
    println!();
    println!("Link libraries ({}):", options);
    for lib in &libs {
        println!("  {}", lib);
    }
    println!();
    println!("Layout:");
    for rule in &rules {
        let mode = if rule.keep_path { "" } else { " (flat)" };
        println!(
            "  {:<10} {} -> {}{}",
            rule.pattern, rule.source, rule.destination, mode
        );
    }

    Ok(())
}
