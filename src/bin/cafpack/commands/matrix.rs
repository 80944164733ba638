//! `cafpack matrix` command

use anyhow::{Context, Result};

use crate::cli::MatrixArgs;
use cafpack::core::{Arch, Os, PlatformFacts};
use cafpack::ops::build_matrix;

pub fn execute(args: MatrixArgs) -> Result<()> {
    let platform = PlatformFacts::new(args.os.unwrap_or(Os::current()), Arch::current());
    let matrix = build_matrix(&platform);

    if args.json {
        let json = serde_json::to_string_pretty(&matrix).context("failed to serialize matrix")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Build matrix for {}:", platform.os);
    for options in &matrix {
        println!("  {}", options);
    }

    Ok(())
}
