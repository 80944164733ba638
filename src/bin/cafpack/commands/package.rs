//! `cafpack package` command

use anyhow::Result;

use super::Session;
use crate::cli::PackageArgs;
use cafpack::ops::{self, DESCRIPTOR_NAME};

pub fn execute(args: PackageArgs) -> Result<()> {
    let session = Session::load(&args.settings)?;
    let config = session.configure()?;

    let package_dir = args
        .package_dir
        .unwrap_or_else(|| session.root.join("package"));
    let descriptor = ops::package(&config, &session.root, &package_dir)?;

    if descriptor.files.is_empty() {
        tracing::warn!(
            "No build outputs found below {}",
            session.root.display()
        );
    }

    println!(
        "Packaged {} file(s) into {}",
        descriptor.files.len(),
        package_dir.display()
    );
    println!("  Descriptor: {}", package_dir.join(DESCRIPTOR_NAME).display());

    Ok(())
}
