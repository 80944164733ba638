//! Command implementations

pub mod build;
pub mod configure;
pub mod info;
pub mod matrix;
pub mod package;
pub mod toolchain;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::SettingsArgs;
use cafpack::builder::detect_compiler;
use cafpack::core::{Arch, CompilerIdentity, Os, PlatformFacts, ProcessProbe, RawOptions};
use cafpack::ops::{self, ConfigureRequest, Configuration};
use cafpack::util::config::load_project_config;
use cafpack::util::process::find_cxx_compiler;
use cafpack::util::Config;

/// Flags layered over the project and global config files.
pub struct Session {
    pub root: PathBuf,
    pub config: Config,
    pub request: ConfigureRequest,
    pub probe: ProcessProbe,
}

impl Session {
    pub fn load(args: &SettingsArgs) -> Result<Self> {
        let root = match &args.path {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("failed to get current directory")?,
        };
        let config = load_project_config(&root);

        let platform = PlatformFacts::new(
            args.os.unwrap_or(Os::current()),
            args.arch.unwrap_or(Arch::current()),
        );

        let compiler_path = args
            .compiler
            .clone()
            .or_else(|| config.toolchain.compiler.clone());
        let (compiler, compiler_path) = resolve_compiler(args, &config, compiler_path)?;

        let mut options = config.options.clone();
        options.merge(RawOptions {
            shared: args.shared.clone(),
            static_: args.static_.clone(),
            log_level: args.log_level.clone(),
        });

        let build_type = args
            .build_type
            .clone()
            .unwrap_or_else(|| config.build_type().to_string());

        // The ABI probe asks the compiler that was identified; `g++` from PATH
        // only when the identity came from flags or config without a path
        let probe = compiler_path
            .map(ProcessProbe::new)
            .unwrap_or_default()
            .timeout(config.probe_timeout());

        Ok(Session {
            root,
            config,
            request: ConfigureRequest {
                platform,
                compiler,
                options,
                build_type,
            },
            probe,
        })
    }

    pub fn configure(&self) -> Result<Configuration> {
        Ok(ops::configure(&self.request, &self.probe)?)
    }
}

/// Compiler identity from flags or config, falling back to detection.
///
/// Also returns the compiler binary the identity belongs to, if known.
fn resolve_compiler(
    args: &SettingsArgs,
    config: &Config,
    compiler_path: Option<PathBuf>,
) -> Result<(CompilerIdentity, Option<PathBuf>)> {
    let family = args
        .compiler_family
        .as_deref()
        .or(config.toolchain.family.as_deref());
    let version = args
        .compiler_version
        .as_deref()
        .or(config.toolchain.version.as_deref());

    match (family, version) {
        (Some(family), Some(version)) => {
            Ok((CompilerIdentity::parse(family, version)?, compiler_path))
        }
        (None, None) => {
            let Some(path) = compiler_path.or_else(find_cxx_compiler) else {
                bail!(
                    "no C++ compiler found\n\
                     hint: set CXX, pass --compiler, or pass \
                     --compiler-family with --compiler-version"
                );
            };
            let identity = detect_compiler(&path, config.probe_timeout())?;
            Ok((identity, Some(path)))
        }
        _ => bail!("--compiler-family and --compiler-version must be given together"),
    }
}
