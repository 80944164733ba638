//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cafpack::core::{Arch, Os};

/// cafpack - Build configuration and packaging for the C++ Actor Framework
#[derive(Parser)]
#[command(name = "cafpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the toolchain and print the resolved configuration
    Configure(ConfigureArgs),

    /// Fetch, build and package CAF
    Build(BuildArgs),

    /// Package an existing build tree
    Package(PackageArgs),

    /// Show package metadata, link libraries and layout
    Info(InfoArgs),

    /// List the option combinations built for a platform
    Matrix(MatrixArgs),

    /// Show the detected toolchain
    Toolchain(ToolchainArgs),
}

/// Inputs shared by every command that needs a configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Workspace root (defaults to current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Target operating system (defaults to host)
    #[arg(long)]
    pub os: Option<Os>,

    /// Target architecture (defaults to host)
    #[arg(long)]
    pub arch: Option<Arch>,

    /// C++ compiler to detect and probe
    #[arg(long)]
    pub compiler: Option<PathBuf>,

    /// Compiler family, skips detection together with --compiler-version
    #[arg(long)]
    pub compiler_family: Option<String>,

    /// Compiler version, skips detection together with --compiler-family
    #[arg(long)]
    pub compiler_version: Option<String>,

    /// Build shared libraries (true/false)
    #[arg(long, value_name = "BOOL")]
    pub shared: Option<String>,

    /// Build static libraries (true/false)
    #[arg(long = "static", value_name = "BOOL")]
    pub static_: Option<String>,

    /// CAF log level (NONE, ERROR, WARNING, INFO, DEBUG, TRACE)
    #[arg(long)]
    pub log_level: Option<String>,

    /// CMake build type
    #[arg(long)]
    pub build_type: Option<String>,
}

#[derive(Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Upstream CAF version to fetch
    #[arg(long)]
    pub caf_version: Option<String>,

    /// Override the source archive URL
    #[arg(long)]
    pub source_url: Option<String>,

    /// Package output directory (defaults to <path>/package)
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// Build with a single job
    #[arg(long)]
    pub no_parallel: bool,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Package output directory (defaults to <path>/package)
    #[arg(long)]
    pub package_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Build shared libraries (true/false)
    #[arg(long, value_name = "BOOL")]
    pub shared: Option<String>,

    /// Build static libraries (true/false)
    #[arg(long = "static", value_name = "BOOL")]
    pub static_: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct MatrixArgs {
    /// Target operating system (defaults to host)
    #[arg(long)]
    pub os: Option<Os>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ToolchainArgs {
    /// C++ compiler to inspect
    #[arg(long)]
    pub compiler: Option<PathBuf>,
}
