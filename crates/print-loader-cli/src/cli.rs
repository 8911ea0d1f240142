//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use print_loader::LoaderKind;

/// Turns text files into modules that print them, with source maps.
#[derive(Debug, Parser)]
#[command(name = "print-loader")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transform files and write `<name>.js` with `<name>.js.map` beside it
    Build(BuildArgs),
    /// Resolve a generated position through a source map
    Lookup(LookupArgs),
    /// Verify that the output template agrees with its line offsets
    SelfCheck,
}

/// Arguments of `build`.
#[derive(Debug, clap::Args)]
pub struct BuildArgs {
    /// Files or directories to transform
    #[arg(required = true)]
    pub inputs: Vec<Utf8PathBuf>,

    /// Working directory source paths are made relative to
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Output directory [default: `outDir` from print-loader.json, else `dist`]
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Loader for files no configured rule matches [default: print]
    #[arg(long)]
    pub loader: Option<LoaderKind>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,
}

/// Arguments of `lookup`.
#[derive(Debug, clap::Args)]
pub struct LookupArgs {
    /// Source map file
    pub map: Utf8PathBuf,

    /// 1-indexed line in the generated file
    #[arg(long)]
    pub line: u32,

    /// 0-indexed column in the generated file
    #[arg(long, default_value_t = 0)]
    pub column: u32,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}
