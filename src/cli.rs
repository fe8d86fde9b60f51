//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::core::rules::{RuleConfig, RuleSet};
use crate::flows::pack::DEFAULT_OUTPUT;

/// fencepack - pack the files your rule tables admit into one fenced text artifact.
#[derive(Parser, Debug)]
#[command(name = "fencepack")]
#[command(
    author,
    version,
    about,
    long_about = r#"fencepack walks a directory tree and writes every admitted file into a
single text artifact, each file wrapped in a fenced block headed by its path.

Directories listed in exclude_dirs are pruned before descent. Each remaining
file is checked against the rule tables in a fixed order, exclusions first:

    exclude-filename, exclude-extension, exclude-regex,
    include-filename, include-extension, include-regex,
    shebang (extensionless files starting with #!), default (exclude)

Files in always_include_files are appended last, even from pruned directories.

Rules come from --rules, else ROOT/fencepack.toml, else the built-in tables.

Examples:
    fencepack
    fencepack pack --output context.md --stats
    fencepack explain src/core/a.c tool
    fencepack rules > fencepack.toml
"#
)]
pub struct Cli {
    /// Root directory to traverse.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory to traverse (defaults to the current directory).\n\n\
All rule paths (exclude_dirs, always_include_files) and all block headers are\n\
relative to this root."
    )]
    pub root: PathBuf,

    /// Rules file (TOML).
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "FENCEPACK_RULES",
        long_help = "Load rule tables from a TOML file.\n\n\
Tables the file omits keep their built-in values. Without this flag,\n\
ROOT/fencepack.toml is used when present."
    )]
    pub rules: Option<PathBuf>,

    /// Quiet mode (no per-file size lines).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress the per-file size/path lines normally printed to stderr."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logging).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log pruning and classification decisions to stderr.\n\n\
RUST_LOG overrides the level when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write admitted files to the output artifact (default command).
    #[command(
        long_about = "Traverse ROOT, write every admitted file to the artifact and print one\n\
size/path line per file to stderr.\n\n\
Examples:\n\
  fencepack pack\n\
  fencepack pack --output /tmp/context.md --stats\n"
    )]
    Pack {
        /// Output artifact path.
        #[arg(
            long,
            short,
            default_value = DEFAULT_OUTPUT,
            value_name = "FILE",
            long_help = "Path of the artifact to write (relative to the working directory).\n\n\
The file is truncated first. It is never packed into itself."
        )]
        output: PathBuf,

        /// Show pack statistics on stderr.
        #[arg(long)]
        stats: bool,
    },

    /// Show which rule decides each path.
    #[command(
        long_about = "Print one JSON object per PATH describing the pruning directory (if any),\n\
the deciding file rule, and whether a pack run would write the file.\n\n\
Examples:\n\
  fencepack explain src/core/a.c\n\
  fencepack explain tool README.org --pretty\n"
    )]
    Explain {
        /// Paths to explain (relative to ROOT unless absolute).
        #[arg(value_name = "PATH", required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Pretty-print JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective rule tables as TOML.
    #[command(
        long_about = "Print the rule tables in effect (after --rules / fencepack.toml lookup)\n\
as TOML, suitable as a starting point for a rules file.\n\n\
Example:\n\
  fencepack rules > fencepack.toml\n"
    )]
    Rules,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    let (config, source) = RuleConfig::discover(&root, cli.rules.as_deref())?;
    if let Some(source) = &source {
        info!(rules = %source.display(), "loaded rules file");
    }

    match cli.command.unwrap_or(Commands::Pack {
        output: PathBuf::from(DEFAULT_OUTPUT),
        stats: false,
    }) {
        Commands::Pack { output, stats } => {
            let rules = RuleSet::compile(&config).context("Invalid rule configuration")?;
            crate::flows::pack::run_pack(&root, &rules, &output, cli.quiet, stats)
        }

        Commands::Explain { paths, pretty } => {
            let rules = RuleSet::compile(&config).context("Invalid rule configuration")?;
            crate::flows::explain::run_explain(&root, &rules, &paths, pretty)
        }

        Commands::Rules => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
