//! combinaut CLI - a targeted/generic wordlist combinator for offline
//! credential recovery.
//!
//! Parses the flags below, resolves them against an optional config file,
//! and hands the result to [`combinaut::orchestrator`].

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use combinaut::config::Config;
use combinaut::error::{CombError, Result};
use combinaut::orchestrator::{self, OrchestratorArgs};

/// A targeted/generic wordlist combinator for offline credential recovery.
#[derive(Parser, Debug)]
#[command(name = "combinaut")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Permute target tokens and insert generic wordlist words to build candidate passwords", long_about = None)]
struct Cli {
    /// Target wordlist (personal tokens: names, dates, handles, ...).
    target: PathBuf,

    /// Generic wordlists; directories are walked recursively.
    wordlists: Vec<PathBuf>,

    /// Minimum target-subset length. Defaults to the config file's value,
    /// or 1 if there is none.
    #[arg(short = 'm', long)]
    min_target: Option<usize>,

    /// Maximum target-subset length. Defaults to the config file's value,
    /// or 3 if there is none.
    #[arg(short = 'x', long)]
    max_target: Option<usize>,

    /// Hashcat rule file applied to the target list.
    #[arg(short = 't', long)]
    target_rules: Option<PathBuf>,

    /// Hashcat rule file applied to every generic wordlist.
    #[arg(short = 'r', long)]
    wordlist_rules: Option<PathBuf>,

    /// Separator joining combination fields. Defaults to the config
    /// file's value, or "" if there is none.
    #[arg(short, long)]
    separator: Option<String>,

    /// Output file (append+create); defaults to stdout.
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Print the candidate count instead of emitting candidates.
    #[arg(long)]
    keyspace: bool,

    /// Advisory count of emitted candidates to skip.
    #[arg(long, default_value_t = 0)]
    skip: u64,

    /// Stop after emitting this many candidates.
    #[arg(long)]
    limit: Option<u64>,

    /// Emit permutations of the target list on their own, with no
    /// wordlist word inserted. Defaults to the config file's value, or
    /// true if there is none.
    #[arg(long)]
    self_combination: Option<bool>,

    /// Remove rule-augmented target words already present in the
    /// original target list before combining.
    #[arg(long)]
    partial_deduplicate: bool,

    /// Raise the log level to debug.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug)?;

    let config = Config::load()?;
    let args = resolve_args(cli, config);

    if let Err(err) = orchestrator::run(args) {
        tracing::error!(%err, "combinaut run failed");
        return Err(err);
    }

    Ok(())
}

/// Initialize structured logging: `info` by default, `debug` under `--debug`.
fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| CombError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

/// Merge CLI flags with config-file defaults: an explicitly passed flag
/// always wins; an omitted one falls back to the config file's value,
/// which itself falls back to [`Config::default`]'s hard-coded value.
fn resolve_args(cli: Cli, config: Config) -> OrchestratorArgs {
    OrchestratorArgs {
        target: cli.target,
        wordlists: cli.wordlists,
        min_target: cli.min_target.unwrap_or(config.min_target),
        max_target: cli.max_target.unwrap_or(config.max_target),
        target_rules: cli.target_rules,
        wordlist_rules: cli.wordlist_rules,
        separator: cli.separator.unwrap_or(config.separator).into_bytes(),
        output_file: cli.output_file,
        keyspace: cli.keyspace,
        skip: cli.skip,
        limit: cli.limit,
        self_combination: cli.self_combination.unwrap_or(config.self_combination),
        partial_deduplicate: cli.partial_deduplicate,
        workers: config.workers,
    }
}
