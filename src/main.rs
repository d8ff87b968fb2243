//! # backdate
//!
//! **backdate** fills a git repository with commits dated at random instants
//! inside a range, then pushes them.
//!
//! Features:
//! - `backdate run` makes the commits for each configured profile and pushes
//! - `backdate sample` prints random dates without touching any repository
//! - `backdate profiles` shows the profiles a run would use
//! - `backdate home` prints the global config directory
//!
//! Profiles live in `<repo>/backdate.toml` or `$(backdate home)/config.toml`.
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use backdate::{
    DEFAULT_END, DEFAULT_START, Overrides, RunOptions, cmd_profiles, cmd_run,
    cmd_sample, paths,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "backdate",
    version,
    about = "backdate - fill a git repository with randomly dated commits",
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Cmd {
    /// Make randomly dated commits and push them
    Run {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        fields: Fields,
        /// Run only the profile with this name
        #[arg(long)]
        profile: Option<String>,
        /// Remote to push to (default: config, then "origin")
        #[arg(long)]
        remote: Option<String>,
        /// Commit without pushing
        #[arg(long)]
        no_push: bool,
        /// Seed for reproducible dates
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print random dates from a range
    Sample {
        /// Range start (ISO-8601 or YYYY-MM-DD)
        #[arg(long, default_value = DEFAULT_START)]
        start: String,
        /// Range end, inclusive
        #[arg(long, default_value = DEFAULT_END)]
        end: String,
        /// How many dates to print
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
        /// Seed for reproducible dates
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the profiles a run would use
    Profiles {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        fields: Fields,
    },
    /// Print the global config directory
    Home,
}

/// Where to look for the repository and its config.
#[derive(Args, Debug)]
struct Target {
    /// Repository to commit into
    #[arg(long, default_value = ".")]
    repo: PathBuf,
    /// Config file (default: <repo>/backdate.toml, then the global config)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Per-profile values that override the config file.
#[derive(Args, Debug)]
struct Fields {
    /// Range start (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// Range end, inclusive
    #[arg(long)]
    end: Option<String>,
    /// Number of commits
    #[arg(short = 'n', long)]
    count: Option<u32>,
    /// Author as "Name <email>"
    #[arg(long)]
    author: Option<String>,
    /// Record file, relative to the repository root
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Fields {
    fn into_overrides(self, remote: Option<String>) -> Overrides {
        Overrides {
            start: self.start,
            end: self.end,
            count: self.count,
            author: self.author,
            file: self.file,
            remote,
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI entry point.
///
/// Parses arguments with `clap` and executes the selected subcommand.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Run {
            target,
            fields,
            profile,
            remote,
            no_push,
            seed,
        } => cmd_run(&RunOptions {
            repo: target.repo,
            config: target.config,
            profile,
            overrides: fields.into_overrides(remote),
            push: !no_push,
            seed,
        }),
        Cmd::Sample {
            start,
            end,
            count,
            seed,
        } => cmd_sample(&start, &end, count, seed),
        Cmd::Profiles { target, fields } => cmd_profiles(
            target.config.as_deref(),
            &target.repo,
            &fields.into_overrides(None),
        ),
        Cmd::Home => {
            println!("{}", paths()?.home.display());
            Ok(())
        }
    }
}
