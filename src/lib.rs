//! Crate entry point for **backdate**.
//!
//! This library provides the implementation behind the `backdate` CLI, which
//! fills a repository with commits dated at random instants inside a range and
//! then pushes them. Each submodule covers one concern (config parsing, date
//! sampling, git operations, the commit loop).
//! The `pub use` re-exports make the commands and core types reachable from
//! the crate root.

mod author;
mod config;
mod error;
mod git;
mod paths;
mod run;
mod sampler;

pub use author::Author;
pub use config::{
    Config, DEFAULT_END, DEFAULT_START, Overrides, Profile, ResolvedProfile, cmd_profiles, load_config,
};
pub use error::{BackdateError, error_chain};
pub use git::{Git2Backend, Vcs};
pub use paths::{Paths, paths};
pub use run::{
    CommitDriver, CommitOutcome, CommitRecord, DriverState, RunOptions, RunPlan, RunSummary,
    cmd_run,
};
pub use sampler::{
    SampleRange, cmd_sample, format_instant, make_rng, parse_instant, random_date_between,
};
