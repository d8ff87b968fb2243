//! Git integration layer.
//!
//! The commit driver only talks to the [`Vcs`] trait. The real
//! implementation (`git2_backend`) is based on the `git2` crate; tests plug in
//! recording fakes instead.

mod git2_backend;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::author::Author;

pub use git2_backend::Git2Backend;

/// The version-control capabilities a backdating run needs.
pub trait Vcs {
    /// Working directory that staged paths are relative to.
    fn workdir(&self) -> &Path;

    /// Add the given paths (relative to [`Vcs::workdir`]) to the index.
    fn stage(&mut self, paths: &[&Path]) -> Result<()>;

    /// Record the index as a new commit on HEAD, dated `when`.
    ///
    /// Returns the new commit id as a hex string.
    fn commit(&mut self, message: &str, when: DateTime<Utc>, author: &Author) -> Result<String>;

    /// Push the current branch to the configured remote.
    fn push(&mut self) -> Result<()>;
}
