//! Sequential commit loop.
//!
//! Each iteration samples a date, rewrites the record file, stages it and
//! commits it dated at the sample. Iteration `i + 1` only starts after
//! iteration `i`'s commit returned. After the last iteration the branch is
//! pushed once. The first failure stops the run; nothing is rolled back.

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use rand::Rng;
use std::path::PathBuf;
use tracing::{debug, error, info};

use super::record::CommitRecord;
use crate::author::Author;
use crate::error::{BackdateError, error_chain};
use crate::git::Vcs;
use crate::sampler::{SampleRange, format_instant};

/// Everything one run needs, resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub range: SampleRange,
    pub count: u32,
    pub author: Author,
    /// Record file, relative to the repository working directory.
    pub file: PathBuf,
    pub push: bool,
}

/// Where the driver currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Built, `run` not called yet.
    Idle,
    /// `n` iterations left before the push.
    Pending(u32),
    /// Writing and committing the record for this date.
    Committing(DateTime<Utc>),
    Pushed,
    Failed,
}

/// One acknowledged commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub date: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commits in the order they were made (not chronological).
    pub commits: Vec<CommitOutcome>,
    pub pushed: bool,
}

pub struct CommitDriver<'a, R> {
    vcs: &'a mut dyn Vcs,
    rng: R,
    progress: ProgressBar,
    state: DriverState,
}

impl<'a, R: Rng> CommitDriver<'a, R> {
    pub fn new(vcs: &'a mut dyn Vcs, rng: R) -> Self {
        Self {
            vcs,
            rng,
            progress: ProgressBar::hidden(),
            state: DriverState::Idle,
        }
    }

    /// Report per-iteration progress on `pb`.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = pb;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Make `plan.count` commits, then push if `plan.push` is set.
    ///
    /// # Errors
    /// Returns the first failure. Commits made before it stay in history and
    /// the push is skipped.
    pub fn run(&mut self, plan: &RunPlan) -> Result<RunSummary, BackdateError> {
        debug!(
            count = plan.count,
            start = %format_instant(plan.range.start()),
            end = %format_instant(plan.range.end()),
            author = %plan.author,
            file = %plan.file.display(),
            "starting run"
        );
        self.state = DriverState::Pending(plan.count);
        let mut summary = RunSummary::default();

        for iteration in 1..=plan.count {
            self.state = DriverState::Pending(plan.count - iteration + 1);
            let date = plan.range.sample(&mut self.rng);
            self.state = DriverState::Committing(date);

            let stamp = format_instant(date);
            self.progress
                .set_message(format!("committing {}/{}: {}", iteration, plan.count, stamp));

            match self.commit_once(plan, iteration, date, &stamp) {
                Ok(id) => {
                    info!(iteration, date = %stamp, commit = %id, "committed");
                    summary.commits.push(CommitOutcome { date: stamp, id });
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
        self.state = DriverState::Pending(0);

        if !plan.push {
            info!(commits = summary.commits.len(), "all commits made, push skipped");
            return Ok(summary);
        }

        info!(commits = summary.commits.len(), "all commits made, pushing to remote");
        self.progress.set_message("pushing to remote…");
        if let Err(source) = self.vcs.push() {
            return Err(self.fail(BackdateError::Push { source }));
        }
        self.state = DriverState::Pushed;
        summary.pushed = true;
        Ok(summary)
    }

    /// Write the record, stage it and commit it. Returns the commit id.
    fn commit_once(
        &mut self,
        plan: &RunPlan,
        iteration: u32,
        date: DateTime<Utc>,
        stamp: &str,
    ) -> Result<String, BackdateError> {
        let path = self.vcs.workdir().join(&plan.file);
        CommitRecord::new(stamp)
            .write_to(&path)
            .map_err(|source| BackdateError::Write {
                iteration,
                path: path.display().to_string(),
                source,
            })?;

        let committed = match self.vcs.stage(&[plan.file.as_path()]) {
            Ok(()) => self.vcs.commit(stamp, date, &plan.author),
            Err(e) => Err(e),
        };
        committed.map_err(|source| BackdateError::Commit { iteration, source })
    }

    fn fail(&mut self, err: BackdateError) -> BackdateError {
        self.state = DriverState::Failed;
        error!("run halted: {}", error_chain(&err));
        err
    }
}
