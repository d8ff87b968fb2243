mod driver;
mod progress;
mod record;

use anyhow::{Result, anyhow};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::{Overrides, load_config};
use crate::git::Git2Backend;
use crate::sampler::make_rng;

pub use driver::{CommitDriver, CommitOutcome, DriverState, RunPlan, RunSummary};
pub use record::CommitRecord;

use progress::{err_style, ok_style, spinner_style};

/// Inputs of `backdate run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub repo: PathBuf,
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub overrides: Overrides,
    pub push: bool,
    pub seed: Option<u64>,
}

/// Make backdated commits for every selected profile, one profile after another.
///
/// High-level flow:
/// 1. Load configuration (see [`load_config`]) and resolve the profiles to run.
/// 2. Open the target repository with the `git2` backend.
/// 3. For each profile, run a [`CommitDriver`] with a spinner showing the
///    current iteration. Profiles without an author use the repository's
///    configured identity.
///
/// Each profile is an independent run that ends with its own push. The first
/// failing profile stops the command; later profiles are not started. The
/// returned error only names the profile, the cause is reported where it
/// happened.
pub fn cmd_run(opts: &RunOptions) -> Result<()> {
    let (cfg, source) = load_config(opts.config.as_deref(), &opts.repo)?;
    if let Some(p) = &source {
        debug!(config = %p.display(), "loaded config");
    }
    let profiles = cfg.select(opts.profile.as_deref(), &opts.overrides)?;
    let mut backend = Git2Backend::open(&opts.repo, cfg.remote(&opts.overrides))?;
    let mut rng = make_rng(opts.seed);

    for profile in profiles {
        let author = match profile.author {
            Some(a) => a,
            None => backend.default_author()?,
        };
        let plan = RunPlan {
            range: profile.range,
            count: profile.count,
            author,
            file: profile.file,
            push: opts.push,
        };

        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_message(format!("{}: starting", profile.name));
        pb.enable_steady_tick(Duration::from_millis(80));

        let res = CommitDriver::new(&mut backend, &mut rng)
            .with_progress(pb.clone())
            .run(&plan);

        match res {
            Ok(summary) => {
                let tail = if summary.pushed { "pushed" } else { "not pushed" };
                pb.set_style(ok_style());
                pb.finish_with_message(format!(
                    "{}: {} commits, {}",
                    profile.name,
                    summary.commits.len(),
                    tail
                ));
            }
            Err(e) => {
                pb.set_style(err_style());
                pb.finish_with_message(format!("{} (error: {})", profile.name, e));
                // already logged by the driver and shown on the spinner line
                return Err(anyhow!("profile {} failed", profile.name));
            }
        }
    }
    Ok(())
}
