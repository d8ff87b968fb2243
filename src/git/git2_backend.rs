use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use git2::{
    Commit, Config, Cred, ErrorCode, PushOptions, RemoteCallbacks, Repository, Signature, Time,
};
use std::path::{Component, Path, PathBuf};

use super::Vcs;
use crate::author::Author;

/// Build a `PushOptions` with credentials and ref-rejection reporting.
///
/// Credentials are tried in order: SSH agent, the configured git credential
/// helper, then libgit2 defaults. A ref update the remote refuses is turned
/// into an error instead of being silently ignored.
fn push_opts_with_creds(config: &Config) -> PushOptions<'_> {
    let mut cb = RemoteCallbacks::new();
    cb.credentials(move |url, username_from_url, _allowed| {
        Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
            .or_else(|_| Cred::credential_helper(config, url, username_from_url))
            .or_else(|_| Cred::default())
    });
    cb.push_update_reference(|refname, status| match status {
        Some(msg) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, msg
        ))),
        None => Ok(()),
    });

    let mut po = PushOptions::new();
    po.remote_callbacks(cb);
    po
}

/// Build a signature stamped at `when` (second precision, UTC offset).
fn signature_at(name: &str, email: &str, when: DateTime<Utc>) -> Result<Signature<'static>> {
    let time = Time::new(when.timestamp(), 0);
    Signature::new(name, email, &time).with_context(|| format!("bad signature {} <{}>", name, email))
}

/// Drop `.` components; the index only accepts plain relative paths.
fn index_path(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// [`Vcs`] implementation over a non-bare `git2::Repository`.
pub struct Git2Backend {
    repo: Repository,
    workdir: PathBuf,
    remote: String,
}

impl Git2Backend {
    /// Discover the repository containing `path` and bind it to `remote`.
    ///
    /// # Errors
    /// Returns an error if no repository is found or if it is bare.
    pub fn open(path: &Path, remote: impl Into<String>) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("no git repository at {}", path.display()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| anyhow!("bare repository is not supported: {}", repo.path().display()))?
            .to_path_buf();
        Ok(Self {
            repo,
            workdir,
            remote: remote.into(),
        })
    }

    /// Identity from the repository's `user.name` / `user.email`.
    pub fn default_author(&self) -> Result<Author> {
        let sig = self
            .repo
            .signature()
            .context("no author configured (set user.name and user.email, or pass --author)")?;
        Ok(Author::new(
            sig.name().unwrap_or_default(),
            sig.email().unwrap_or_default(),
        ))
    }

    /// Short name of the branch HEAD is attached to.
    ///
    /// # Errors
    /// Returns an error if HEAD is unborn or detached.
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("HEAD has no commits to push")?;
        if !head.is_branch() {
            bail!("HEAD is detached; check out a branch before pushing");
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("invalid branch name"))
    }

    /// Tip of HEAD, or `None` on an unborn branch.
    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Vcs for Git2Backend {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn stage(&mut self, paths: &[&Path]) -> Result<()> {
        let mut index = self.repo.index()?;
        for p in paths {
            index
                .add_path(&index_path(p))
                .with_context(|| format!("git add {}", p.display()))?;
        }
        index.write().context("write index")?;
        Ok(())
    }

    /// Author and committer are both dated `when`. The committer identity is
    /// the repository's configured one when available, else the author.
    fn commit(&mut self, message: &str, when: DateTime<Utc>, author: &Author) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree().context("write tree")?;
        let tree = self.repo.find_tree(tree_id)?;

        let author_sig = signature_at(&author.name, &author.email, when)?;
        let committer_sig = match self.repo.signature() {
            Ok(s) => signature_at(
                s.name().unwrap_or(author.name.as_str()),
                s.email().unwrap_or(author.email.as_str()),
                when,
            )?,
            Err(_) => author_sig.clone(),
        };

        let parent = self.head_commit()?;
        let parents: Vec<&Commit> = parent.iter().collect();
        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &author_sig,
                &committer_sig,
                message,
                &tree,
                &parents,
            )
            .context("git commit")?;
        Ok(oid.to_string())
    }

    fn push(&mut self) -> Result<()> {
        let branch = self.current_branch()?;
        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        let mut remote = self
            .repo
            .find_remote(&self.remote)
            .with_context(|| format!("remote not found: {}", self.remote))?;
        let config = self.repo.config()?;
        let mut po = push_opts_with_creds(&config);
        remote
            .push(&[refspec.as_str()], Some(&mut po))
            .with_context(|| format!("git push {} {}", self.remote, branch))?;
        Ok(())
    }
}
