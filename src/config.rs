use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::author::Author;
use crate::error::BackdateError;
use crate::paths::config_candidates;
use crate::sampler::{SampleRange, format_instant};

pub const DEFAULT_START: &str = "2024-01-01T00:00:00Z";
pub const DEFAULT_END: &str = "2024-05-31T23:59:59Z";
pub const DEFAULT_COUNT: u32 = 100;
pub const DEFAULT_FILE: &str = "data.json";
pub const DEFAULT_REMOTE: &str = "origin";

/// Top-level configuration loaded from `backdate.toml` or `config.toml`.
///
/// Example TOML:
/// ```toml
/// remote = "origin"
///
/// [[profiles]]
/// name   = "spring"
/// start  = "2024-01-01T00:00:00Z"
/// end    = "2024-05-31T23:59:59Z"
/// count  = 100
/// author = "Jane Doe <jane@example.com>"
/// file   = "data.json"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// One `[[profiles]]` entry. Missing fields fall back to the defaults above.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Values given on the command line. Each one replaces the profile's value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub start: Option<String>,
    pub end: Option<String>,
    pub count: Option<u32>,
    pub author: Option<String>,
    pub file: Option<PathBuf>,
    pub remote: Option<String>,
}

/// A profile with every field parsed and defaulted.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub name: String,
    pub range: SampleRange,
    pub count: u32,
    /// `None` means "use the repository's configured identity".
    pub author: Option<Author>,
    pub file: PathBuf,
}

impl Profile {
    pub fn with_overrides(&self, o: &Overrides) -> Profile {
        Profile {
            name: self.name.clone(),
            start: o.start.clone().or_else(|| self.start.clone()),
            end: o.end.clone().or_else(|| self.end.clone()),
            count: o.count.or(self.count),
            author: o.author.clone().or_else(|| self.author.clone()),
            file: o.file.clone().or_else(|| self.file.clone()),
        }
    }

    /// Configured name, or `profile-<n>` (1-based) for unnamed entries.
    pub fn display_name(&self, idx: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("profile-{}", idx + 1))
    }

    /// Parse dates and author, filling in defaults.
    pub fn resolve(&self, idx: usize) -> Result<ResolvedProfile, BackdateError> {
        let range = SampleRange::parse(
            self.start.as_deref().unwrap_or(DEFAULT_START),
            self.end.as_deref().unwrap_or(DEFAULT_END),
        )?;
        let author = self.author.as_deref().map(str::parse::<Author>).transpose()?;
        Ok(ResolvedProfile {
            name: self.display_name(idx),
            range,
            count: self.count.unwrap_or(DEFAULT_COUNT),
            author,
            file: self
                .file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE)),
        })
    }
}

impl Config {
    /// Remote to push to: CLI override, then config, then `origin`.
    pub fn remote(&self, o: &Overrides) -> String {
        o.remote
            .clone()
            .or_else(|| self.remote.clone())
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string())
    }

    /// Pick the profiles to run and apply CLI overrides to each.
    ///
    /// - With no profiles configured, a single default profile is used.
    /// - With `only` set, exactly the profile of that name is returned.
    ///
    /// # Errors
    /// Returns an error if `only` names no configured profile, or if a
    /// selected profile has an invalid date or author.
    pub fn select(&self, only: Option<&str>, o: &Overrides) -> Result<Vec<ResolvedProfile>> {
        let base: Vec<Profile> = if self.profiles.is_empty() {
            vec![Profile::default()]
        } else {
            self.profiles.clone()
        };

        let mut out = Vec::new();
        for (idx, p) in base.iter().enumerate() {
            if only.is_some_and(|want| want != p.display_name(idx)) {
                continue;
            }
            out.push(p.with_overrides(o).resolve(idx)?);
        }
        if let Some(want) = only
            && out.is_empty()
        {
            return Err(anyhow!("no profile named \"{}\"", want));
        }
        Ok(out)
    }
}

/// Parse TOML text into a [`Config`].
pub fn parse_config(txt: &str) -> Result<Config> {
    toml::from_str(txt).context("failed to parse config")
}

/// Load the configuration for a run against `repo`.
///
/// - An explicit path must exist.
/// - Otherwise the first existing file among `<repo>/backdate.toml` and the
///   global `config.toml` is used, or an empty [`Config`] if neither exists.
///
/// Returns the config together with the file it came from.
pub fn load_config(explicit: Option<&Path>, repo: &Path) -> Result<(Config, Option<PathBuf>)> {
    if let Some(p) = explicit {
        let txt = fs::read_to_string(p)
            .with_context(|| format!("config not found: {}", p.display()))?;
        let cfg = parse_config(&txt).with_context(|| format!("in {}", p.display()))?;
        return Ok((cfg, Some(p.to_path_buf())));
    }
    for p in config_candidates(repo)? {
        if p.is_file() {
            let txt = fs::read_to_string(&p)
                .with_context(|| format!("failed to read {}", p.display()))?;
            let cfg = parse_config(&txt).with_context(|| format!("in {}", p.display()))?;
            return Ok((cfg, Some(p)));
        }
    }
    Ok((Config::default(), None))
}

/// CLI command: print the profiles a `run` would execute.
///
/// Example output:
/// ```text
/// # /work/site/backdate.toml
/// - spring: 100 commits 2024-01-01T00:00:00.000Z .. 2024-05-31T23:59:59.000Z as Jane <j@x.io> -> data.json
/// ```
pub fn cmd_profiles(explicit: Option<&Path>, repo: &Path, o: &Overrides) -> Result<()> {
    let (cfg, source) = load_config(explicit, repo)?;
    match &source {
        Some(p) => println!("# {}", p.display()),
        None => println!("# no config file found, using defaults"),
    }
    for p in cfg.select(None, o)? {
        let author = p
            .author
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<repository identity>".to_string());
        println!(
            "- {}: {} commits {} .. {} as {} -> {}",
            p.name,
            p.count,
            format_instant(p.range.start()),
            format_instant(p.range.end()),
            author,
            p.file.display()
        );
    }
    Ok(())
}
