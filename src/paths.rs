use anyhow::Result;
use std::{
    env,
    path::{Path, PathBuf},
};

/// File name looked up at the root of the target repository.
pub const REPO_CONFIG_NAME: &str = "backdate.toml";

#[derive(Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub config: PathBuf,
}

/// `$XDG_CONFIG_HOME/backdate`, falling back to `~/.config/backdate`.
pub fn backdate_home() -> Result<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty());
    let base = xdg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env::var_os("HOME").unwrap_or_default()).join(".config"));
    Ok(base.join("backdate"))
}

pub fn paths() -> Result<Paths> {
    let home = backdate_home()?;
    Ok(Paths {
        config: home.join("config.toml"),
        home,
    })
}

/// Config files to try, most specific first.
pub fn config_candidates(repo: &Path) -> Result<Vec<PathBuf>> {
    Ok(vec![repo.join(REPO_CONFIG_NAME), paths()?.config])
}
