use backdate::{
    Author, CommitDriver, CommitRecord, Git2Backend, Overrides, RunOptions, RunPlan, SampleRange,
    cmd_run, make_rng, parse_instant,
};
use git2::{Repository, Sort};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// A working repository with `origin` pointing at a fresh bare repository.
fn repo_with_remote(base: &Path) -> (Repository, Repository) {
    let work = Repository::init(base.join("work")).unwrap();
    let mut cfg = work.config().unwrap();
    cfg.set_str("user.name", "Repo Owner").unwrap();
    cfg.set_str("user.email", "owner@example.com").unwrap();
    let remote_path = base.join("remote.git");
    let remote = Repository::init_bare(&remote_path).unwrap();
    work.remote("origin", remote_path.to_str().unwrap()).unwrap();
    (work, remote)
}

/// Commit messages of `branch` in `repo`, newest first.
fn history(repo: &Repository, branch: &str) -> Vec<(String, i64, String)> {
    let tip = repo
        .find_reference(&format!("refs/heads/{}", branch))
        .unwrap()
        .target()
        .unwrap();
    let mut walk = repo.revwalk().unwrap();
    walk.set_sorting(Sort::TOPOLOGICAL).unwrap();
    walk.push(tip).unwrap();
    walk.map(|oid| {
        let c = repo.find_commit(oid.unwrap()).unwrap();
        (
            c.message().unwrap().to_string(),
            c.author().when().seconds(),
            c.author().email().unwrap().to_string(),
        )
    })
    .collect()
}

#[test]
fn driver_commits_and_pushes_to_bare_remote() {
    let td = tempdir().unwrap();
    let (work, remote) = repo_with_remote(td.path());
    let workdir = work.workdir().unwrap().to_path_buf();

    let plan = RunPlan {
        range: SampleRange::parse("2024-01-01T00:00:00Z", "2024-05-31T23:59:59Z").unwrap(),
        count: 3,
        author: Author::new("Jane Doe", "jane@example.com"),
        file: PathBuf::from("data.json"),
        push: true,
    };
    let mut backend = Git2Backend::open(&workdir, "origin").unwrap();
    let summary = CommitDriver::new(&mut backend, make_rng(Some(99)))
        .run(&plan)
        .unwrap();
    assert!(summary.pushed);
    assert_eq!(summary.commits.len(), 3);

    let branch = work.head().unwrap().shorthand().unwrap().to_string();
    let pushed = history(&remote, &branch);
    assert_eq!(pushed.len(), 3);

    // newest first in the walk, so reverse to match commit order
    for ((message, secs, email), outcome) in pushed.iter().rev().zip(&summary.commits) {
        assert_eq!(message, &outcome.date);
        assert_eq!(email, "jane@example.com");
        let when = parse_instant(message).unwrap();
        assert_eq!(*secs, when.timestamp());
        assert!(plan.range.start() <= when && when <= plan.range.end());
    }

    let on_disk: CommitRecord =
        serde_json::from_str(&fs::read_to_string(workdir.join("data.json")).unwrap()).unwrap();
    assert_eq!(on_disk.date, summary.commits.last().unwrap().date);
}

#[test]
fn cmd_run_uses_repo_profiles_and_can_skip_push() {
    let td = tempdir().unwrap();
    let (work, remote) = repo_with_remote(td.path());
    let workdir = work.workdir().unwrap().to_path_buf();
    fs::write(
        workdir.join("backdate.toml"),
        r#"
[[profiles]]
name = "first"
start = "2023-01-01"
end = "2023-01-31"
count = 2
author = "First Author <first@example.com>"

[[profiles]]
name = "second"
start = "2023-06-01"
end = "2023-06-30"
count = 3
"#,
    )
    .unwrap();

    cmd_run(&RunOptions {
        repo: workdir.clone(),
        config: None,
        profile: None,
        overrides: Overrides::default(),
        push: false,
        seed: Some(5),
    })
    .unwrap();

    let branch = work.head().unwrap().shorthand().unwrap().to_string();
    let local = history(&work, &branch);
    assert_eq!(local.len(), 5);
    let emails: Vec<&str> = local.iter().rev().map(|(_, _, e)| e.as_str()).collect();
    assert_eq!(
        emails,
        vec![
            "first@example.com",
            "first@example.com",
            "owner@example.com",
            "owner@example.com",
            "owner@example.com",
        ]
    );
    assert!(remote.references().unwrap().next().is_none());
}

#[test]
fn cmd_run_reports_unknown_profile() {
    let td = tempdir().unwrap();
    let (work, _remote) = repo_with_remote(td.path());
    let workdir = work.workdir().unwrap().to_path_buf();
    fs::write(workdir.join("backdate.toml"), "[[profiles]]\nname = \"only\"\n").unwrap();

    let err = cmd_run(&RunOptions {
        repo: workdir,
        config: None,
        profile: Some("missing".into()),
        overrides: Overrides::default(),
        push: true,
        seed: None,
    })
    .unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn failed_run_returns_only_profile_context() {
    let td = tempdir().unwrap();
    let (work, _remote) = repo_with_remote(td.path());
    let workdir = work.workdir().unwrap().to_path_buf();
    fs::write(
        workdir.join("backdate.toml"),
        "[[profiles]]\nname = \"solo\"\ncount = 1\n",
    )
    .unwrap();

    let err = cmd_run(&RunOptions {
        repo: workdir,
        config: None,
        profile: None,
        overrides: Overrides {
            remote: Some("nowhere".into()),
            ..Overrides::default()
        },
        push: true,
        seed: Some(1),
    })
    .unwrap_err();
    assert_eq!(err.chain().count(), 1);
    assert_eq!(format!("{:#}", err), "profile solo failed");
}

#[test]
fn dot_slash_record_path_commits() {
    let td = tempdir().unwrap();
    let (work, _remote) = repo_with_remote(td.path());
    let workdir = work.workdir().unwrap().to_path_buf();

    let plan = RunPlan {
        range: SampleRange::parse("2024-01-01", "2024-05-31").unwrap(),
        count: 2,
        author: Author::new("Jane Doe", "jane@example.com"),
        file: PathBuf::from("./data.json"),
        push: false,
    };
    let mut backend = Git2Backend::open(&workdir, "origin").unwrap();
    let summary = CommitDriver::new(&mut backend, make_rng(Some(4)))
        .run(&plan)
        .unwrap();
    assert_eq!(summary.commits.len(), 2);

    let branch = work.head().unwrap().shorthand().unwrap().to_string();
    assert_eq!(history(&work, &branch).len(), 2);
}
