//! CLI integration tests
//!
//! These tests run the compiled `branch-diff` binary against a repository
//! built with libgit2 in a temporary directory.

use git2::{Oid, Repository, Signature, Time};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_branch-diff"))
}

// ── fixtures ─────────────────────────────────────────────────────────────────

fn commit(repo: &Repository, parent: Option<Oid>, message: &str, seconds: i64) -> Oid {
    let sig = Signature::new("Dev", "dev@example.com", &Time::new(seconds, 0)).unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<git2::Commit> = parent.into_iter().map(|p| repo.find_commit(p).unwrap()).collect();
    let parents: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(None, &sig, &sig, message, &tree, &parents).unwrap()
}

/// trunk: base -- YARN-2; feature: base -- YARN-2 -- YARN-3
fn make_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();

    let base = commit(&repo, None, "YARN-1. Base change", 1_600_000_000);
    let m1 = commit(&repo, Some(base), "YARN-2. Add queue metrics", 1_600_000_100);
    let f1 = commit(&repo, Some(base), "YARN-2. Add queue metrics", 1_600_000_200);
    let f2 = commit(&repo, Some(f1), "YARN-3. Feature only", 1_600_000_300);

    repo.branch("trunk", &repo.find_commit(m1).unwrap(), false).unwrap();
    repo.branch("feature", &repo.find_commit(f2).unwrap(), false).unwrap();
    tmp
}

fn session_dir(output_dir: &Path) -> PathBuf {
    let sessions: Vec<PathBuf> = fs::read_dir(output_dir)
        .expect("output dir should exist")
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().is_some_and(|n| n.to_string_lossy().starts_with("session-")))
        .collect();
    assert_eq!(sessions.len(), 1, "expected one session dir, got {:?}", sessions);
    sessions[0].clone()
}

// ── help / version ────────────────────────────────────────────────────────────

#[test]
fn test_help_exits_zero() {
    let status = bin().arg("--help").status().expect("failed to run binary");
    assert!(status.success(), "--help should exit 0");
}

#[test]
fn test_version_flag() {
    let output = bin().arg("--version").output().expect("failed to run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("branch-diff"),
        "version output should contain binary name, got: {}",
        stdout
    );
}

#[test]
fn test_unknown_algorithm_rejected() {
    let status = bin()
        .args(["compare", "legacy", "feature", "trunk"])
        .status()
        .expect("failed to run binary");
    assert!(!status.success());
}

// ── compare ───────────────────────────────────────────────────────────────────

#[test]
fn test_compare_console_mode() {
    let repo = make_repo();

    let output = bin()
        .arg("--repo").arg(repo.path())
        .args(["compare", "grouped", "feature", "trunk", "--console-mode"])
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "compare failed: {}", stderr);
    assert!(stdout.contains("=====Stats: BRANCHES====="));
    assert!(stdout.contains("Number of unique commits on feature 'feature': 1"));
    assert!(stdout.contains("YARN-3"));
}

#[test]
fn test_compare_writes_session_files() {
    let repo = make_repo();
    let out = TempDir::new().unwrap();

    let output = bin()
        .arg("--repo").arg(repo.path())
        .args(["compare", "simple", "feature", "trunk"])
        .arg("--output-dir").arg(out.path())
        .output()
        .expect("failed to run binary");
    assert!(output.status.success(), "compare failed: {}", String::from_utf8_lossy(&output.stderr));

    let dir = session_dir(out.path());
    for name in [
        "summary.txt",
        "unique-commits-master.txt",
        "unique-commits-feature.txt",
        "common-commits.txt",
        "matching-result.json",
    ] {
        assert!(dir.join(name).is_file(), "missing {}", name);
    }
    for role in ["master", "feature"] {
        for prefix in ["git-log", "before-merge-base", "after-merge-base", "missing-tracking-id"] {
            let name = format!("{}-{}.txt", prefix, role);
            assert!(dir.join(&name).is_file(), "missing {}", name);
        }
    }

    let git_log = fs::read_to_string(dir.join("git-log-feature.txt")).unwrap();
    let lines: Vec<&str> = git_log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("YARN-3. Feature only"), "expected newest first, got: {}", git_log);
    assert!(lines[2].contains("YARN-1. Base change"));
    assert_eq!(fs::read_to_string(dir.join("after-merge-base-master.txt")).unwrap().lines().count(), 2);
    assert!(fs::read_to_string(dir.join("before-merge-base-master.txt")).unwrap().is_empty());
    assert!(fs::read_to_string(dir.join("missing-tracking-id-feature.txt")).unwrap().is_empty());

    let unique = fs::read_to_string(dir.join("unique-commits-feature.txt")).unwrap();
    assert_eq!(unique.lines().count(), 1);
    assert!(unique.contains("YARN-3. Feature only"));
    assert!(fs::read_to_string(dir.join("unique-commits-master.txt")).unwrap().is_empty());

    let common = fs::read_to_string(dir.join("common-commits.txt")).unwrap();
    assert!(common.contains("[tracking ID and message]"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("matching-result.json")).unwrap()).unwrap();
    assert_eq!(json["algorithm"], "simple");
}

#[test]
fn test_compare_missing_branch_fails() {
    let repo = make_repo();

    let output = bin()
        .arg("--repo").arg(repo.path())
        .args(["compare", "grouped", "no-such-branch", "trunk", "--console-mode"])
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-branch"), "got: {}", stderr);
}
