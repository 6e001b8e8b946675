//! Comparison runs against a real repository built with libgit2

use anyhow::Result;
use branchdiff_core::BranchType;
use branchdiff_engine::{BranchComparator, ComparatorConfig, GitRepository, MatchKind, MatchingAlgorithm, Repository};
use git2::{Oid, Signature, Time};
use tempfile::TempDir;

// ── fixtures ─────────────────────────────────────────────────────────────────
//
// trunk:   base -- m1 (YARN-2)
// feature: base -- f1 (YARN-2, reworded) -- f2 (YARN-3)

const EMAIL: &str = "dev@example.com";

struct Fixture {
    repo: GitRepository,
    base: Oid,
    _tmp: TempDir,
}

fn commit(repo: &git2::Repository, parents: &[Oid], message: &str, seconds: i64) -> Result<Oid> {
    let sig = Signature::new("Dev", EMAIL, &Time::new(seconds, 60))?;
    let tree_id = repo.treebuilder(None)?.write()?;
    let tree = repo.find_tree(tree_id)?;
    let parents = parents
        .iter()
        .map(|oid| repo.find_commit(*oid))
        .collect::<Result<Vec<_>, _>>()?;
    let parents: Vec<&git2::Commit> = parents.iter().collect();
    Ok(repo.commit(None, &sig, &sig, message, &tree, &parents)?)
}

fn fixture() -> Result<Fixture> {
    let tmp = TempDir::new()?;
    let repo = git2::Repository::init(tmp.path())?;

    let base = commit(&repo, &[], "YARN-1. Base change", 1_600_000_000)?;
    let m1 = commit(&repo, &[base], "YARN-2. Add queue metrics", 1_600_000_100)?;
    let f1 = commit(&repo, &[base], "YARN-2. Add queue metrics (backport)", 1_600_000_200)?;
    let f2 = commit(&repo, &[f1], "YARN-3. Feature only", 1_600_000_300)?;

    repo.branch("trunk", &repo.find_commit(m1)?, false)?;
    repo.branch("feature", &repo.find_commit(f2)?, false)?;

    Ok(Fixture {
        repo: GitRepository::open(tmp.path())?,
        _tmp: tmp,
        base,
    })
}

fn config(algorithm: MatchingAlgorithm) -> ComparatorConfig {
    ComparatorConfig::new(algorithm, "feature", "trunk")
}

// ── repository queries ───────────────────────────────────────────────────────

#[test]
fn test_branch_exists() -> Result<()> {
    let fx = fixture()?;
    assert!(fx.repo.branch_exists("trunk")?);
    assert!(fx.repo.branch_exists("feature")?);
    assert!(!fx.repo.branch_exists("nope")?);
    Ok(())
}

#[test]
fn test_log_newest_first_in_line_format() -> Result<()> {
    let fx = fixture()?;
    let lines = fx.repo.log("feature")?;
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(" YARN-3. Feature only "));
    assert!(lines[2].starts_with(&fx.base.to_string()));
    assert!(lines[2].ends_with(&format!("+01:00 {EMAIL} {EMAIL}")));
    Ok(())
}

#[test]
fn test_merge_base_and_single_commit() -> Result<()> {
    let fx = fixture()?;
    assert_eq!(fx.repo.merge_base("feature", "trunk")?, [fx.base.to_string()]);
    let line = fx.repo.log_commit(&fx.base.to_string())?;
    assert!(line.contains("YARN-1. Base change"));
    Ok(())
}

// ── comparison ───────────────────────────────────────────────────────────────

#[test]
fn test_grouped_comparison() -> Result<()> {
    let fx = fixture()?;
    let comparison = BranchComparator::new(config(MatchingAlgorithm::Grouped), &fx.repo).compare()?;
    let result = &comparison.result;

    assert_eq!(result.merge_base.hash, fx.base.to_string());
    assert!(result.before_merge_base.is_empty());
    // base {YARN-1} and {YARN-2}
    assert_eq!(result.matched_groups().map(<[_]>::len), Some(2));
    assert!(result.unique_commits(BranchType::Master).is_empty());

    let unique: Vec<&str> = result
        .unique_commits(BranchType::Feature)
        .iter()
        .map(|c| c.message.as_str())
        .collect();
    assert_eq!(unique, ["YARN-3. Feature only"]);
    Ok(())
}

#[test]
fn test_simple_comparison_flags_reworded_backport() -> Result<()> {
    let fx = fixture()?;
    let comparison = BranchComparator::new(config(MatchingAlgorithm::Simple), &fx.repo).compare()?;
    let pairs = comparison.result.pairs().expect("simple result");

    let yarn_2: Vec<_> = pairs
        .iter()
        .filter(|p| p.master.tracking_id().map(|id| id.as_str()) == Some("YARN-2"))
        .collect();
    assert_eq!(yarn_2.len(), 1);
    assert_eq!(yarn_2[0].kind, MatchKind::TrackingIdOnly);
    Ok(())
}
