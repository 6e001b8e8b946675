//! `git2`-backed repository

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{Commit, ErrorCode, Oid, Sort};
use std::path::{Path, PathBuf};

use crate::repository::Repository;

/// Local git repository opened with libgit2
pub struct GitRepository {
    repo: git2::Repository,
    path: PathBuf,
}

impl GitRepository {
    /// Opens the repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = git2::Repository::open(path.as_ref())
            .with_context(|| format!("Failed to open repository at {:?}", path.as_ref()))?;
        Ok(Self {
            repo,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve_commit(&self, revision: &str) -> Result<Commit<'_>> {
        self.repo
            .revparse_single(revision)
            .with_context(|| format!("Failed to resolve revision '{}'", revision))?
            .peel_to_commit()
            .with_context(|| format!("Revision '{}' is not a commit", revision))
    }

    /// Formats a commit as `<hash> <summary> <committer date> <author> <committer>`
    fn format_log_line(commit: &Commit) -> Result<String> {
        let time = commit.time();
        let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
            .with_context(|| format!("Invalid offset on commit {}", commit.id()))?;
        let date = DateTime::from_timestamp(time.seconds(), 0)
            .with_context(|| format!("Invalid timestamp on commit {}", commit.id()))?
            .with_timezone(&offset);

        let author = commit.author();
        let committer = commit.committer();
        Ok(format!(
            "{} {} {} {} {}",
            commit.id(),
            commit.summary().unwrap_or(""),
            date.to_rfc3339(),
            author.email().unwrap_or(""),
            committer.email().unwrap_or("")
        ))
    }
}

impl Repository for GitRepository {
    fn branch_exists(&self, name: &str) -> Result<bool> {
        match self.repo.revparse_single(name) {
            Ok(object) => Ok(object.peel_to_commit().is_ok()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to look up branch '{}'", name)),
        }
    }

    fn log(&self, revision: &str) -> Result<Vec<String>> {
        let start = self.resolve_commit(revision)?;
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(start.id())?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut lines = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.context("Failed to get commit OID")?;
            let commit = self.repo.find_commit(oid).context("Failed to find commit")?;
            lines.push(Self::format_log_line(&commit)?);
        }
        log::debug!("git log {}: {} commits", revision, lines.len());
        Ok(lines)
    }

    fn merge_base(&self, one: &str, two: &str) -> Result<Vec<String>> {
        let one = self.resolve_commit(one)?.id();
        let two = self.resolve_commit(two)?.id();
        match self.repo.merge_bases(one, two) {
            Ok(bases) => Ok(bases.iter().map(Oid::to_string).collect()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).context("Failed to compute merge base"),
        }
    }

    fn log_commit(&self, hash: &str) -> Result<String> {
        let oid = Oid::from_str(hash).with_context(|| format!("Invalid commit hash '{}'", hash))?;
        let commit = self
            .repo
            .find_commit(oid)
            .with_context(|| format!("Failed to find commit {}", hash))?;
        Self::format_log_line(&commit)
    }
}
