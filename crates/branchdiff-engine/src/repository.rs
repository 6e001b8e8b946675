//! Repository collaborator consumed by the comparison engine

use anyhow::Result;

/// Source of commit history and merge-base information
///
/// Log lines use the format `<hash> <message> <date> <author> <committer>`
/// understood by [`branchdiff_core::GitLogParser`].
pub trait Repository {
    /// Whether `name` resolves to a commit
    fn branch_exists(&self, name: &str) -> Result<bool>;

    /// Log lines of every commit reachable from `revision`, newest first
    fn log(&self, revision: &str) -> Result<Vec<String>>;

    /// Hashes of the best common ancestors of two revisions (zero, one or many)
    fn merge_base(&self, one: &str, two: &str) -> Result<Vec<String>>;

    /// Log line of a single commit
    fn log_commit(&self, hash: &str) -> Result<String>;
}

impl<R: Repository + ?Sized> Repository for &R {
    fn branch_exists(&self, name: &str) -> Result<bool> {
        (**self).branch_exists(name)
    }

    fn log(&self, revision: &str) -> Result<Vec<String>> {
        (**self).log(revision)
    }

    fn merge_base(&self, one: &str, two: &str) -> Result<Vec<String>> {
        (**self).merge_base(one, two)
    }

    fn log_commit(&self, hash: &str) -> Result<String> {
        (**self).log_commit(hash)
    }
}
