//! Error types for branchdiff-core

use crate::models::BranchType;

/// Errors that abort a comparison run
///
/// Every variant is terminal for the run: there are no retries and no partial
/// results. Messages carry enough context (hashes, indices, branch names) to
/// diagnose the failure without re-running at a higher log level.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Merge base not found between branches '{feature}' and '{master}' (no common ancestor)")]
    NoMergeBase { feature: String, master: String },

    #[error("Ambiguous merge base between branches '{feature}' and '{master}': {candidates:?}")]
    AmbiguousMergeBase {
        feature: String,
        master: String,
        candidates: Vec<String>,
    },

    #[error("Merge base cannot be found among commits of {branch_type} '{branch}'. Merge base hash: {hash}")]
    MergeBaseNotFound {
        branch_type: BranchType,
        branch: String,
        hash: String,
    },

    #[error("Commit list of {branch_type} '{branch}' is empty")]
    EmptyHistory { branch_type: BranchType, branch: String },

    #[error(
        "Number of commits before merge-base does not match. \
         Feature branch '{feature}' has: {feature_len} commits, \
         master branch '{master}' has: {master_len} commits"
    )]
    HistoryLengthMismatch {
        feature: String,
        feature_len: usize,
        master: String,
        master_len: usize,
    },

    #[error(
        "Commit hash mismatch below merge-base commit.\n\
         Index: {index}\n\
         Hash of commit on {feature}: {feature_hash}\n\
         Hash of commit on {master}: {master_hash}"
    )]
    HistoryHashMismatch {
        index: usize,
        feature: String,
        feature_hash: String,
        master: String,
        master_hash: String,
    },

    #[error(
        "Number of all commits on {branch_type} '{branch}' ({on_branch}) differs from \
         number of all commits in all groups ({in_groups}).\n\
         Commits missing from groups:\n{}",
        .unaccounted.join("\n")
    )]
    GroupPartitionMismatch {
        branch_type: BranchType,
        branch: String,
        on_branch: usize,
        in_groups: usize,
        unaccounted: Vec<String>,
    },

    #[error("Duplicate commit group key on {branch_type}: {key}")]
    DuplicateGroupKey { branch_type: BranchType, key: String },

    #[error("Invalid git log line '{line}': {reason}")]
    InvalidLogLine { line: String, reason: String },

    #[error("Invalid commit date '{0}', expected ISO-8601 with offset")]
    InvalidDate(String),

    #[error("{branch_type} does not exist with name '{branch}'")]
    BranchNotFound { branch_type: BranchType, branch: String },

    #[error("Found {0} commits with missing tracking ID after merge-base! Halting as configured")]
    MissingTrackingIds(usize),

    #[error("Invalid tracking ID pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
