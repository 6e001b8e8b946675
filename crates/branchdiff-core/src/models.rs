//! Core data models for branch comparison

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tracking::{TrackingId, TrackingIds};

/// Role of a branch in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BranchType {
    Master,
    Feature,
}

impl BranchType {
    /// Both roles, master first
    pub const ALL: [BranchType; 2] = [BranchType::Master, BranchType::Feature];

    /// Short lowercase label, used for file names
    pub fn label(&self) -> &'static str {
        match self {
            BranchType::Master => "master",
            BranchType::Feature => "feature",
        }
    }

    /// The other side of the comparison
    pub fn opposite(&self) -> BranchType {
        match self {
            BranchType::Master => BranchType::Feature,
            BranchType::Feature => BranchType::Master,
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} branch", self.label())
    }
}

/// A single commit parsed from one git log line
///
/// Created once by the log parser and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitData {
    /// Full commit hash
    pub hash: String,

    /// Chosen tracking ID plus every tracking ID found in the message
    pub tracking_ids: TrackingIds,

    /// Commit message (summary line)
    pub message: String,

    /// Commit date with its original offset
    pub date: DateTime<FixedOffset>,

    /// Author e-mail
    pub author: String,

    /// Committer e-mail, may be empty
    pub committer: String,

    /// This commit is a revert (odd number of "revert" words in the message)
    pub reverted: bool,

    /// The message mentions a revert at least once
    pub reverted_at_least_once: bool,
}

impl CommitData {
    /// The tracking ID used for indexing and pairwise matching
    pub fn tracking_id(&self) -> Option<&TrackingId> {
        self.tracking_ids.chosen()
    }

    pub fn has_tracking_id(&self) -> bool {
        self.tracking_ids.chosen().is_some()
    }

    /// First 12 characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..12).unwrap_or(&self.hash)
    }

    /// `<hash> <message>`, optionally followed by date, author and committer
    pub fn as_oneline_string(&self, incl_date: bool, incl_author: bool, incl_committer: bool) -> String {
        let mut s = format!("{} {}", self.hash, self.message);
        if incl_date {
            s.push(' ');
            s.push_str(&self.date.to_rfc3339());
        }
        if incl_author {
            s.push(' ');
            s.push_str(&self.author);
        }
        if incl_committer {
            s.push(' ');
            s.push_str(&self.committer);
        }
        s
    }
}

impl fmt::Display for CommitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.short_hash(), self.message, self.date.to_rfc3339())
    }
}
