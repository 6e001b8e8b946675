//! Branch-agnostic output of one comparison run

use branchdiff_core::{BranchType, CommitData};
use serde::{Deserialize, Serialize};

use crate::branch::PerBranch;
use crate::matching::{CommitGroup, GroupedMatches, MatchedGroups, MatchedPair, MatchingAlgorithm, SimpleMatches};

/// Algorithm-specific matching output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum MatchDetails {
    Simple(SimpleMatches),
    Grouped(GroupedMatches),
}

/// Result of matching two branches
///
/// `matched_commits` and `unique_commits` partition each branch's
/// after-merge-base, author-filtered commits; both keep branch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub algorithm: MatchingAlgorithm,
    pub merge_base: CommitData,

    /// Commits below the merge base, identical on both branches
    pub before_merge_base: Vec<CommitData>,
    pub details: MatchDetails,
    pub matched_commits: PerBranch<Vec<CommitData>>,
    pub unique_commits: PerBranch<Vec<CommitData>>,
}

impl MatchingResult {
    pub fn unique_commits(&self, branch_type: BranchType) -> &[CommitData] {
        self.unique_commits.get(branch_type)
    }

    pub fn matched_commits(&self, branch_type: BranchType) -> &[CommitData] {
        self.matched_commits.get(branch_type)
    }

    /// Matched pairs, simple algorithm only
    pub fn pairs(&self) -> Option<&[MatchedPair]> {
        match &self.details {
            MatchDetails::Simple(m) => Some(&m.pairs),
            MatchDetails::Grouped(_) => None,
        }
    }

    /// Matched groups, grouped algorithm only
    pub fn matched_groups(&self) -> Option<&[MatchedGroups]> {
        match &self.details {
            MatchDetails::Simple(_) => None,
            MatchDetails::Grouped(m) => Some(&m.matched_groups),
        }
    }

    /// Unmatched groups of one branch, grouped algorithm only
    pub fn unmatched_groups(&self, branch_type: BranchType) -> Option<&[CommitGroup]> {
        match &self.details {
            MatchDetails::Simple(_) => None,
            MatchDetails::Grouped(m) => Some(m.unmatched_groups.get(branch_type)),
        }
    }

    /// Master side of every match after the merge base
    pub fn common_commits_after_merge_base(&self) -> &[CommitData] {
        self.matched_commits(BranchType::Master)
    }
}
