//! Commit matching algorithms

mod grouped;
mod simple;

pub use grouped::{CommitGroup, CommitGrouper, GroupKind, GroupedCommitMatcher, GroupedMatches, MatchedGroups};
pub use simple::{CommonKeys, MatchKind, MatchedPair, SimpleCommitMatcher, SimpleMatches};

use branchdiff_core::{CommitData, CompareError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::branch::{BranchData, PerBranch};
use crate::result::{MatchDetails, MatchingResult};

/// Which matcher a comparison run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingAlgorithm {
    Simple,
    #[default]
    Grouped,
}

impl MatchingAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingAlgorithm::Simple => "simple",
            MatchingAlgorithm::Grouped => "grouped",
        }
    }

    /// Runs the matcher on two branches whose merge base is already set
    ///
    /// Public callers go through `CheckedBranches::match_commits`.
    pub(crate) fn run(
        &self,
        master: &BranchData,
        feature: &BranchData,
        merge_base: CommitData,
    ) -> Result<MatchingResult, CompareError> {
        for branch in [master, feature] {
            if branch.merge_base_index().is_none() {
                return Err(CompareError::MergeBaseNotFound {
                    branch_type: branch.branch_type(),
                    branch: branch.name().to_string(),
                    hash: merge_base.hash.clone(),
                });
            }
        }

        log::info!(
            "Matching commits of {} and {} with the {} algorithm",
            master.name(),
            feature.name(),
            self
        );

        let (details, matched_commits, unique_commits) = match self {
            MatchingAlgorithm::Simple => {
                let (matches, unique) = SimpleCommitMatcher::match_commits(master, feature);
                let matched = PerBranch::new(
                    SimpleCommitMatcher::matched_commits(master, &matches.pairs),
                    SimpleCommitMatcher::matched_commits(feature, &matches.pairs),
                );
                (MatchDetails::Simple(matches), matched, unique)
            }
            MatchingAlgorithm::Grouped => {
                let (matches, unique) = GroupedCommitMatcher::match_commits(master, feature)?;
                let matched = PerBranch::new(
                    GroupedCommitMatcher::commits_of(master, matches.matched_groups.iter().map(|m| &m.master)),
                    GroupedCommitMatcher::commits_of(feature, matches.matched_groups.iter().map(|m| &m.feature)),
                );
                (MatchDetails::Grouped(matches), matched, unique)
            }
        };

        Ok(MatchingResult {
            algorithm: *self,
            merge_base,
            before_merge_base: master.commits_before_merge_base().to_vec(),
            details,
            matched_commits,
            unique_commits,
        })
    }
}

impl fmt::Display for MatchingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchingAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(MatchingAlgorithm::Simple),
            "grouped" => Ok(MatchingAlgorithm::Grouped),
            other => Err(format!("Unknown matching algorithm: {}", other)),
        }
    }
}
