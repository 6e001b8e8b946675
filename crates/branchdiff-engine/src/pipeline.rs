//! Stages of one comparison run
//!
//! Each stage is its own type and can only be produced by the previous one,
//! so matching cannot start before the sanity checks passed:
//!
//! ```text
//! ParsedBranches -> ResolvedBranches -> CheckedBranches -> MatchedBranches -> Comparison
//! ```

use branchdiff_core::{BranchType, CommitData, CompareError};
use std::fmt;

use crate::branch::BranchData;
use crate::matching::MatchingAlgorithm;
use crate::result::MatchingResult;
use crate::sanity;
use crate::summary::ComparisonSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Parsed,
    MergeBaseResolved,
    SanityChecked,
    Matched,
    Summarized,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Parsed => "PARSED",
            RunStage::MergeBaseResolved => "MERGE_BASE_RESOLVED",
            RunStage::SanityChecked => "SANITY_CHECKED",
            RunStage::Matched => "MATCHED",
            RunStage::Summarized => "SUMMARIZED",
        };
        f.write_str(s)
    }
}

fn enter(stage: RunStage) {
    log::debug!("Comparison stage: {}", stage);
}

/// Both branches parsed, merge base unknown
#[derive(Debug)]
pub struct ParsedBranches {
    master: BranchData,
    feature: BranchData,
}

impl ParsedBranches {
    pub fn new(master: BranchData, feature: BranchData) -> Self {
        enter(RunStage::Parsed);
        Self { master, feature }
    }

    /// Splits both histories at the merge-base commit
    pub fn resolve_merge_base(
        mut self,
        merge_base: CommitData,
        author_exceptions: &[String],
    ) -> Result<ResolvedBranches, CompareError> {
        self.master.set_merge_base(&merge_base.hash, author_exceptions)?;
        self.feature.set_merge_base(&merge_base.hash, author_exceptions)?;
        enter(RunStage::MergeBaseResolved);
        Ok(ResolvedBranches {
            master: self.master,
            feature: self.feature,
            merge_base,
        })
    }
}

#[derive(Debug)]
pub struct ResolvedBranches {
    master: BranchData,
    feature: BranchData,
    merge_base: CommitData,
}

impl ResolvedBranches {
    pub fn merge_base(&self) -> &CommitData {
        &self.merge_base
    }

    /// History below the merge base must match; optionally no commit after it
    /// may lack a tracking ID
    pub fn sanity_check(self, fail_on_missing_tracking_id: bool) -> Result<CheckedBranches, CompareError> {
        sanity::check_commits_before_merge_base(&self.master, &self.feature)?;
        if fail_on_missing_tracking_id {
            sanity::check_missing_tracking_ids(&[&self.master, &self.feature])?;
        }
        enter(RunStage::SanityChecked);
        Ok(CheckedBranches {
            master: self.master,
            feature: self.feature,
            merge_base: self.merge_base,
        })
    }
}

/// Ready for matching
#[derive(Debug)]
pub struct CheckedBranches {
    master: BranchData,
    feature: BranchData,
    merge_base: CommitData,
}

impl CheckedBranches {
    pub fn branch(&self, branch_type: BranchType) -> &BranchData {
        match branch_type {
            BranchType::Master => &self.master,
            BranchType::Feature => &self.feature,
        }
    }

    /// Runs `algorithm` without consuming the branches
    pub fn match_commits(&self, algorithm: MatchingAlgorithm) -> Result<MatchingResult, CompareError> {
        algorithm.run(&self.master, &self.feature, self.merge_base.clone())
    }

    pub fn into_matched(self, algorithm: MatchingAlgorithm) -> Result<MatchedBranches, CompareError> {
        let result = self.match_commits(algorithm)?;
        enter(RunStage::Matched);
        Ok(MatchedBranches {
            master: self.master,
            feature: self.feature,
            result,
        })
    }
}

#[derive(Debug)]
pub struct MatchedBranches {
    master: BranchData,
    feature: BranchData,
    result: MatchingResult,
}

impl MatchedBranches {
    pub fn result(&self) -> &MatchingResult {
        &self.result
    }

    pub fn summarize(self) -> Comparison {
        let summary = ComparisonSummary::new(&self.master, &self.feature, &self.result);
        enter(RunStage::Summarized);
        Comparison {
            master: self.master,
            feature: self.feature,
            result: self.result,
            summary,
        }
    }
}

/// Finished run, handed to the output sinks
#[derive(Debug)]
pub struct Comparison {
    pub master: BranchData,
    pub feature: BranchData,
    pub result: MatchingResult,
    pub summary: ComparisonSummary,
}

impl Comparison {
    pub fn branch(&self, branch_type: BranchType) -> &BranchData {
        match branch_type {
            BranchType::Master => &self.master,
            BranchType::Feature => &self.feature,
        }
    }
}
