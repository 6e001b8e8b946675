//! Statistics handed to the output sinks

use branchdiff_core::{BranchType, CommitData, TrackingId};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::branch::{BranchData, PerBranch};
use crate::matching::MatchingAlgorithm;
use crate::result::{MatchDetails, MatchingResult};

/// Commit counts of one branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    pub branch_type: BranchType,
    pub name: String,
    pub number_of_commits: usize,
    pub before_merge_base: usize,
    pub after_merge_base: usize,
    pub after_merge_base_filtered: usize,
    pub matched: usize,
    pub unique: usize,
    pub missing_tracking_id_all: usize,
    pub missing_tracking_id_after_merge_base: usize,
    pub missing_tracking_id_filtered: usize,
}

impl BranchStats {
    fn new(branch: &BranchData, result: &MatchingResult) -> Self {
        Self {
            branch_type: branch.branch_type(),
            name: branch.name().to_string(),
            number_of_commits: branch.number_of_commits(),
            before_merge_base: branch.commits_before_merge_base().len(),
            after_merge_base: branch.commits_after_merge_base().len(),
            after_merge_base_filtered: branch.after_merge_base_filtered_positions().len(),
            matched: result.matched_commits(branch.branch_type()).len(),
            unique: result.unique_commits(branch.branch_type()).len(),
            missing_tracking_id_all: branch.all_commits_with_missing_tracking_id().len(),
            missing_tracking_id_after_merge_base: branch.commits_with_missing_tracking_id().len(),
            missing_tracking_id_filtered: branch.missing_tracking_id_filtered_len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum AlgorithmStats {
    Simple {
        pairs: usize,
        matched_by_message: usize,
        matched_by_tracking_id_only: usize,
        matched_by_both: usize,
    },
    Grouped {
        matched_groups: usize,
        unmatched_groups: PerBranch<usize>,
        /// Group size to number of groups
        group_sizes: PerBranch<BTreeMap<usize, usize>>,
    },
}

impl AlgorithmStats {
    fn new(result: &MatchingResult) -> Self {
        match &result.details {
            MatchDetails::Simple(m) => AlgorithmStats::Simple {
                pairs: m.pairs.len(),
                matched_by_message: m.matched_by_message(),
                matched_by_tracking_id_only: m.matched_by_tracking_id_only(),
                matched_by_both: m.matched_by_both(),
            },
            MatchDetails::Grouped(m) => {
                let histogram = |branch_type: BranchType| {
                    let mut sizes = BTreeMap::new();
                    for group in m.groups(branch_type) {
                        *sizes.entry(group.size()).or_insert(0usize) += 1;
                    }
                    sizes
                };
                AlgorithmStats::Grouped {
                    matched_groups: m.matched_groups.len(),
                    unmatched_groups: m.unmatched_groups.map(|_, groups| groups.len()),
                    group_sizes: PerBranch::new(histogram(BranchType::Master), histogram(BranchType::Feature)),
                }
            }
        }
    }
}

/// One commit and the branches its tracking ID is known on
///
/// Commits without tracking ID are present nowhere by this measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceRow {
    pub hash: String,
    pub tracking_id: Option<TrackingId>,
    pub message: String,
    pub date: DateTime<FixedOffset>,
    pub committer: String,
    pub on_master: bool,
    pub on_feature: bool,
}

/// Everything the sinks report for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub algorithm: MatchingAlgorithm,
    pub merge_base: CommitData,
    pub common_before_merge_base: usize,
    pub common_after_merge_base: usize,
    pub branches: PerBranch<BranchStats>,
    pub details: AlgorithmStats,
    pub presence: Vec<PresenceRow>,
}

impl ComparisonSummary {
    pub fn new(master: &BranchData, feature: &BranchData, result: &MatchingResult) -> Self {
        Self {
            algorithm: result.algorithm,
            merge_base: result.merge_base.clone(),
            common_before_merge_base: result.before_merge_base.len(),
            common_after_merge_base: result.common_commits_after_merge_base().len(),
            branches: PerBranch::new(BranchStats::new(master, result), BranchStats::new(feature, result)),
            details: AlgorithmStats::new(result),
            presence: Self::presence_matrix(master, feature, result),
        }
    }

    /// Unique commits of both branches plus the master side of the common
    /// commits, newest first
    fn presence_matrix(master: &BranchData, feature: &BranchData, result: &MatchingResult) -> Vec<PresenceRow> {
        let mut commits: Vec<&CommitData> = result
            .unique_commits(BranchType::Master)
            .iter()
            .chain(result.unique_commits(BranchType::Feature))
            .chain(result.common_commits_after_merge_base())
            .collect();
        commits.sort_by(|a, b| b.date.cmp(&a.date));

        commits
            .into_iter()
            .map(|c| {
                let id = c.tracking_id();
                PresenceRow {
                    hash: c.hash.clone(),
                    tracking_id: id.cloned(),
                    message: c.message.clone(),
                    date: c.date,
                    committer: c.committer.clone(),
                    on_master: id.is_some_and(|id| master.has_tracking_id(id)),
                    on_feature: id.is_some_and(|id| feature.has_tracking_id(id)),
                }
            })
            .collect()
    }

    pub fn branch(&self, branch_type: BranchType) -> &BranchStats {
        self.branches.get(branch_type)
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=====Stats: BRANCHES=====")?;
        for br in [&self.branches.master, &self.branches.feature] {
            writeln!(f, "Number of commits on {} '{}': {}", br.branch_type.label(), br.name, br.number_of_commits)?;
        }

        writeln!(f, "\n=====Stats: UNIQUE COMMITS=====")?;
        for br in [&self.branches.master, &self.branches.feature] {
            writeln!(f, "Number of unique commits on {} '{}': {}", br.branch_type.label(), br.name, br.unique)?;
        }

        writeln!(f, "\n=====Stats: COMMON=====")?;
        writeln!(f, "Merge-base commit: {}", self.merge_base.as_oneline_string(true, false, false))?;
        writeln!(f, "Number of common commits before merge-base: {}", self.common_before_merge_base)?;
        writeln!(f, "Number of common commits after merge-base: {}", self.common_after_merge_base)?;

        for br in [&self.branches.master, &self.branches.feature] {
            writeln!(f, "\n=====Stats: COMMITS WITH MISSING TRACKING ID ON BRANCH: {}=====", br.name)?;
            writeln!(f, "Number of all commits with missing tracking ID: {}", br.missing_tracking_id_all)?;
            writeln!(
                f,
                "Number of commits with missing tracking ID after merge-base: {}",
                br.missing_tracking_id_after_merge_base
            )?;
            writeln!(
                f,
                "Number of commits with missing tracking ID after merge-base, filtered by author exceptions: {}",
                br.missing_tracking_id_filtered
            )?;
        }

        match &self.details {
            AlgorithmStats::Simple {
                pairs,
                matched_by_message,
                matched_by_tracking_id_only,
                matched_by_both,
            } => {
                writeln!(f, "\n=====Stats: COMMON COMMITS ACROSS BRANCHES=====")?;
                writeln!(f, "Number of matched commit pairs: {}", pairs)?;
                writeln!(
                    f,
                    "Number of common commits with missing tracking ID, matched by commit message: {}",
                    matched_by_message
                )?;
                writeln!(
                    f,
                    "Number of common commits with matching tracking ID but different commit message: {}",
                    matched_by_tracking_id_only
                )?;
                writeln!(
                    f,
                    "Number of common commits with matching tracking ID and commit message: {}",
                    matched_by_both
                )?;
            }
            AlgorithmStats::Grouped {
                matched_groups,
                unmatched_groups,
                group_sizes,
            } => {
                writeln!(f, "\n=====Stats: COMMIT GROUPS=====")?;
                writeln!(f, "Number of matched commit groups: {}", matched_groups)?;
                for br in [&self.branches.master, &self.branches.feature] {
                    writeln!(
                        f,
                        "Number of unmatched commit groups on {} '{}': {}",
                        br.branch_type.label(),
                        br.name,
                        unmatched_groups.get(br.branch_type)
                    )?;
                    let sizes: Vec<String> = group_sizes
                        .get(br.branch_type)
                        .iter()
                        .map(|(size, count)| format!("{}x{}", count, size))
                        .collect();
                    writeln!(f, "Group sizes on {} '{}': {}", br.branch_type.label(), br.name, sizes.join(", "))?;
                }
            }
        }
        Ok(())
    }
}
