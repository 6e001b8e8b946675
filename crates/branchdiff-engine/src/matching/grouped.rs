//! Equivalence-class commit matching
//!
//! Commits of one branch are grouped first: commits sharing any tracking ID,
//! transitively, form one group, and commits without tracking ID form one
//! group per distinct message. Groups keyed by their tracking ID set are then
//! matched across branches by key equality. Message groups have no key and
//! are never cross-matched.
//!
//! Example of a closure: `COMPX-5506 YARN-10500`, `YARN-10500` and
//! `COMPX-5506` on three commits end up in a single group keyed
//! `{COMPX-5506, YARN-10500}`.

use branchdiff_core::{BranchType, CommitData, CompareError, TrackingId};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::branch::{BranchData, PerBranch};
use crate::index::OrderedIndex;

/// How the commits of a group belong together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    TrackingId,
    Message,
}

/// Commits of one branch considered one logical change
///
/// Holds commit hashes only; resolve them through the owning [`BranchData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitGroup {
    pub branch_type: BranchType,
    pub kind: GroupKind,

    /// Oldest first
    commit_hashes: Vec<String>,
    oldest_commit_date: DateTime<FixedOffset>,
    tracking_ids: BTreeSet<TrackingId>,

    /// Last revert state seen for each tracking ID, walking oldest to newest
    revert_status: BTreeMap<TrackingId, bool>,
}

impl CommitGroup {
    /// Builds a group from at least one commit
    fn new(branch_type: BranchType, kind: GroupKind, mut commits: Vec<&CommitData>) -> Option<Self> {
        // stable: equal dates keep branch order
        commits.sort_by_key(|c| c.date);
        let oldest_commit_date = commits.first()?.date;

        let mut tracking_ids = BTreeSet::new();
        let mut revert_status = BTreeMap::new();
        for commit in &commits {
            for id in commit.tracking_ids.all() {
                tracking_ids.insert(id.clone());
                revert_status.insert(id.clone(), commit.reverted);
            }
        }

        Some(Self {
            branch_type,
            kind,
            commit_hashes: commits.iter().map(|c| c.hash.clone()).collect(),
            oldest_commit_date,
            tracking_ids,
            revert_status,
        })
    }

    pub fn size(&self) -> usize {
        self.commit_hashes.len()
    }

    pub fn commit_hashes(&self) -> &[String] {
        &self.commit_hashes
    }

    pub fn oldest_commit_date(&self) -> DateTime<FixedOffset> {
        self.oldest_commit_date
    }

    /// Union of the tracking IDs of all commits
    pub fn tracking_ids(&self) -> &BTreeSet<TrackingId> {
        &self.tracking_ids
    }

    /// Cross-branch key; message groups and empty sets have none
    pub fn key(&self) -> Option<&BTreeSet<TrackingId>> {
        match self.kind {
            GroupKind::TrackingId if !self.tracking_ids.is_empty() => Some(&self.tracking_ids),
            _ => None,
        }
    }

    pub fn revert_status(&self) -> &BTreeMap<TrackingId, bool> {
        &self.revert_status
    }

    pub fn is_reverted(&self, id: &TrackingId) -> Option<bool> {
        self.revert_status.get(id).copied()
    }

    /// Resolves the group's commits against the branch it was built from
    pub fn commits<'a>(&self, branch: &'a BranchData) -> Vec<&'a CommitData> {
        self.commit_hashes.iter().filter_map(|h| branch.commit_by_hash(h)).collect()
    }

    /// One line per commit with date and committer
    pub fn as_string(&self, branch: &BranchData) -> String {
        self.commits(branch)
            .iter()
            .map(|c| c.as_oneline_string(true, false, true) + "\n")
            .collect()
    }
}

fn key_to_string(key: &BTreeSet<TrackingId>) -> String {
    key.iter().map(TrackingId::as_str).collect::<Vec<_>>().join(",")
}

/// Groups the matching input of one branch
pub struct CommitGrouper;

impl CommitGrouper {
    /// Tracking ID groups followed by message groups, partition-checked
    pub fn group(branch: &BranchData) -> Result<Vec<CommitGroup>, CompareError> {
        let mut groups = Self::groups_by_tracking_id(branch)?;
        groups.extend(Self::groups_by_message(branch));
        Self::sanity_check(branch, &groups)?;
        Self::log_group_stats(branch, &groups);
        Ok(groups)
    }

    /// Transitive closure over shared tracking IDs
    fn groups_by_tracking_id(branch: &BranchData) -> Result<Vec<CommitGroup>, CompareError> {
        // Every tracking ID of every filtered commit, not only the chosen one
        let mut id_to_commits: OrderedIndex<&TrackingId> = OrderedIndex::new();
        for &pos in branch.after_merge_base_filtered_positions() {
            for id in branch.commit_at(pos).tracking_ids.all() {
                id_to_commits.push(id, pos);
            }
        }

        let mut groups = Vec::new();
        let mut keys: HashSet<BTreeSet<TrackingId>> = HashSet::new();
        let mut visited: HashSet<usize> = HashSet::new();

        for (_, positions) in id_to_commits.iter() {
            for &start in positions {
                if !visited.insert(start) {
                    continue;
                }

                let mut members = BTreeSet::new();
                let mut seen_ids: HashSet<&TrackingId> = HashSet::new();
                let mut queue = VecDeque::from([start]);
                while let Some(pos) = queue.pop_front() {
                    members.insert(pos);
                    for id in branch.commit_at(pos).tracking_ids.all() {
                        if !seen_ids.insert(id) {
                            continue;
                        }
                        for &other in id_to_commits.get(&id) {
                            if visited.insert(other) {
                                queue.push_back(other);
                            }
                        }
                    }
                }

                let commits = members.into_iter().map(|p| branch.commit_at(p)).collect();
                let Some(group) = CommitGroup::new(branch.branch_type(), GroupKind::TrackingId, commits) else {
                    continue;
                };
                if !keys.insert(group.tracking_ids().clone()) {
                    return Err(CompareError::DuplicateGroupKey {
                        branch_type: branch.branch_type(),
                        key: key_to_string(group.tracking_ids()),
                    });
                }
                groups.push(group);
            }
        }
        Ok(groups)
    }

    /// One group per distinct message among commits without tracking ID
    fn groups_by_message(branch: &BranchData) -> Vec<CommitGroup> {
        let Some(by_message) = branch.missing_tracking_id_by_message() else {
            return Vec::new();
        };
        by_message
            .iter()
            .filter_map(|(_, positions)| {
                let commits = positions.iter().map(|&p| branch.commit_at(p)).collect();
                CommitGroup::new(branch.branch_type(), GroupKind::Message, commits)
            })
            .collect()
    }

    /// Every filtered commit must sit in exactly one group
    pub fn sanity_check(branch: &BranchData, groups: &[CommitGroup]) -> Result<(), CompareError> {
        let on_branch = branch.after_merge_base_filtered_positions().len();
        let in_groups: usize = groups.iter().map(CommitGroup::size).sum();

        let grouped: HashSet<&str> = groups
            .iter()
            .flat_map(|g| g.commit_hashes().iter().map(String::as_str))
            .collect();

        if on_branch == in_groups && grouped.len() == in_groups {
            log::info!("Sanity check was successful for {} '{}'", branch.branch_type(), branch.name());
            return Ok(());
        }

        log::error!(
            "Number of all commits on {} '{}' vs. number of all commits in all groups is different!\n\
             Number of commits on branch is: {}\n\
             Number of all items in all groups: {}",
            branch.branch_type(),
            branch.name(),
            on_branch,
            in_groups
        );

        let mut unaccounted: Vec<String> = branch
            .commits_after_merge_base_filtered()
            .into_iter()
            .filter(|c| !grouped.contains(c.hash.as_str()))
            .map(|c| format!("{} {}", c.hash, c.message))
            .collect();

        // Hashes counted more than once
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for hash in groups.iter().flat_map(|g| g.commit_hashes()) {
            *counts.entry(hash.as_str()).or_default() += 1;
        }
        let mut duplicated: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(hash, n)| format!("{} (in {} groups)", hash, n))
            .collect();
        duplicated.sort();
        unaccounted.extend(duplicated);

        log::error!("Commits that are not found among groups: {:?}", unaccounted);
        Err(CompareError::GroupPartitionMismatch {
            branch_type: branch.branch_type(),
            branch: branch.name().to_string(),
            on_branch,
            in_groups,
            unaccounted,
        })
    }

    fn log_group_stats(branch: &BranchData, groups: &[CommitGroup]) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let partitions: [(&str, fn(usize) -> bool); 3] = [
            ("1 commit", |n| n == 1),
            ("2 commits", |n| n == 2),
            ("3 or more commits", |n| n > 2),
        ];
        for (label, pred) in partitions {
            let listing: Vec<String> = groups
                .iter()
                .filter(|g| pred(g.size()))
                .enumerate()
                .map(|(idx, g)| format!("Group {}:\n{}", idx + 1, g.as_string(branch)))
                .collect();
            log::debug!(
                "Listing commit groups with {} on {} ({}):\n{}",
                label,
                branch.branch_type(),
                listing.len(),
                listing.join("\n")
            );
        }
    }
}

/// A master group and the feature group with the same tracking ID set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedGroups {
    pub master: CommitGroup,
    pub feature: CommitGroup,
}

/// Output of the grouped matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedMatches {
    pub matched_groups: Vec<MatchedGroups>,
    pub unmatched_groups: PerBranch<Vec<CommitGroup>>,
}

impl GroupedMatches {
    /// All groups of one branch, matched ones first
    pub fn groups(&self, branch_type: BranchType) -> Vec<&CommitGroup> {
        self.matched_groups
            .iter()
            .map(|m| match branch_type {
                BranchType::Master => &m.master,
                BranchType::Feature => &m.feature,
            })
            .chain(self.unmatched_groups.get(branch_type))
            .collect()
    }
}

/// Group-based matcher
pub struct GroupedCommitMatcher;

impl GroupedCommitMatcher {
    /// Groups both branches and matches groups by tracking ID set
    pub fn match_commits(
        master: &BranchData,
        feature: &BranchData,
    ) -> Result<(GroupedMatches, PerBranch<Vec<CommitData>>), CompareError> {
        let master_groups = CommitGrouper::group(master)?;
        let feature_groups = CommitGrouper::group(feature)?;

        let feature_keys: HashMap<&BTreeSet<TrackingId>, usize> = feature_groups
            .iter()
            .enumerate()
            .filter_map(|(idx, g)| g.key().map(|k| (k, idx)))
            .collect();

        let mut matched_groups = Vec::new();
        let mut matched_feature: HashSet<usize> = HashSet::new();
        let mut unmatched_master = Vec::new();
        for group in &master_groups {
            match group.key().and_then(|k| feature_keys.get(k)) {
                Some(&feature_idx) => {
                    matched_feature.insert(feature_idx);
                    matched_groups.push(MatchedGroups {
                        master: group.clone(),
                        feature: feature_groups[feature_idx].clone(),
                    });
                }
                None => unmatched_master.push(group.clone()),
            }
        }
        let unmatched_feature: Vec<CommitGroup> = feature_groups
            .iter()
            .enumerate()
            .filter(|(idx, _)| !matched_feature.contains(idx))
            .map(|(_, g)| g.clone())
            .collect();

        log::info!(
            "Matched {} commit groups, unmatched groups: {} on {}, {} on {}",
            matched_groups.len(),
            unmatched_master.len(),
            master.name(),
            unmatched_feature.len(),
            feature.name()
        );

        let matches = GroupedMatches {
            matched_groups,
            unmatched_groups: PerBranch::new(unmatched_master, unmatched_feature),
        };
        let unique = PerBranch::new(
            Self::commits_of(master, matches.unmatched_groups.get(BranchType::Master)),
            Self::commits_of(feature, matches.unmatched_groups.get(BranchType::Feature)),
        );
        Ok((matches, unique))
    }

    /// Commits of `groups`, in branch order
    pub fn commits_of<'g>(branch: &BranchData, groups: impl IntoIterator<Item = &'g CommitGroup>) -> Vec<CommitData> {
        let hashes: HashSet<&str> = groups
            .into_iter()
            .flat_map(|g| g.commit_hashes().iter().map(String::as_str))
            .collect();
        branch
            .commits_after_merge_base_filtered()
            .into_iter()
            .filter(|c| hashes.contains(c.hash.as_str()))
            .cloned()
            .collect()
    }
}
