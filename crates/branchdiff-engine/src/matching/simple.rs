//! Pairwise commit matching
//!
//! Every filtered master commit after the merge base is matched either by its
//! chosen tracking ID against every feature commit carrying the same ID
//! anywhere in its history, or, without tracking ID, by its exact message against the feature commits that
//! lack a tracking ID. One pair is emitted per feature candidate, so an ID with
//! several commits on a side is counted once per commit and not once per
//! logical change.

use branchdiff_core::{BranchType, CommitData, TrackingId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::branch::{BranchData, PerBranch};

/// How a master and a feature commit were matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Same tracking ID and same message
    TrackingIdAndMessage,
    /// Same tracking ID, different message
    TrackingIdOnly,
    /// Neither has a tracking ID, messages are equal
    Message,
}

/// One master commit paired with one feature commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub master: CommitData,
    pub feature: CommitData,
    pub kind: MatchKind,
}

/// Keys found on both branches during one matching pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonKeys {
    pub tracking_ids: BTreeSet<TrackingId>,
    pub messages: BTreeSet<String>,
}

/// Output of the simple matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMatches {
    pub pairs: Vec<MatchedPair>,
    pub common: CommonKeys,
}

impl SimpleMatches {
    fn count(&self, kind: MatchKind) -> usize {
        self.pairs.iter().filter(|p| p.kind == kind).count()
    }

    pub fn matched_by_message(&self) -> usize {
        self.count(MatchKind::Message)
    }

    pub fn matched_by_tracking_id_only(&self) -> usize {
        self.count(MatchKind::TrackingIdOnly)
    }

    pub fn matched_by_both(&self) -> usize {
        self.count(MatchKind::TrackingIdAndMessage)
    }
}

/// Pairwise matcher
pub struct SimpleCommitMatcher;

impl SimpleCommitMatcher {
    /// Matches commits and returns the pairs plus the unique commits per branch
    pub fn match_commits(master: &BranchData, feature: &BranchData) -> (SimpleMatches, PerBranch<Vec<CommitData>>) {
        let mut pairs = Vec::new();
        let mut common = CommonKeys::default();

        for master_commit in master.commits_after_merge_base_filtered() {
            match master_commit.tracking_id() {
                Some(id) => {
                    let candidates = feature.commits_with_tracking_id(id);
                    if candidates.is_empty() {
                        continue;
                    }
                    log::debug!(
                        "Found matching commits by tracking ID {}. Master commit: {}, feature commits: {}",
                        id,
                        master_commit.as_oneline_string(false, false, false),
                        candidates.len()
                    );
                    for feature_commit in candidates {
                        let kind = if master_commit.message == feature_commit.message {
                            MatchKind::TrackingIdAndMessage
                        } else {
                            log::warn!(
                                "Tracking ID is the same for commits, but commit message differs:\n\
                                 Master branch commit: {}\n\
                                 Feature branch commit: {}",
                                master_commit.as_oneline_string(false, false, false),
                                feature_commit.as_oneline_string(false, false, false)
                            );
                            MatchKind::TrackingIdOnly
                        };
                        pairs.push(MatchedPair {
                            master: master_commit.clone(),
                            feature: feature_commit.clone(),
                            kind,
                        });
                    }
                    common.tracking_ids.insert(id.clone());
                }
                None => {
                    let message = &master_commit.message;
                    if !master.has_missing_tracking_id_message(message) {
                        continue;
                    }
                    let feature_commits = feature.commits_with_missing_tracking_id_message(message);
                    if feature_commits.is_empty() {
                        continue;
                    }
                    log::warn!(
                        "Found match by commit message.\nMaster branch commit: {}\nFeature branch commit(s): {}",
                        master_commit.as_oneline_string(false, false, false),
                        feature_commits
                            .iter()
                            .map(|c| c.as_oneline_string(false, false, false))
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    for feature_commit in feature_commits {
                        pairs.push(MatchedPair {
                            master: master_commit.clone(),
                            feature: feature_commit.clone(),
                            kind: MatchKind::Message,
                        });
                    }
                    common.messages.insert(message.clone());
                }
            }
        }

        let unique = PerBranch::new(
            Self::determine_unique_commits(master, &common),
            Self::determine_unique_commits(feature, &common),
        );
        for branch in [master, feature] {
            log::info!(
                "Identified {} unique commits on branch: {}",
                unique.get(branch.branch_type()).len(),
                branch.name()
            );
        }

        (SimpleMatches { pairs, common }, unique)
    }

    /// A commit is unique when its tracking ID was never matched, or, without
    /// tracking ID, when its message was never matched
    fn determine_unique_commits(branch: &BranchData, common: &CommonKeys) -> Vec<CommitData> {
        branch
            .commits_after_merge_base_filtered()
            .into_iter()
            .filter(|c| match c.tracking_id() {
                Some(id) => !common.tracking_ids.contains(id),
                None => branch.has_missing_tracking_id_message(&c.message) && !common.messages.contains(&c.message),
            })
            .cloned()
            .collect()
    }

    /// Commits of `branch_type` that appear in at least one pair, in branch order
    pub fn matched_commits(branch: &BranchData, pairs: &[MatchedPair]) -> Vec<CommitData> {
        let hashes: BTreeSet<&str> = pairs
            .iter()
            .map(|p| match branch.branch_type() {
                BranchType::Master => p.master.hash.as_str(),
                BranchType::Feature => p.feature.hash.as_str(),
            })
            .collect();
        branch
            .commits_after_merge_base_filtered()
            .into_iter()
            .filter(|c| hashes.contains(c.hash.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchdiff_core::{GitLogParser, TrackingIdExtractor, TrackingIdPreference};

    fn branch(branch_type: BranchType, lines: &[&str], exceptions: &[String]) -> BranchData {
        let extractor = TrackingIdExtractor::new(TrackingIdPreference::default()).unwrap();
        let mut parser = GitLogParser::new(extractor);
        let mut b = BranchData::from_log_lines(branch_type, branch_type.label(), lines, &mut parser).unwrap();
        b.set_merge_base("base", exceptions).unwrap();
        b
    }

    const BASE: &str = "base YARN-0. Base 2021-01-01T00:00:00+00:00 a@x.org a@x.org";

    #[test]
    fn test_excepted_feature_commit_not_matched_by_message() {
        let master = branch(
            BranchType::Master,
            &["m1 Update docs 2021-01-02T00:00:00+00:00 a@x.org a@x.org", BASE],
            &[],
        );
        let feature = branch(
            BranchType::Feature,
            &["f1 Update docs 2021-01-02T00:00:00+00:00 bot@x.org bot@x.org", BASE],
            &["bot@x.org".to_string()],
        );

        let (matches, unique) = SimpleCommitMatcher::match_commits(&master, &feature);
        assert_eq!(matches.matched_by_message(), 0);
        assert!(matches.common.messages.is_empty());
        let master_unique: Vec<&str> = unique.master.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(master_unique, ["m1"]);
        assert!(unique.feature.is_empty());
    }

    #[test]
    fn test_matched_by_both_counts() {
        let master = branch(
            BranchType::Master,
            &["m1 YARN-5. Same 2021-01-02T00:00:00+00:00 a@x.org a@x.org", BASE],
            &[],
        );
        let feature = branch(
            BranchType::Feature,
            &["f1 YARN-5. Same 2021-01-03T00:00:00+00:00 a@x.org a@x.org", BASE],
            &[],
        );

        let (matches, unique) = SimpleCommitMatcher::match_commits(&master, &feature);
        // base and YARN-5
        assert_eq!(matches.matched_by_both(), 2);
        assert_eq!(matches.matched_by_tracking_id_only(), 0);
        assert!(unique.master.is_empty() && unique.feature.is_empty());
        assert_eq!(SimpleCommitMatcher::matched_commits(&feature, &matches.pairs).len(), 2);
    }
}
