//! Per-branch commit history and its derived indices

use branchdiff_core::{BranchType, CommitData, CompareError, GitLogParser, TrackingId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::index::OrderedIndex;

/// One value per branch role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerBranch<T> {
    pub master: T,
    pub feature: T,
}

impl<T> PerBranch<T> {
    pub fn new(master: T, feature: T) -> Self {
        Self { master, feature }
    }

    pub fn get(&self, branch_type: BranchType) -> &T {
        match branch_type {
            BranchType::Master => &self.master,
            BranchType::Feature => &self.feature,
        }
    }

    pub fn get_mut(&mut self, branch_type: BranchType) -> &mut T {
        match branch_type {
            BranchType::Master => &mut self.master,
            BranchType::Feature => &mut self.feature,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(BranchType, &T) -> U) -> PerBranch<U> {
        PerBranch {
            master: f(BranchType::Master, &self.master),
            feature: f(BranchType::Feature, &self.feature),
        }
    }
}

/// Views computed once the merge base is known
#[derive(Debug, Clone)]
struct MergeBaseViews {
    index: usize,

    /// After-merge-base positions whose author is not excepted
    after_filtered: Vec<usize>,

    /// After-merge-base positions without tracking ID, unfiltered
    missing_tracking_id: Vec<usize>,

    /// `after_filtered` positions without tracking ID, keyed by message
    missing_tracking_id_filtered: OrderedIndex<String>,
}

/// Ordered commit history of one branch
///
/// Commits are stored oldest first; every position handed out by this type
/// refers to that order. The merge-base views are empty until
/// [`BranchData::set_merge_base`] has run.
#[derive(Debug, Clone)]
pub struct BranchData {
    branch_type: BranchType,
    name: String,
    commits: Vec<CommitData>,
    hash_to_index: HashMap<String, usize>,

    /// Chosen tracking ID to commits, whole history
    tracking_id_to_commits: OrderedIndex<TrackingId>,

    views: Option<MergeBaseViews>,
}

impl BranchData {
    /// Builds branch data from git log lines, newest first
    pub fn from_log_lines<S: AsRef<str>>(
        branch_type: BranchType,
        name: impl Into<String>,
        lines: &[S],
        parser: &mut GitLogParser,
    ) -> Result<Self, CompareError> {
        let commits = parser.parse_all(lines)?;
        Ok(Self::from_commits(branch_type, name, commits))
    }

    /// Builds branch data from parsed commits, newest first
    pub fn from_commits(branch_type: BranchType, name: impl Into<String>, mut commits: Vec<CommitData>) -> Self {
        commits.reverse();

        let mut hash_to_index = HashMap::with_capacity(commits.len());
        let mut tracking_id_to_commits = OrderedIndex::new();
        for (idx, commit) in commits.iter().enumerate() {
            hash_to_index.insert(commit.hash.clone(), idx);
            if let Some(id) = commit.tracking_id() {
                tracking_id_to_commits.push(id.clone(), idx);
            }
        }

        let name = name.into();
        log::info!("Loaded {} commits of {} '{}'", commits.len(), branch_type, name);

        Self {
            branch_type,
            name,
            commits,
            hash_to_index,
            tracking_id_to_commits,
            views: None,
        }
    }

    pub fn branch_type(&self) -> BranchType {
        self.branch_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `master` for `origin/master`
    pub fn shortname(&self) -> &str {
        self.name.split_once('/').map(|(_, s)| s).unwrap_or(&self.name)
    }

    pub fn number_of_commits(&self) -> usize {
        self.commits.len()
    }

    /// Whole history, oldest first
    pub fn commits(&self) -> &[CommitData] {
        &self.commits
    }

    pub fn commit_at(&self, position: usize) -> &CommitData {
        &self.commits[position]
    }

    pub fn index_of(&self, hash: &str) -> Option<usize> {
        self.hash_to_index.get(hash).copied()
    }

    pub fn commit_by_hash(&self, hash: &str) -> Option<&CommitData> {
        self.index_of(hash).map(|idx| &self.commits[idx])
    }

    /// Commits whose chosen tracking ID is `id`, oldest first
    pub fn commits_with_tracking_id(&self, id: &TrackingId) -> Vec<&CommitData> {
        self.positions_to_commits(self.tracking_id_to_commits.get(id))
    }

    pub fn has_tracking_id(&self, id: &TrackingId) -> bool {
        self.tracking_id_to_commits.contains_key(id)
    }

    pub fn tracking_ids(&self) -> impl Iterator<Item = &TrackingId> {
        self.tracking_id_to_commits.keys()
    }

    /// Commits without tracking ID over the whole history
    pub fn all_commits_with_missing_tracking_id(&self) -> Vec<&CommitData> {
        self.commits.iter().filter(|c| !c.has_tracking_id()).collect()
    }

    /// Splits the history at the merge base and builds the filtered views
    ///
    /// Before = `[0, idx)`, after = `[idx, end]`, so the merge-base commit
    /// itself belongs to the after view.
    pub fn set_merge_base(&mut self, merge_base_hash: &str, author_exceptions: &[String]) -> Result<(), CompareError> {
        if self.commits.is_empty() {
            return Err(CompareError::EmptyHistory {
                branch_type: self.branch_type,
                branch: self.name.clone(),
            });
        }
        let index = self.index_of(merge_base_hash).ok_or_else(|| CompareError::MergeBaseNotFound {
            branch_type: self.branch_type,
            branch: self.name.clone(),
            hash: merge_base_hash.to_string(),
        })?;

        let is_excepted = |c: &CommitData| author_exceptions.iter().any(|a| a == &c.author);

        let mut after_filtered = Vec::new();
        let mut missing_tracking_id = Vec::new();
        let mut missing_tracking_id_filtered = OrderedIndex::new();
        for (pos, commit) in self.commits.iter().enumerate().skip(index) {
            let excepted = is_excepted(commit);
            if !excepted {
                after_filtered.push(pos);
            }
            if !commit.has_tracking_id() {
                missing_tracking_id.push(pos);
                if !excepted {
                    missing_tracking_id_filtered.push(commit.message.clone(), pos);
                }
            }
        }

        log::debug!(
            "Merge base of {} '{}' at index {}: {} commits before, {} after ({} after author filter)",
            self.branch_type,
            self.name,
            index,
            index,
            self.commits.len() - index,
            after_filtered.len()
        );

        self.views = Some(MergeBaseViews {
            index,
            after_filtered,
            missing_tracking_id,
            missing_tracking_id_filtered,
        });
        Ok(())
    }

    pub fn merge_base_index(&self) -> Option<usize> {
        self.views.as_ref().map(|v| v.index)
    }

    pub fn commits_before_merge_base(&self) -> &[CommitData] {
        match &self.views {
            Some(v) => &self.commits[..v.index],
            None => &[],
        }
    }

    pub fn commits_after_merge_base(&self) -> &[CommitData] {
        match &self.views {
            Some(v) => &self.commits[v.index..],
            None => &[],
        }
    }

    /// Positions of the after-merge-base commits that take part in matching
    pub fn after_merge_base_filtered_positions(&self) -> &[usize] {
        self.views.as_ref().map(|v| v.after_filtered.as_slice()).unwrap_or(&[])
    }

    /// After-merge-base commits with excepted authors dropped, oldest first
    pub fn commits_after_merge_base_filtered(&self) -> Vec<&CommitData> {
        self.positions_to_commits(self.after_merge_base_filtered_positions())
    }

    /// After-merge-base commits without tracking ID, author exceptions kept
    pub fn commits_with_missing_tracking_id(&self) -> Vec<&CommitData> {
        match &self.views {
            Some(v) => self.positions_to_commits(&v.missing_tracking_id),
            None => Vec::new(),
        }
    }

    /// Filtered commits without tracking ID, keyed by message
    pub fn missing_tracking_id_by_message(&self) -> Option<&OrderedIndex<String>> {
        self.views.as_ref().map(|v| &v.missing_tracking_id_filtered)
    }

    /// Filtered commits without tracking ID carrying exactly `message`
    pub fn commits_with_missing_tracking_id_message(&self, message: &str) -> Vec<&CommitData> {
        match &self.views {
            Some(v) => self.positions_to_commits(v.missing_tracking_id_filtered.get(message)),
            None => Vec::new(),
        }
    }

    pub fn has_missing_tracking_id_message(&self, message: &str) -> bool {
        self.views
            .as_ref()
            .is_some_and(|v| v.missing_tracking_id_filtered.contains_key(message))
    }

    /// Number of filtered commits without tracking ID
    pub fn missing_tracking_id_filtered_len(&self) -> usize {
        self.views
            .as_ref()
            .map(|v| v.missing_tracking_id_filtered.total_len())
            .unwrap_or(0)
    }

    fn positions_to_commits(&self, positions: &[usize]) -> Vec<&CommitData> {
        positions.iter().map(|&p| &self.commits[p]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchdiff_core::{TrackingIdExtractor, TrackingIdPreference};

    fn branch(lines: &[&str]) -> BranchData {
        let extractor = TrackingIdExtractor::new(TrackingIdPreference::default()).unwrap();
        let mut parser = GitLogParser::new(extractor);
        BranchData::from_log_lines(BranchType::Master, "origin/trunk", lines, &mut parser).unwrap()
    }

    fn sample() -> BranchData {
        branch(&[
            "ddd SPNEGO TLS verification 2021-01-04T10:00:00+00:00 bot@example.com bot@example.com",
            "ccc YARN-3. Third 2021-01-03T10:00:00+00:00 dev@example.com dev@example.com",
            "bbb Plain message 2021-01-02T10:00:00+00:00 dev@example.com dev@example.com",
            "aaa YARN-1. First 2021-01-01T10:00:00+00:00 dev@example.com dev@example.com",
        ])
    }

    #[test]
    fn test_ascending_order_and_indices() {
        let b = sample();
        let hashes: Vec<&str> = b.commits().iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, ["aaa", "bbb", "ccc", "ddd"]);
        assert_eq!(b.index_of("ccc"), Some(2));
        assert_eq!(b.shortname(), "trunk");
        assert_eq!(b.commits_with_tracking_id(&TrackingId::new("YARN-3")).len(), 1);
        assert_eq!(b.all_commits_with_missing_tracking_id().len(), 2);
    }

    #[test]
    fn test_views_empty_before_merge_base() {
        let b = sample();
        assert!(b.commits_before_merge_base().is_empty());
        assert!(b.commits_after_merge_base().is_empty());
        assert_eq!(b.merge_base_index(), None);
    }

    #[test]
    fn test_merge_base_split_and_author_filter() {
        let mut b = sample();
        b.set_merge_base("bbb", &["bot@example.com".to_string()]).unwrap();

        assert_eq!(b.merge_base_index(), Some(1));
        assert_eq!(b.commits_before_merge_base().len(), 1);
        assert_eq!(b.commits_after_merge_base().len(), 3);

        let filtered: Vec<&str> = b.commits_after_merge_base_filtered().iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(filtered, ["bbb", "ccc"]);

        // excepted author still accounted for in the unfiltered view
        assert_eq!(b.commits_with_missing_tracking_id().len(), 2);
        assert_eq!(b.missing_tracking_id_filtered_len(), 1);
        assert!(b.has_missing_tracking_id_message("Plain message"));
        assert!(!b.has_missing_tracking_id_message("SPNEGO TLS verification"));
    }

    #[test]
    fn test_merge_base_absent() {
        let mut b = sample();
        let err = b.set_merge_base("zzz", &[]).unwrap_err();
        assert!(matches!(err, CompareError::MergeBaseNotFound { ref hash, .. } if hash == "zzz"));
    }

    #[test]
    fn test_empty_history() {
        let mut b = BranchData::from_commits(BranchType::Feature, "empty", Vec::new());
        let err = b.set_merge_base("aaa", &[]).unwrap_err();
        assert!(matches!(err, CompareError::EmptyHistory { .. }));
    }
}
