//! Branchdiff Engine - Commit matching between two diverging branches
//!
//! This crate is responsible for:
//! - Loading branch history through a [`Repository`] (libgit2 via [`GitRepository`])
//! - Resolving the merge base and checking the shared history below it
//! - Matching commits pairwise or by commit groups
//! - Building the [`MatchingResult`] and [`ComparisonSummary`] handed to output sinks

mod branch;
mod comparator;
mod git;
mod index;
mod merge_base;
pub mod matching;
mod pipeline;
mod repository;
mod result;
pub mod sanity;
mod summary;

pub use branch::{BranchData, PerBranch};
pub use comparator::{BranchComparator, ComparatorConfig, OutputSink};
pub use git::GitRepository;
pub use index::OrderedIndex;
pub use matching::{
    CommitGroup, GroupKind, GroupedCommitMatcher, GroupedMatches, MatchKind, MatchedGroups, MatchedPair,
    MatchingAlgorithm, SimpleCommitMatcher, SimpleMatches,
};
pub use merge_base::MergeBaseResolver;
pub use pipeline::{CheckedBranches, Comparison, MatchedBranches, ParsedBranches, ResolvedBranches, RunStage};
pub use repository::Repository;
pub use result::{MatchDetails, MatchingResult};
pub use summary::{AlgorithmStats, BranchStats, ComparisonSummary, PresenceRow};
