//! Branchdiff Core - Shared data models for branch comparison
//!
//! This crate defines the data structures used throughout the project:
//! `CommitData`, tracking ID extraction, the git log line parser and the
//! `CompareError` type every stage of a comparison run reports with.

mod error;
mod models;
mod parser;
mod tracking;

pub use error::CompareError;
pub use models::{BranchType, CommitData};
pub use parser::{determine_if_reverted, GitLogParser, COMMIT_FIELD_SEPARATOR};
pub use tracking::{
    ChoosePreference, TrackingId, TrackingIdExtractor, TrackingIdPreference, TrackingIds,
    TRACKING_ID_PATTERN, UPSTREAM_PROJECTS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_type_display() {
        assert_eq!(BranchType::Master.to_string(), "master branch");
        assert_eq!(BranchType::Feature.to_string(), "feature branch");
        assert_eq!(BranchType::Master.opposite(), BranchType::Feature);
    }
}
