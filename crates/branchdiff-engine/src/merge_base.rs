//! Merge-base resolution

use anyhow::{Context, Result};
use branchdiff_core::{CommitData, CompareError, GitLogParser};

use crate::repository::Repository;

/// Resolves the single common ancestor of the feature and master branch
pub struct MergeBaseResolver;

impl MergeBaseResolver {
    /// Queries the repository and parses the merge-base commit
    pub fn resolve<R: Repository + ?Sized>(
        repo: &R,
        feature: &str,
        master: &str,
        parser: &mut GitLogParser,
    ) -> Result<CommitData> {
        let candidates = repo
            .merge_base(feature, master)
            .with_context(|| format!("Failed to query merge base of '{}' and '{}'", feature, master))?;
        let hash = Self::single_candidate(feature, master, candidates)?;

        let line = repo
            .log_commit(&hash)
            .with_context(|| format!("Failed to query merge-base commit {}", hash))?;
        let merge_base = parser.parse_line(&line)?;
        log::info!("Merge-base commit: {}", merge_base.as_oneline_string(true, false, false));
        Ok(merge_base)
    }

    /// Exactly one candidate is accepted; no tie-breaking is attempted
    pub fn single_candidate(feature: &str, master: &str, mut candidates: Vec<String>) -> Result<String, CompareError> {
        match candidates.len() {
            0 => Err(CompareError::NoMergeBase {
                feature: feature.to_string(),
                master: master.to_string(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(CompareError::AmbiguousMergeBase {
                feature: feature.to_string(),
                master: master.to_string(),
                candidates,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_candidate() {
        let hash = MergeBaseResolver::single_candidate("f", "m", vec!["abc".to_string()]).unwrap();
        assert_eq!(hash, "abc");
    }

    #[test]
    fn test_no_candidate() {
        let err = MergeBaseResolver::single_candidate("f", "m", vec![]).unwrap_err();
        assert!(matches!(err, CompareError::NoMergeBase { .. }));
    }

    #[test]
    fn test_ambiguous_candidates() {
        let err = MergeBaseResolver::single_candidate("f", "m", vec!["a".to_string(), "b".to_string()]).unwrap_err();
        match err {
            CompareError::AmbiguousMergeBase { candidates, .. } => assert_eq!(candidates, ["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
