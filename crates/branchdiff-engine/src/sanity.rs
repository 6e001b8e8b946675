//! Pre-compare sanity checks

use branchdiff_core::CompareError;

use crate::branch::BranchData;

/// History below the merge base must be identical, position by position
pub fn check_commits_before_merge_base(master: &BranchData, feature: &BranchData) -> Result<(), CompareError> {
    let master_before = master.commits_before_merge_base();
    let feature_before = feature.commits_before_merge_base();

    if master_before.len() != feature_before.len() {
        return Err(CompareError::HistoryLengthMismatch {
            feature: feature.name().to_string(),
            feature_len: feature_before.len(),
            master: master.name().to_string(),
            master_len: master_before.len(),
        });
    }

    if let Some((index, (m, f))) = master_before
        .iter()
        .zip(feature_before)
        .enumerate()
        .find(|(_, (m, f))| m.hash != f.hash)
    {
        return Err(CompareError::HistoryHashMismatch {
            index,
            feature: feature.name().to_string(),
            feature_hash: f.hash.clone(),
            master: master.name().to_string(),
            master_hash: m.hash.clone(),
        });
    }

    log::info!(
        "Sanity check passed: {} commits before merge-base are identical",
        master_before.len()
    );
    Ok(())
}

/// Fails if any branch has commits without tracking ID after the merge base
pub fn check_missing_tracking_ids(branches: &[&BranchData]) -> Result<(), CompareError> {
    let missing: usize = branches.iter().map(|b| b.commits_with_missing_tracking_id().len()).sum();
    if missing > 0 {
        return Err(CompareError::MissingTrackingIds(missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchdiff_core::{BranchType, GitLogParser, TrackingIdExtractor, TrackingIdPreference};

    fn branch(branch_type: BranchType, name: &str, hashes: &[&str], merge_base: &str) -> BranchData {
        let extractor = TrackingIdExtractor::new(TrackingIdPreference::default()).unwrap();
        let mut parser = GitLogParser::new(extractor);
        // newest first
        let lines: Vec<String> = hashes
            .iter()
            .rev()
            .enumerate()
            .map(|(i, h)| format!("{h} YARN-{i}. Change 2021-01-{:02}T10:00:00+00:00 a@x.org a@x.org", 28 - i))
            .collect();
        let mut b = BranchData::from_log_lines(branch_type, name, &lines, &mut parser).unwrap();
        b.set_merge_base(merge_base, &[]).unwrap();
        b
    }

    #[test]
    fn test_identical_prefix_passes() {
        let master = branch(BranchType::Master, "m", &["a", "b", "c", "m1"], "c");
        let feature = branch(BranchType::Feature, "f", &["a", "b", "c", "f1", "f2"], "c");
        check_commits_before_merge_base(&master, &feature).unwrap();
    }

    #[test]
    fn test_length_mismatch() {
        let master = branch(BranchType::Master, "m", &["a", "b", "c"], "c");
        let feature = branch(BranchType::Feature, "f", &["b", "c"], "c");
        let err = check_commits_before_merge_base(&master, &feature).unwrap_err();
        assert!(matches!(err, CompareError::HistoryLengthMismatch { master_len: 2, feature_len: 1, .. }));
    }

    #[test]
    fn test_hash_mismatch_names_index_and_hashes() {
        let master = branch(BranchType::Master, "m", &["a", "b", "c"], "c");
        let feature = branch(BranchType::Feature, "f", &["a", "x", "c"], "c");
        let err = check_commits_before_merge_base(&master, &feature).unwrap_err();
        match err {
            CompareError::HistoryHashMismatch { index, master_hash, feature_hash, .. } => {
                assert_eq!(index, 1);
                assert_eq!(master_hash, "b");
                assert_eq!(feature_hash, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
