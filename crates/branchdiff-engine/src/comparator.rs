//! Comparison run entry point

use anyhow::{Context, Result};
use branchdiff_core::{BranchType, CompareError, GitLogParser, TrackingIdExtractor, TrackingIdPreference};
use std::path::PathBuf;

use crate::branch::{BranchData, PerBranch};
use crate::matching::MatchingAlgorithm;
use crate::merge_base::MergeBaseResolver;
use crate::pipeline::{Comparison, ParsedBranches};
use crate::repository::Repository;

/// Settings of one comparison run
#[derive(Debug, Clone)]
pub struct ComparatorConfig {
    pub algorithm: MatchingAlgorithm,
    pub feature_branch: String,
    pub master_branch: String,

    /// Authors whose commits are left out of matching
    pub author_exceptions: Vec<String>,
    pub tracking_id_preference: TrackingIdPreference,
    pub fail_on_missing_tracking_id: bool,
    pub console_mode: bool,
    pub output_dir: Option<PathBuf>,
}

impl ComparatorConfig {
    pub fn new(algorithm: MatchingAlgorithm, feature_branch: impl Into<String>, master_branch: impl Into<String>) -> Self {
        Self {
            algorithm,
            feature_branch: feature_branch.into(),
            master_branch: master_branch.into(),
            author_exceptions: Vec::new(),
            tracking_id_preference: TrackingIdPreference::default(),
            fail_on_missing_tracking_id: false,
            console_mode: false,
            output_dir: None,
        }
    }

    pub fn with_author_exceptions(mut self, authors: Vec<String>) -> Self {
        self.author_exceptions = authors;
        self
    }

    pub fn with_tracking_id_preference(mut self, preference: TrackingIdPreference) -> Self {
        self.tracking_id_preference = preference;
        self
    }

    pub fn branch_name(&self, branch_type: BranchType) -> &str {
        match branch_type {
            BranchType::Master => &self.master_branch,
            BranchType::Feature => &self.feature_branch,
        }
    }
}

/// Receives the finished comparison
pub trait OutputSink {
    fn write(&mut self, comparison: &Comparison) -> Result<()>;
}

/// Compares two branches of one repository
pub struct BranchComparator<R: Repository> {
    config: ComparatorConfig,
    repo: R,
}

impl<R: Repository> BranchComparator<R> {
    pub fn new(config: ComparatorConfig, repo: R) -> Self {
        Self { config, repo }
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Both refs must resolve in the repository
    pub fn validate_branches(&self) -> Result<()> {
        for branch_type in BranchType::ALL {
            let name = self.config.branch_name(branch_type);
            let exists = self
                .repo
                .branch_exists(name)
                .with_context(|| format!("Failed to check {} '{}'", branch_type, name))?;
            if !exists {
                return Err(CompareError::BranchNotFound {
                    branch_type,
                    branch: name.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Runs every stage and returns the summarized comparison
    pub fn compare(&self) -> Result<Comparison> {
        log::info!(
            "Comparing feature '{}' with master '{}' (algorithm: {}, author exceptions: {:?})",
            self.config.feature_branch,
            self.config.master_branch,
            self.config.algorithm,
            self.config.author_exceptions
        );
        self.validate_branches()?;

        let extractor = TrackingIdExtractor::new(self.config.tracking_id_preference.clone())?;
        let mut parser = GitLogParser::new(extractor);

        let branches = self.load_branches(&mut parser)?;
        let merge_base = MergeBaseResolver::resolve(
            &self.repo,
            &self.config.feature_branch,
            &self.config.master_branch,
            &mut parser,
        )?;

        let comparison = ParsedBranches::new(branches.master, branches.feature)
            .resolve_merge_base(merge_base, &self.config.author_exceptions)?
            .sanity_check(self.config.fail_on_missing_tracking_id)?
            .into_matched(self.config.algorithm)?
            .summarize();
        Ok(comparison)
    }

    /// Compares and hands the result to `sink`
    pub fn run(&self, sink: &mut dyn OutputSink) -> Result<Comparison> {
        let comparison = self.compare()?;
        sink.write(&comparison).context("Failed to write comparison output")?;
        Ok(comparison)
    }

    fn load_branches(&self, parser: &mut GitLogParser) -> Result<PerBranch<BranchData>> {
        let mut load = |branch_type: BranchType| -> Result<BranchData> {
            let name = self.config.branch_name(branch_type);
            let lines = self
                .repo
                .log(name)
                .with_context(|| format!("Failed to read history of {} '{}'", branch_type, name))?;
            Ok(BranchData::from_log_lines(branch_type, name, &lines, parser)?)
        };
        let master = load(BranchType::Master)?;
        let feature = load(BranchType::Feature)?;
        Ok(PerBranch::new(master, feature))
    }
}
