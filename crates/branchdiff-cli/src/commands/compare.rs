//! Compare command implementation

use anyhow::Result;
use branchdiff_core::{ChoosePreference, TrackingIdPreference};
use branchdiff_engine::{BranchComparator, ComparatorConfig, GitRepository, MatchingAlgorithm, OutputSink};
use colored::Colorize;
use std::path::PathBuf;

use crate::helpers::normalize_projects;
use crate::sinks::{ConsoleSink, FileSink};

pub struct CompareArgs {
    pub repo: PathBuf,
    pub algorithm: MatchingAlgorithm,
    pub feature_branch: String,
    pub master_branch: String,
    pub author_exceptions: Vec<String>,
    pub console_mode: bool,
    pub output_dir: PathBuf,
    pub fail_on_missing_tracking_id: bool,
    pub primary_projects: Option<Vec<String>>,
    pub fallback_projects: Vec<String>,
    pub choose_last: bool,
}

impl CompareArgs {
    fn tracking_id_preference(&self) -> TrackingIdPreference {
        let mut preference = TrackingIdPreference::default();
        if let Some(primary) = &self.primary_projects {
            preference.primary = normalize_projects(primary);
        }
        preference.fallback = normalize_projects(&self.fallback_projects);
        if self.choose_last {
            preference.choose = ChoosePreference::Last;
        }
        preference
    }

    fn into_config(self) -> ComparatorConfig {
        let preference = self.tracking_id_preference();
        let mut config = ComparatorConfig::new(self.algorithm, self.feature_branch, self.master_branch)
            .with_author_exceptions(self.author_exceptions)
            .with_tracking_id_preference(preference);
        config.fail_on_missing_tracking_id = self.fail_on_missing_tracking_id;
        config.console_mode = self.console_mode;
        config.output_dir = (!self.console_mode).then_some(self.output_dir);
        config
    }
}

/// Compares two branches and reports the result
pub fn cmd_compare(args: CompareArgs) -> Result<()> {
    let repo = GitRepository::open(&args.repo)?;
    let config = args.into_config();
    log::info!(
        "Output mode: {}",
        match &config.output_dir {
            Some(dir) => format!("files under {:?}", dir),
            None => "console".to_string(),
        }
    );

    let mut sink: Box<dyn OutputSink> = match &config.output_dir {
        Some(dir) => Box::new(FileSink::new(dir.clone())),
        None => Box::new(ConsoleSink),
    };

    let comparator = BranchComparator::new(config, repo);
    let comparison = comparator.run(sink.as_mut())?;

    let summary = &comparison.summary;
    eprintln!(
        "{} {} unique on {}, {} unique on {}",
        "✓ Comparison finished:".green().bold(),
        summary.branches.master.unique.to_string().bold(),
        summary.branches.master.name,
        summary.branches.feature.unique.to_string().bold(),
        summary.branches.feature.name
    );
    Ok(())
}
