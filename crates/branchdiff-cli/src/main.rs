//! Branch-Diff CLI - Compares the commits of two diverging branches
//!
//! Provides:
//! - Simple pairwise commit matching
//! - Grouped commit matching over shared tracking IDs
//! - Console or file reports of unique and common commits

mod commands;
mod helpers;
mod output;
mod sinks;

use anyhow::Result;
use branchdiff_engine::MatchingAlgorithm;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use commands::{cmd_compare, CompareArgs};

#[derive(Parser)]
#[command(name = "branch-diff")]
#[command(about = "Finds the commits that exist on one branch but not on the other", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the git repository
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Pairwise matching by tracking ID or commit message
    Simple,
    /// Matching of commit groups connected by tracking IDs
    Grouped,
}

impl From<Algorithm> for MatchingAlgorithm {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Simple => MatchingAlgorithm::Simple,
            Algorithm::Grouped => MatchingAlgorithm::Grouped,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compares a feature branch with a master branch
    Compare {
        /// Matching algorithm
        #[arg(value_enum)]
        algorithm: Algorithm,

        /// Feature branch (e.g. origin/CDH-7.1-maint)
        feature_branch: String,

        /// Master branch (e.g. origin/trunk)
        master_branch: String,

        /// Commit authors to leave out of matching
        #[arg(long, num_args = 1..)]
        commit_author_exceptions: Vec<String>,

        /// Print results to the console instead of writing files
        #[arg(long)]
        console_mode: bool,

        /// Directory for file output; a session directory is created inside
        #[arg(short, long, default_value = "./branch-diff-output")]
        output_dir: PathBuf,

        /// Fail if a commit after the merge base has no tracking ID
        #[arg(long)]
        fail_on_missing_tracking_id: bool,

        /// Projects whose tracking IDs are preferred (default: upstream Apache projects)
        #[arg(long, num_args = 1..)]
        primary_projects: Option<Vec<String>>,

        /// Projects tried when no primary project matches (default: any)
        #[arg(long, num_args = 1..)]
        fallback_projects: Vec<String>,

        /// Pick the last preferred tracking ID of a message instead of the first
        #[arg(long)]
        choose_last: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logger
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&cli.log_level)
    ).init();

    match cli.command {
        Commands::Compare {
            algorithm,
            feature_branch,
            master_branch,
            commit_author_exceptions,
            console_mode,
            output_dir,
            fail_on_missing_tracking_id,
            primary_projects,
            fallback_projects,
            choose_last,
        } => {
            cmd_compare(CompareArgs {
                repo: cli.repo,
                algorithm: algorithm.into(),
                feature_branch,
                master_branch,
                author_exceptions: commit_author_exceptions,
                console_mode,
                output_dir,
                fail_on_missing_tracking_id,
                primary_projects,
                fallback_projects,
                choose_last,
            })?;
        }
    }

    Ok(())
}
