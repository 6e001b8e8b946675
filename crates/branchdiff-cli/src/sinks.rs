//! Console and file reports of a finished comparison

use anyhow::{Context, Result};
use branchdiff_core::{BranchType, CommitData};
use branchdiff_engine::{Comparison, MatchDetails, MatchKind, OutputSink};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::{object::Rows, Color, Modify, Style}, Table, Tabled};

use crate::helpers::session_dir_name;
use crate::output::{CommitRow, PresenceTableRow};

fn table<T: Tabled>(rows: Vec<T>) -> Table {
    let mut table = Table::new(rows);
    table.with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_CYAN));
    table
}

fn kind_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::TrackingIdAndMessage => "tracking ID and message",
        MatchKind::TrackingIdOnly => "tracking ID only",
        MatchKind::Message => "message",
    }
}

fn oneline_list<'a>(commits: impl IntoIterator<Item = &'a CommitData>) -> String {
    commits
        .into_iter()
        .map(|c| c.as_oneline_string(true, true, true) + "\n")
        .collect()
}

/// Matched pairs or matched groups as text
fn common_commits_report(comparison: &Comparison) -> String {
    let mut res = String::new();
    match &comparison.result.details {
        MatchDetails::Simple(m) => {
            for pair in &m.pairs {
                res += &format!(
                    "{} <-> {} [{}]\n",
                    pair.master.as_oneline_string(true, false, false),
                    pair.feature.as_oneline_string(true, false, false),
                    kind_label(pair.kind)
                );
            }
        }
        MatchDetails::Grouped(m) => {
            for (idx, pair) in m.matched_groups.iter().enumerate() {
                let key: Vec<&str> = pair.master.tracking_ids().iter().map(|id| id.as_str()).collect();
                res += &format!("Group {}: {}\n", idx + 1, key.join(", "));
                res += &format!("  {}:\n{}", comparison.master.name(), pair.master.as_string(&comparison.master));
                res += &format!("  {}:\n{}", comparison.feature.name(), pair.feature.as_string(&comparison.feature));
                res += "\n";
            }
        }
    }
    res
}

/// Prints the report to stdout
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write(&mut self, comparison: &Comparison) -> Result<()> {
        let summary = &comparison.summary;
        println!("\n{}", "📊 Branch comparison".bright_cyan().bold());
        println!("{}", "━".repeat(60).bright_black());
        println!("{}", summary);

        for branch_type in BranchType::ALL {
            let branch = comparison.branch(branch_type);
            let unique = comparison.result.unique_commits(branch_type);
            println!(
                "\n{} {} '{}' ({})",
                "Unique commits on".bright_yellow(),
                branch_type.label(),
                branch.name().bold(),
                unique.len()
            );
            if unique.is_empty() {
                println!("  {}", "none".dimmed());
            } else {
                println!("{}", table(unique.iter().map(CommitRow::from).collect()));
            }
        }

        if !summary.presence.is_empty() {
            println!("\n{}", "All commits after merge-base".bright_yellow());
            println!("{}", table(summary.presence.iter().map(PresenceTableRow::from).collect()));
        }
        Ok(())
    }
}

/// Writes the report into a fresh session directory
pub struct FileSink {
    output_dir: PathBuf,
}

impl FileSink {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> Result<()> {
        let path = dir.join(name);
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        log::info!("Wrote {:?}", path);
        Ok(())
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, comparison: &Comparison) -> Result<()> {
        let dir = self.output_dir.join(session_dir_name(&chrono::Local::now()));
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create output directory {:?}", dir))?;

        Self::write_file(&dir, "summary.txt", &comparison.summary.to_string())?;
        for branch_type in BranchType::ALL {
            let branch = comparison.branch(branch_type);
            let role = branch_type.label();
            // newest first, like `git log`
            Self::write_file(&dir, &format!("git-log-{}.txt", role), &oneline_list(branch.commits().iter().rev()))?;
            Self::write_file(
                &dir,
                &format!("before-merge-base-{}.txt", role),
                &oneline_list(branch.commits_before_merge_base()),
            )?;
            Self::write_file(
                &dir,
                &format!("after-merge-base-{}.txt", role),
                &oneline_list(branch.commits_after_merge_base()),
            )?;
            Self::write_file(
                &dir,
                &format!("missing-tracking-id-{}.txt", role),
                &oneline_list(branch.commits_with_missing_tracking_id()),
            )?;
            Self::write_file(
                &dir,
                &format!("unique-commits-{}.txt", branch_type.label()),
                &oneline_list(comparison.result.unique_commits(branch_type)),
            )?;
        }
        Self::write_file(&dir, "common-commits.txt", &common_commits_report(comparison))?;

        let json = serde_json::to_string_pretty(&comparison.result).context("Failed to serialize matching result")?;
        Self::write_file(&dir, "matching-result.json", &json)?;

        println!("{} {}", "📁 Report written to".bright_cyan(), dir.display().to_string().bold());
        Ok(())
    }
}
