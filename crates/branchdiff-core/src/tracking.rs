//! Tracking ID extraction
//!
//! A tracking ID is an issue-tracker key such as `YARN-10295` embedded in a
//! commit message. One message may reference several of them (a downstream
//! key wrapping an upstream one, or a revert of another commit). Extraction
//! keeps all of them for grouping and picks one "chosen" ID for indexing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::CompareError;

/// Default pattern: `PROJECT-NUMBER`
pub const TRACKING_ID_PATTERN: &str = r"([A-Z]+-\d+)";

/// Upstream Apache projects, preferred when a message carries several IDs
pub const UPSTREAM_PROJECTS: [&str; 5] = ["HADOOP", "HDFS", "YARN", "MAPREDUCE", "HBASE"];

/// An issue-tracker identifier, e.g. `HDFS-16129`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(String);

impl TrackingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project prefix: `HDFS` for `HDFS-16129`
    pub fn project(&self) -> &str {
        self.0.split_once('-').map(|(p, _)| p).unwrap_or(&self.0)
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All tracking IDs of one commit message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingIds {
    chosen: Option<TrackingId>,
    all: BTreeSet<TrackingId>,
}

impl TrackingIds {
    pub fn new(chosen: Option<TrackingId>, all: BTreeSet<TrackingId>) -> Self {
        Self { chosen, all }
    }

    /// No tracking ID at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn chosen(&self) -> Option<&TrackingId> {
        self.chosen.as_ref()
    }

    pub fn all(&self) -> &BTreeSet<TrackingId> {
        &self.all
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Which candidate wins among the IDs of the preferred project set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoosePreference {
    #[default]
    First,
    Last,
}

/// Ordered project preferences for picking the chosen tracking ID
///
/// IDs from `primary` projects win, then IDs from `fallback` projects. When
/// neither list matches, any ID of the message is taken, so a message with at
/// least one ID always has a chosen one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingIdPreference {
    pub primary: Vec<String>,
    pub fallback: Vec<String>,
    pub choose: ChoosePreference,
}

impl Default for TrackingIdPreference {
    fn default() -> Self {
        Self {
            primary: UPSTREAM_PROJECTS.iter().map(|p| p.to_string()).collect(),
            fallback: Vec::new(),
            choose: ChoosePreference::First,
        }
    }
}

impl TrackingIdPreference {
    /// Accepts any project, picks by message order only
    pub fn any_project() -> Self {
        Self {
            primary: Vec::new(),
            fallback: Vec::new(),
            choose: ChoosePreference::First,
        }
    }

    fn pick<'a>(&self, candidates: &'a [TrackingId]) -> Option<&'a TrackingId> {
        let from = |projects: &[String]| -> Vec<&'a TrackingId> {
            candidates
                .iter()
                .filter(|id| projects.is_empty() || projects.iter().any(|p| p == id.project()))
                .collect()
        };

        let mut preferred = if self.primary.is_empty() {
            Vec::new()
        } else {
            from(&self.primary)
        };
        if preferred.is_empty() {
            preferred = from(&self.fallback);
        }
        if preferred.is_empty() {
            preferred = candidates.iter().collect();
        }

        match self.choose {
            ChoosePreference::First => preferred.first().copied(),
            ChoosePreference::Last => preferred.last().copied(),
        }
    }
}

/// Finds tracking IDs in commit messages
#[derive(Debug, Clone)]
pub struct TrackingIdExtractor {
    pattern: Regex,
    preference: TrackingIdPreference,
}

impl TrackingIdExtractor {
    /// Extractor with the default `PROJECT-NUMBER` pattern
    pub fn new(preference: TrackingIdPreference) -> Result<Self, CompareError> {
        Self::with_pattern(TRACKING_ID_PATTERN, preference)
    }

    /// Extractor with a custom pattern; the first capture group is the ID
    pub fn with_pattern(pattern: &str, preference: TrackingIdPreference) -> Result<Self, CompareError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            preference,
        })
    }

    pub fn preference(&self) -> &TrackingIdPreference {
        &self.preference
    }

    /// Extracts every tracking ID of `message` and picks the chosen one
    pub fn extract(&self, message: &str) -> TrackingIds {
        // Message order, duplicates dropped
        let mut ordered: Vec<TrackingId> = Vec::new();
        for caps in self.pattern.captures_iter(message) {
            let Some(m) = caps.get(1) else { continue };
            let id = TrackingId::new(m.as_str());
            if !ordered.contains(&id) {
                ordered.push(id);
            }
        }

        let chosen = self.preference.pick(&ordered).cloned();
        TrackingIds::new(chosen, ordered.into_iter().collect())
    }
}
