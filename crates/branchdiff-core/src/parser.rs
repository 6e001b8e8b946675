//! Git log line parsing
//!
//! Line format: `<hash> <message...> <date> <author> <committer>`, fields
//! separated by a single space. The message is everything between the hash
//! and the last three fields; the committer may be empty.

use chrono::DateTime;
use std::collections::BTreeSet;

use crate::error::CompareError;
use crate::models::CommitData;
use crate::tracking::TrackingIdExtractor;

/// Field separator of log lines
pub const COMMIT_FIELD_SEPARATOR: char = ' ';

const REVERT: &str = "revert";

/// Parses git log lines into `CommitData`
#[derive(Debug, Clone)]
pub struct GitLogParser {
    extractor: TrackingIdExtractor,

    /// Project prefixes of every tracking ID seen so far
    unique_projects: BTreeSet<String>,
}

impl GitLogParser {
    pub fn new(extractor: TrackingIdExtractor) -> Self {
        Self {
            extractor,
            unique_projects: BTreeSet::new(),
        }
    }

    pub fn unique_projects(&self) -> &BTreeSet<String> {
        &self.unique_projects
    }

    /// Parses one log line
    pub fn parse_line(&mut self, line: &str) -> Result<CommitData, CompareError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split(COMMIT_FIELD_SEPARATOR).collect();
        if fields.len() < 4 {
            return Err(CompareError::InvalidLogLine {
                line: line.to_string(),
                reason: format!("expected at least 4 fields, found {}", fields.len()),
            });
        }

        let n = fields.len();
        let hash = fields[0];
        if hash.is_empty() {
            return Err(CompareError::InvalidLogLine {
                line: line.to_string(),
                reason: "missing commit hash".to_string(),
            });
        }
        let separator = COMMIT_FIELD_SEPARATOR.to_string();
        let message = fields[1..n - 3].join(separator.as_str());
        let date = DateTime::parse_from_rfc3339(fields[n - 3])
            .map_err(|_| CompareError::InvalidDate(fields[n - 3].to_string()))?;
        let author = fields[n - 2];
        let committer = fields[n - 1];

        let tracking_ids = self.extractor.extract(&message);
        for id in tracking_ids.all() {
            self.unique_projects.insert(id.project().to_string());
        }
        let (reverted, reverted_at_least_once) = determine_if_reverted(&message);

        Ok(CommitData {
            hash: hash.to_string(),
            tracking_ids,
            message,
            date,
            author: author.to_string(),
            committer: committer.to_string(),
            reverted,
            reverted_at_least_once,
        })
    }

    /// Parses all lines, keeping their order
    pub fn parse_all<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Vec<CommitData>, CompareError> {
        let commits = lines
            .iter()
            .map(|l| self.parse_line(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Parsed {} commits, tracking ID projects: {:?}", commits.len(), self.unique_projects);
        Ok(commits)
    }
}

/// `(reverted, reverted_at_least_once)`
///
/// A revert of a revert re-applies the change, so only an odd count of
/// "revert" words marks the commit as reverted.
pub fn determine_if_reverted(message: &str) -> (bool, bool) {
    let count = message.to_lowercase().matches(REVERT).count();
    (count % 2 == 1, count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{TrackingId, TrackingIdPreference};

    fn parser() -> GitLogParser {
        GitLogParser::new(TrackingIdExtractor::new(TrackingIdPreference::default()).unwrap())
    }

    #[test]
    fn test_parse_full_line() {
        let mut p = parser();
        let c = p
            .parse_line(
                "492e66a5f697b95f611420765f629a24c093d8e8 COMPX-7434: HADOOP-16314. Make sure all web end points \
                 are covered 2021-10-05T07:25:16-07:00 eyang@apache.org tdomok@cloudera.com",
            )
            .unwrap();
        assert_eq!(c.hash, "492e66a5f697b95f611420765f629a24c093d8e8");
        assert_eq!(c.message, "COMPX-7434: HADOOP-16314. Make sure all web end points are covered");
        assert_eq!(c.date.to_rfc3339(), "2021-10-05T07:25:16-07:00");
        assert_eq!(c.author, "eyang@apache.org");
        assert_eq!(c.committer, "tdomok@cloudera.com");
        assert_eq!(c.tracking_id(), Some(&TrackingId::new("HADOOP-16314")));
        assert!(!c.reverted);
        assert!(p.unique_projects().contains("COMPX"));
    }

    #[test]
    fn test_trailing_empty_committer() {
        let mut p = parser();
        let c = p
            .parse_line("bee136f9 CDPD-31036. Revert \"COMPX-6716: HDFS-16129\" 2021-11-19T08:12:11+01:00 tdomok@cloudera.com ")
            .unwrap();
        assert_eq!(c.author, "tdomok@cloudera.com");
        assert_eq!(c.committer, "");
        assert!(c.reverted);
        assert!(c.reverted_at_least_once);
    }

    #[test]
    fn test_too_few_fields() {
        let err = parser().parse_line("abc 2021-11-19T08:12:11+01:00 a").unwrap_err();
        assert!(matches!(err, CompareError::InvalidLogLine { .. }));
    }

    #[test]
    fn test_invalid_date() {
        let err = parser().parse_line("abc msg 2021-13-45 a b").unwrap_err();
        assert!(matches!(err, CompareError::InvalidDate(_)));
    }

    #[test]
    fn test_revert_of_revert() {
        assert_eq!(determine_if_reverted("Revert \"Revert \"YARN-1\"\""), (false, true));
        assert_eq!(determine_if_reverted("REVERT YARN-1"), (true, true));
        assert_eq!(determine_if_reverted("YARN-1 plain"), (false, false));
    }
}
