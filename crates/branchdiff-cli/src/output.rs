//! Output formatting structures for CLI display

use branchdiff_core::CommitData;
use branchdiff_engine::PresenceRow;
use tabled::Tabled;

use crate::helpers::truncate;

const MESSAGE_WIDTH: usize = 70;

/// Table row for one commit
#[derive(Tabled)]
pub struct CommitRow {
    #[tabled(rename = "Hash")]
    pub hash: String,
    #[tabled(rename = "Tracking ID")]
    pub tracking_id: String,
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Committer")]
    pub committer: String,
}

impl From<&CommitData> for CommitRow {
    fn from(c: &CommitData) -> Self {
        Self {
            hash: c.short_hash().to_string(),
            tracking_id: c.tracking_id().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            message: truncate(&c.message, MESSAGE_WIDTH),
            date: c.date.format("%Y-%m-%d %H:%M").to_string(),
            committer: c.committer.clone(),
        }
    }
}

/// Table row of the presence matrix
#[derive(Tabled)]
pub struct PresenceTableRow {
    #[tabled(rename = "Tracking ID")]
    pub tracking_id: String,
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Master")]
    pub on_master: String,
    #[tabled(rename = "Feature")]
    pub on_feature: String,
}

fn mark(present: bool) -> String {
    let symbol = if present { "✓" } else { "✗" };
    symbol.to_string()
}

impl From<&PresenceRow> for PresenceTableRow {
    fn from(r: &PresenceRow) -> Self {
        Self {
            tracking_id: r.tracking_id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            message: truncate(&r.message, MESSAGE_WIDTH),
            date: r.date.format("%Y-%m-%d %H:%M").to_string(),
            on_master: mark(r.on_master),
            on_feature: mark(r.on_feature),
        }
    }
}
