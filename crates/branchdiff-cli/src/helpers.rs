//! Helper functions for CLI operations

use chrono::{DateTime, TimeZone};

/// Upper-cases and drops empty project prefixes, keeping order
pub fn normalize_projects(projects: &[String]) -> Vec<String> {
    projects
        .iter()
        .map(|p| p.trim().trim_end_matches('-').to_ascii_uppercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Name of the per-run output directory, e.g. `session-20211119_081211`
pub fn session_dir_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("session-{}", now.format("%Y%m%d_%H%M%S"))
}

/// Shortens `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
