// src/domain/complaints.rs

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintState {
    Open,
    Resolved,
    Other,
}

/// "Open" / "In Progress" are open, "Resolved" / "Closed" resolved.
pub fn classify_complaint(raw: &str) -> ComplaintState {
    match raw.trim().to_ascii_lowercase().as_str() {
        "open" | "in progress" => ComplaintState::Open,
        "resolved" | "closed" => ComplaintState::Resolved,
        _ => ComplaintState::Other,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplaintSummary {
    pub open: usize,
    pub resolved: usize,
    pub other: usize,
}

impl ComplaintSummary {
    pub fn total(&self) -> usize {
        self.open + self.resolved + self.other
    }
}

/// Tally complaint statuses; a missing status counts as "other".
pub fn summarize_complaints<'a, I>(statuses: I) -> ComplaintSummary
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut summary = ComplaintSummary::default();
    for status in statuses {
        match status.map_or(ComplaintState::Other, classify_complaint) {
            ComplaintState::Open => summary.open += 1,
            ComplaintState::Resolved => summary.resolved += 1,
            ComplaintState::Other => summary.other += 1,
        }
    }
    summary
}
