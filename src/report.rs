//! Report rendering: the DSL listing and the JSON summary.
//!
//! Both are pure functions of the accumulated run state.

use crate::types::{Finding, ScanStatistics};

/// First line of every DSL listing.
pub const DSL_HEADER: &str = "# LFTP and API Insights DSL";

/// Render findings as DSL text, one line per finding, in order.
///
/// Values are written verbatim; a newline inside a filename or URL would
/// split its line.
pub fn render_dsl(findings: &[Finding]) -> String {
    let mut lines = Vec::with_capacity(findings.len() + 1);
    lines.push(DSL_HEADER.to_string());
    lines.extend(findings.iter().map(Finding::to_string));
    lines.join("\n")
}

/// Render statistics as pretty-printed JSON.
pub fn render_summary(stats: &ScanStatistics) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}
