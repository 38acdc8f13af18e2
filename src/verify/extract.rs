//! Per-demo marker extraction.
//!
//! The kernel announces each completed demo on the serial console with a
//! line shaped like:
//!
//! ```text
//! [DEMO 2] Host Function Calls (env.print) ... COMPLETE
//! ```
//!
//! Matching runs against the joined projection so a marker split across
//! line-buffering boundaries still counts; label derivation runs against
//! the line-oriented projection so it sees the line as the kernel wrote it.

use regex::Regex;

use crate::verify::normalize::NormalizedOutput;
use crate::verify::types::DemoRecord;

/// Label used when a demo's marker line has no text left after trimming
pub const PLACEHOLDER_LABEL: &str = "Detected";

/// Extract a record for every demo id in `1..=demo_count`.
///
/// Total: ids without a completion marker produce `Fail` records, never an
/// error. A marker bearing a different id never satisfies another id's
/// check.
pub fn extract_demos(output: &NormalizedOutput, demo_count: u32) -> Vec<DemoRecord> {
    (1..=demo_count)
        .map(|id| extract_demo(output, id))
        .collect()
}

/// Extract the record for a single demo id.
pub fn extract_demo(output: &NormalizedOutput, id: u32) -> DemoRecord {
    if !completion_marker(id).is_match(&output.joined) {
        return DemoRecord::failed(id);
    }

    let label = derive_label(&output.lines, id).unwrap_or_else(|| PLACEHOLDER_LABEL.to_string());
    DemoRecord::passed(id, label)
}

/// Completion marker pattern for one demo id: `[DEMO <id>] ... COMPLETE`
/// with any whitespace between tokens.
fn completion_marker(id: u32) -> Regex {
    // The pattern is built from a u32 and fixed text; it always compiles.
    Regex::new(&format!(
        r"\[DEMO {}\](?P<body>(?:\s+\S+)*?)\s+COMPLETE\b",
        id
    ))
    .expect("completion marker pattern is valid")
}

/// Derive the human-readable label from the first line carrying the demo's
/// prefix: strip the prefix, drop any trailing parenthetical, and trim.
/// Returns `None` when nothing readable remains.
fn derive_label(lines: &str, id: u32) -> Option<String> {
    let prefix = format!("[DEMO {}]", id);
    let line = lines.lines().find(|l| l.contains(&prefix))?;

    let after = &line[line.find(&prefix)? + prefix.len()..];
    let without_paren = match after.find('(') {
        Some(pos) => &after[..pos],
        None => after,
    };
    let label = without_paren.trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}
