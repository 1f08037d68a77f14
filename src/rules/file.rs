//! Loading and parallel parsing of hashcat rule files.

use std::path::Path;

use rayon::iter::{ParallelBridge, ParallelIterator};
use tracing::warn;

use crate::error::Result;

use super::parse::parse_rule_line;
use super::RuleLine;

/// Load a rule file, parsing every non-blank line in parallel and
/// restoring file order via a stable sort on line number afterward.
///
/// A line that fails to parse is a recoverable condition: it is logged
/// and skipped, the rest of the file still loads. Blank lines are
/// skipped without being counted as a parse failure, but the raw file
/// line number is preserved for every surviving line so diagnostics
/// always point at the original file.
pub fn load_rule_file(path: &Path) -> Result<Vec<RuleLine>> {
    let content = std::fs::read_to_string(path)?;

    let mut parsed: Vec<(u64, RuleLine)> = content
        .lines()
        .enumerate()
        .par_bridge()
        .filter_map(|(idx, line)| {
            let line_no = idx as u64 + 1;
            if line.trim().is_empty() {
                return None;
            }
            match parse_rule_line(line) {
                Ok(rule) => Some((line_no, rule)),
                Err(e) => {
                    warn!(line = line_no, %e, "skipping unparsable rule line");
                    None
                }
            }
        })
        .collect();

    parsed.sort_by_key(|(line_no, _)| *line_no);
    Ok(parsed.into_iter().map(|(_, rule)| rule).collect())
}
