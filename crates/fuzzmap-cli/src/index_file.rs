//! Tab-separated index file loading
//!
//! One record per line: `value<TAB>label`. A line without a tab is used as
//! both value and label. Blank lines and `#` comments are skipped.

use std::io::{self, BufRead};

use fuzzmap_core::StringMap;
use tracing::debug;

/// Split a record line into `(value, label)`, or `None` for lines to skip
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return None;
    }

    match line.split_once('\t') {
        Some((value, label)) => Some((value.trim(), label)),
        None => Some((line.trim(), line)),
    }
}

/// Load every record from `reader` into `map`; returns the record count.
pub fn load<R: BufRead>(reader: R, map: &mut StringMap<String>) -> io::Result<usize> {
    let mut records = 0usize;
    for line in reader.lines() {
        let line = line?;
        if let Some((value, label)) = parse_line(&line) {
            map.insert(label, value.to_string());
            records += 1;
        }
    }

    debug!(records, values = map.len(), "index file loaded");
    Ok(records)
}
