// ABOUTME: Segment boundary detection for mysqldump line streams
// ABOUTME: Recognizes view/schema/data starts and extracts backtick-quoted names

use anyhow::{bail, Context, Result};
use std::fmt;

/// The kind of dump segment a boundary line opens.
///
/// The file-level header block is not a segment kind; it is captured by the
/// drive loop before any boundary has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    View,
    Schema,
    Data,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::View => write!(f, "view"),
            SegmentKind::Schema => write!(f, "schema"),
            SegmentKind::Data => write!(f, "data"),
        }
    }
}

// Ordered rules, first match wins. The prefixes are mutually exclusive in
// well-formed dumps, but the precedence is fixed: view before schema before
// data.
const BOUNDARY_RULES: &[(&[u8], SegmentKind)] = &[
    (b"/*!50001 DROP VIEW", SegmentKind::View),
    (b"DROP TABLE", SegmentKind::Schema),
    (b"LOCK TABLES", SegmentKind::Data),
];

/// Returns the segment kind a line opens, or `None` when the line continues
/// the current segment.
pub fn boundary_kind(line: &[u8]) -> Option<SegmentKind> {
    BOUNDARY_RULES
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|&(_, kind)| kind)
}

/// Extracts the table or view name from a boundary line: the text strictly
/// between the first and last backtick.
///
/// A boundary line with fewer than two backticks, an empty name, or a name
/// that cannot be used as a file name is rejected rather than silently
/// producing a bad entity.
pub fn entity_name(line: &[u8]) -> Result<String> {
    let first = line.iter().position(|&b| b == b'`');
    let last = line.iter().rposition(|&b| b == b'`');
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) if last > first + 1 => (first, last),
        _ => bail!(
            "malformed boundary line, no backtick-quoted name: {}",
            String::from_utf8_lossy(line)
        ),
    };

    let name = std::str::from_utf8(&line[first + 1..last])
        .context("table name is not valid UTF-8")?;
    if name.contains(['/', '\\', '\0']) || name == "." || name == ".." {
        bail!("table name {:?} is not usable as a file name", name);
    }

    Ok(name.to_string())
}
