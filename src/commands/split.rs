// ABOUTME: The split command: stream a dump into filtered outputs
// ABOUTME: Opens plain or gzipped input and drives the segment scanner

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::filters::SegmentFilter;
use crate::output::{OutputRouter, OutputTarget};
use crate::scanner::source::LineSource;
use crate::scanner::DumpScanner;

/// Splits the dump at `dump_path` according to `filter`, writing kept
/// segments to `target`. Single pass; any fault is fatal.
pub fn split(
    dump_path: &Path,
    filter: SegmentFilter,
    target: OutputTarget,
    compress: bool,
) -> Result<()> {
    tracing::debug!("Scanning dump at {}", dump_path.display());

    let stream = open_dump(dump_path)?;
    let source = LineSource::new(stream);
    let router = OutputRouter::new(target, compress);
    DumpScanner::new(source, filter, router).run()
}

/// Opens the dump, transparently unwrapping gzip when the path carries the
/// `.gz` suffix. Multi-member gzip streams (as produced by appending) are
/// read through to the end.
fn open_dump(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dump at {}", path.display()))?;
    let reader = BufReader::new(file);

    if path.to_string_lossy().ends_with(".gz") {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}
