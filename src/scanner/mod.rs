// ABOUTME: Single-pass drive loop for dump segmentation
// ABOUTME: Captures the header block, classifies segments, filters, and routes lines

pub mod classify;
pub mod source;

use anyhow::{Context, Result};

use crate::filters::SegmentFilter;
use crate::output::OutputRouter;
use classify::{boundary_kind, entity_name};
use source::LineSource;

/// All scan state for one run, threaded through each step.
///
/// The run is strictly sequential: one line is fully classified, filtered,
/// and routed before the next is read. The keep/drop decision taken at a
/// boundary line is held until the next boundary.
pub struct DumpScanner {
    source: LineSource,
    filter: SegmentFilter,
    router: OutputRouter,
    ignore: bool,
    kept: u64,
    ignored: u64,
}

impl DumpScanner {
    pub fn new(source: LineSource, filter: SegmentFilter, router: OutputRouter) -> Self {
        Self {
            source,
            filter,
            router,
            // Lines before the first boundary belong to no entity and are
            // dropped.
            ignore: true,
            kept: 0,
            ignored: 0,
        }
    }

    /// Runs the scan to completion. Output handles are released before
    /// returning, on the error path too.
    pub fn run(mut self) -> Result<()> {
        let scanned = self.scan();
        let closed = self.router.finish();
        scanned.and(closed)?;

        tracing::info!(
            "Processed {} segment(s) ({} ignored by policy)",
            self.kept + self.ignored,
            self.ignored
        );
        Ok(())
    }

    fn scan(&mut self) -> Result<()> {
        self.capture_header()?;

        while let Some(line) = self.source.next_content_line()? {
            if let Some(kind) = boundary_kind(&line) {
                self.start_segment(kind, &line)?;
            }
            if !self.ignore {
                self.router.write_line(&line)?;
            }
        }
        Ok(())
    }

    /// Accumulates the leading run of `/*!` directive lines. The first line
    /// that does not match ends header capture permanently and is pushed
    /// back for re-evaluation as a body line.
    fn capture_header(&mut self) -> Result<()> {
        let mut header = Vec::new();
        while let Some(line) = self.source.next_content_line()? {
            if !line.starts_with(b"/*!") {
                self.source.push_back(line);
                break;
            }
            header.extend_from_slice(&line);
            header.push(b'\n');
        }
        self.router.set_header(header);
        Ok(())
    }

    fn start_segment(&mut self, kind: classify::SegmentKind, line: &[u8]) -> Result<()> {
        let entity = entity_name(line)
            .with_context(|| format!("at line {}", self.source.line_number()))?;

        self.ignore = self.filter.ignore(kind, &entity);
        if self.ignore {
            self.ignored += 1;
            tracing::debug!("Ignoring {} for '{}'", kind, entity);
        } else {
            self.kept += 1;
            tracing::debug!("Start {} for '{}'", kind, entity);
            self.router.open(&entity)?;
        }
        Ok(())
    }
}
