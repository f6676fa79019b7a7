// ABOUTME: Buffered raw-line reader over plain or gzip-decoded dump streams
// ABOUTME: Tracks line numbers, skips blanks and comments, supports one-line pushback

use anyhow::{bail, Context, Result};
use std::io::{BufRead, BufReader, Read};

/// Ceiling on a single line. One INSERT statement in a dump can span
/// hundreds of megabytes, so the default buffered-reader behavior of growing
/// without bound is replaced by an explicit limit that fails loudly instead
/// of truncating.
pub const MAX_LINE_BYTES: u64 = 1024 * 1024 * 1024;

/// Lazy, finite, non-restartable sequence of raw dump lines.
///
/// Lines are yielded as raw bytes so arbitrary byte content inside INSERT
/// statements survives the trip untouched. Line terminators (`\n` or
/// `\r\n`) are stripped; the router re-terminates on write.
pub struct LineSource {
    reader: BufReader<Box<dyn Read>>,
    max_line_bytes: u64,
    count: u64,
    pushed_back: Option<Vec<u8>>,
}

impl LineSource {
    pub fn new(stream: Box<dyn Read>) -> Self {
        Self::with_max_line_bytes(stream, MAX_LINE_BYTES)
    }

    pub fn with_max_line_bytes(stream: Box<dyn Read>, max_line_bytes: u64) -> Self {
        Self {
            reader: BufReader::new(stream),
            max_line_bytes,
            count: 0,
            pushed_back: None,
        }
    }

    /// 1-based number of the most recently read line, for diagnostics.
    pub fn line_number(&self) -> u64 {
        self.count
    }

    /// Returns a line to the source so the next read yields it again.
    ///
    /// Holds at most one line; used for the header-to-body transition where
    /// the first non-header line must be re-evaluated as a body line.
    pub fn push_back(&mut self, line: Vec<u8>) {
        debug_assert!(self.pushed_back.is_none(), "pushback slot already occupied");
        self.pushed_back = Some(line);
    }

    /// Next non-blank, non-comment (`--`) line, honoring pushback.
    ///
    /// Skipped lines still advance the line counter. Returns `None` at end
    /// of input.
    pub fn next_content_line(&mut self) -> Result<Option<Vec<u8>>> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(Some(line));
        }
        while let Some(line) = self.read_line()? {
            if line.is_empty() || line.starts_with(b"--") {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        // Reading one byte past the ceiling distinguishes "exactly at the
        // limit" from "over it" without buffering more than the limit.
        let n = (&mut self.reader)
            .take(self.max_line_bytes + 1)
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("read failed at line {}", self.count + 1))?;
        if n == 0 {
            return Ok(None);
        }
        self.count += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        } else if buf.len() as u64 > self.max_line_bytes {
            bail!(
                "line {} exceeds the maximum line size of {} bytes",
                self.count,
                self.max_line_bytes
            );
        }

        Ok(Some(buf))
    }
}
