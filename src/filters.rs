// ABOUTME: Include/exclude policy for dump segments
// ABOUTME: Pure keep/drop decisions computed at segment boundaries

use crate::scanner::classify::SegmentKind;
use clap::ValueEnum;

/// Which segment kinds a run keeps. `mode` only discriminates schema
/// against data; view segments always pass it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    Data,
    Schema,
    #[default]
    Both,
}

/// Immutable per-run filtering policy.
#[derive(Debug, Clone, Default)]
pub struct SegmentFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    exclude_data: Vec<String>,
    mode: Mode,
}

impl SegmentFilter {
    pub fn new(
        include: Vec<String>,
        exclude: Vec<String>,
        exclude_data: Vec<String>,
        mode: Mode,
    ) -> Self {
        Self {
            include,
            exclude,
            exclude_data,
            mode,
        }
    }

    /// Keep everything.
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// Decides whether a segment is dropped. Evaluated once per boundary
    /// line; the decision is held for every line of the segment.
    pub fn ignore(&self, kind: SegmentKind, entity: &str) -> bool {
        (!self.include.is_empty() && !self.include.iter().any(|t| t == entity))
            || self.exclude.iter().any(|t| t == entity)
            || (kind == SegmentKind::Data && self.mode == Mode::Schema)
            || (kind == SegmentKind::Schema && self.mode == Mode::Data)
            || (kind == SegmentKind::Data && self.exclude_data.iter().any(|t| t == entity))
    }
}
