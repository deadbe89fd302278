use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters for one synchronization pass, or part of one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub holders_scanned: usize,
    pub holders_matched: usize,
    pub holders_changed: usize,
    pub exact: usize,
    pub clamped: usize,
    pub root_fallback: usize,
    pub unresolved: usize,
    /// Healthy plus injured units that moved to a different troop id.
    pub units_moved: u64,
}

impl SyncSummary {
    pub fn absorb(&mut self, other: SyncSummary) {
        self.holders_scanned += other.holders_scanned;
        self.holders_matched += other.holders_matched;
        self.holders_changed += other.holders_changed;
        self.exact += other.exact;
        self.clamped += other.clamped;
        self.root_fallback += other.root_fallback;
        self.unresolved += other.unresolved;
        self.units_moved += other.units_moved;
    }

    pub fn merged(mut self, other: SyncSummary) -> Self {
        self.absorb(other);
        self
    }

    pub fn entries_remapped(&self) -> usize {
        self.exact + self.clamped + self.root_fallback
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} holders ({} matched, {} changed), {} entries remapped ({} exact, {} clamped, {} root), {} unresolved, {} units moved",
            self.holders_scanned,
            self.holders_matched,
            self.holders_changed,
            self.entries_remapped(),
            self.exact,
            self.clamped,
            self.root_fallback,
            self.unresolved,
            self.units_moved,
        )
    }
}
