use std::collections::{BTreeSet, VecDeque};

use bevy_ecs::resource::Resource;

use crate::model::{FactionId, TierLimits};
use crate::policy::{DefaultRootPolicy, RootResolutionPolicy};
use crate::sync::SyncSummary;

/// Root resolution policy chosen at startup.
#[derive(Resource)]
pub struct ActiveRootPolicy(pub Box<dyn RootResolutionPolicy>);

impl Default for ActiveRootPolicy {
    fn default() -> Self {
        Self(Box::new(DefaultRootPolicy))
    }
}

/// Tier limits given to trees created during this run.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActiveTierLimits(pub TierLimits);

/// Unlocks the player has earned, by key.
#[derive(Resource, Debug, Clone, Default)]
pub struct UnlockState {
    unlocked: BTreeSet<String>,
}

impl UnlockState {
    pub fn unlock(&mut self, key: impl Into<String>) -> bool {
        self.unlocked.insert(key.into())
    }

    pub fn lock(&mut self, key: &str) -> bool {
        self.unlocked.remove(key)
    }

    pub fn is_unlocked(&self, key: &str) -> bool {
        self.unlocked.contains(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncRecord {
    pub tick: u64,
    pub faction: FactionId,
    pub summary: SyncSummary,
}

/// Most recent synchronization passes, oldest first. Holds at most
/// `capacity` records; recording past that drops the oldest. Hosts that want
/// a full history drain it between ticks.
#[derive(Resource, Debug, Clone)]
pub struct SyncLog {
    records: VecDeque<SyncRecord>,
    capacity: usize,
}

impl Default for SyncLog {
    fn default() -> Self {
        Self::with_capacity(SyncLog::DEFAULT_CAPACITY)
    }
}

impl SyncLog {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// A capacity of zero keeps nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
        }
    }

    pub fn record(&mut self, tick: u64, faction: FactionId, summary: SyncSummary) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(SyncRecord {
            tick,
            faction,
            summary,
        });
    }

    pub fn last(&self) -> Option<&SyncRecord> {
        self.records.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyncRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take every stored record, oldest first.
    pub fn drain(&mut self) -> Vec<SyncRecord> {
        self.records.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClanId;

    const CLAN: FactionId = FactionId::Clan(ClanId(1));

    #[test]
    fn oldest_records_are_dropped_at_capacity() {
        let mut log = SyncLog::with_capacity(2);
        for tick in 0..3 {
            log.record(tick, CLAN, SyncSummary::default());
        }
        assert_eq!(log.len(), 2);
        let ticks: Vec<u64> = log.iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
        assert_eq!(log.last().map(|r| r.tick), Some(2));
    }

    #[test]
    fn drain_empties_the_log() {
        let mut log = SyncLog::default();
        log.record(4, CLAN, SyncSummary::default());
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
        assert_eq!(log.capacity(), SyncLog::DEFAULT_CAPACITY);

        let mut off = SyncLog::with_capacity(0);
        off.record(1, CLAN, SyncSummary::default());
        assert!(off.is_empty());
    }
}

