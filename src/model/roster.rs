use serde::{Deserialize, Serialize};

use super::troop::TroopId;

/// Units of one troop type in a roster, healthy and injured counted apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub count: u32,
    #[serde(default)]
    pub injured: u32,
}

impl RosterEntry {
    pub fn new(count: u32, injured: u32) -> Self {
        Self { count, injured }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 && self.injured == 0
    }

    /// Sum of both entries, or `None` if either counter would overflow.
    pub fn checked_merge(&self, other: RosterEntry) -> Option<RosterEntry> {
        Some(RosterEntry {
            count: self.count.checked_add(other.count)?,
            injured: self.injured.checked_add(other.injured)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterElement {
    pub troop: TroopId,
    #[serde(flatten)]
    pub entry: RosterEntry,
}

/// Troop composition of a container, keyed by troop id in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    elements: Vec<RosterElement>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterElement> {
        self.elements.iter()
    }

    pub fn get(&self, troop: &str) -> Option<RosterEntry> {
        self.elements
            .iter()
            .find(|e| e.troop.as_str() == troop)
            .map(|e| e.entry)
    }

    pub fn count_of(&self, troop: &str) -> u32 {
        self.get(troop).map(|e| e.count).unwrap_or(0)
    }

    /// Add units to an id, merging with an existing element for that id.
    /// A merge past `u32::MAX` saturates and is logged; callers that must
    /// conserve totals use [`try_add`](Self::try_add).
    pub fn add(&mut self, troop: impl Into<TroopId>, entry: RosterEntry) {
        let troop = troop.into();
        if let Err(entry) = self.try_add(troop.clone(), entry) {
            tracing::warn!(
                %troop,
                count = entry.count,
                injured = entry.injured,
                "roster merge saturated"
            );
            if let Some(existing) = self.elements.iter_mut().find(|e| e.troop == troop) {
                existing.entry.count = existing.entry.count.saturating_add(entry.count);
                existing.entry.injured = existing.entry.injured.saturating_add(entry.injured);
            }
        }
    }

    /// Add units to an id unless merging would overflow a counter. On
    /// overflow the roster is untouched and the entry is handed back.
    pub fn try_add(
        &mut self,
        troop: impl Into<TroopId>,
        entry: RosterEntry,
    ) -> Result<(), RosterEntry> {
        let troop = troop.into();
        match self.elements.iter_mut().find(|e| e.troop == troop) {
            Some(existing) => {
                existing.entry = existing.entry.checked_merge(entry).ok_or(entry)?;
            }
            None => self.elements.push(RosterElement { troop, entry }),
        }
        Ok(())
    }

    /// Builder form of `add`, handy in fixtures.
    pub fn with(mut self, troop: &str, count: u32, injured: u32) -> Self {
        self.add(troop, RosterEntry::new(count, injured));
        self
    }

    /// Drop elements that carry no units.
    pub fn prune_empty(&mut self) {
        self.elements.retain(|e| !e.entry.is_empty());
    }

    pub fn total_count(&self) -> u64 {
        self.elements.iter().map(|e| u64::from(e.entry.count)).sum()
    }

    pub fn total_injured(&self) -> u64 {
        self.elements.iter().map(|e| u64::from(e.entry.injured)).sum()
    }

    /// Share of healthy units whose troop satisfies `pred`. Empty rosters give 0.
    pub fn share_of(&self, pred: impl Fn(&TroopId) -> bool) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        let matching: u64 = self
            .elements
            .iter()
            .filter(|e| pred(&e.troop))
            .map(|e| u64::from(e.entry.count))
            .sum();
        matching as f64 / total as f64
    }
}

impl FromIterator<(TroopId, RosterEntry)> for Roster {
    fn from_iter<I: IntoIterator<Item = (TroopId, RosterEntry)>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for (troop, entry) in iter {
            roster.add(troop, entry);
        }
        roster
    }
}
