use tracing::{debug, info};

use crate::model::{FactionId, TroopTree};
use crate::policy::RootResolutionPolicy;

use super::holder::RosterHolder;
use super::summary::SyncSummary;
use super::swap::swap_roster;

/// Applies a committed tree to every holder owned by the committing faction.
///
/// Holders are independent: one holder's outcome never affects another, and
/// a holder left unvisited simply keeps its old composition.
#[derive(Clone, Copy)]
pub struct RosterSynchronizer<'p> {
    policy: &'p dyn RootResolutionPolicy,
}

impl<'p> RosterSynchronizer<'p> {
    pub fn new(policy: &'p dyn RootResolutionPolicy) -> Self {
        Self { policy }
    }

    /// Rewrite every holder owned by `faction` to use `tree`, mapping old ids
    /// through `previous` (the tree this commit replaces).
    pub fn synchronize<H, I>(
        &self,
        faction: FactionId,
        previous: Option<&TroopTree>,
        tree: &TroopTree,
        holders: I,
    ) -> SyncSummary
    where
        H: RosterHolder,
        I: IntoIterator<Item = H>,
    {
        let mut summary = SyncSummary::default();
        for mut holder in holders {
            summary.absorb(self.sync_holder(faction, previous, tree, &mut holder));
        }
        info!(
            %faction,
            policy = self.policy.name(),
            scanned = summary.holders_scanned,
            changed = summary.holders_changed,
            unresolved = summary.unresolved,
            units_moved = summary.units_moved,
            "roster synchronization pass"
        );
        summary
    }

    /// Process one holder; a foreign or ownerless holder is counted and skipped.
    pub fn sync_holder<H: RosterHolder + ?Sized>(
        &self,
        faction: FactionId,
        previous: Option<&TroopTree>,
        tree: &TroopTree,
        holder: &mut H,
    ) -> SyncSummary {
        let mut summary = SyncSummary {
            holders_scanned: 1,
            ..SyncSummary::default()
        };
        if holder.owner() != Some(faction) {
            return summary;
        }
        summary.holders_matched = 1;

        let outcome = swap_roster(holder.composition(), previous, tree, self.policy);
        summary.absorb(outcome.summary);
        if outcome.changed {
            debug!(
                kind = %holder.kind(),
                %faction,
                entries = outcome.roster.len(),
                "holder composition rewritten"
            );
            holder.set_composition(outcome.roster);
            summary.holders_changed = 1;
        }
        summary
    }
}
