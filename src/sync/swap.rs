//! Per-holder remapping of troop ids from a previous tree to a new one.

use tracing::warn;

use crate::model::{Branch, Roster, TroopId, TroopNode, TroopTree};
use crate::policy::RootResolutionPolicy;

use super::summary::SyncSummary;

/// How one old troop id maps into the new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remap {
    /// Already defined by the new tree; left as is.
    Current,
    /// Same (tier, branch) exists in the new tree.
    Exact(TroopId),
    /// New branch is shallower; moved to its deepest node at or below the tier.
    Clamped(TroopId),
    /// Nothing at or below the tier on the branch; moved to a resolved root.
    Root(TroopId),
    /// Unknown to the previous tree, or the new tree is empty; left as is.
    Unresolved,
}

impl Remap {
    pub fn target(&self) -> Option<&TroopId> {
        match self {
            Remap::Exact(id) | Remap::Clamped(id) | Remap::Root(id) => Some(id),
            Remap::Current | Remap::Unresolved => None,
        }
    }
}

/// Decide where units of `troop` belong in `tree`.
pub fn remap_troop(
    troop: &TroopId,
    previous: Option<&TroopTree>,
    tree: &TroopTree,
    policy: &dyn RootResolutionPolicy,
) -> Remap {
    if tree.contains(troop.as_str()) {
        return Remap::Current;
    }
    let Some(old) = previous.and_then(|p| p.node(troop.as_str())) else {
        return Remap::Unresolved;
    };

    if let Some(node) = tree.node_matching(old.tier, old.branch) {
        return Remap::Exact(node.id.clone());
    }
    if let Some(node) = tree.deepest_at_or_below(old.tier, old.branch) {
        return Remap::Clamped(node.id.clone());
    }
    match resolved_root(tree, old.branch, policy) {
        Some(node) => Remap::Root(node.id.clone()),
        None => Remap::Unresolved,
    }
}

/// The branch's resolved root, falling back to the other branch's.
fn resolved_root<'t>(
    tree: &'t TroopTree,
    branch: Branch,
    policy: &dyn RootResolutionPolicy,
) -> Option<&'t TroopNode> {
    policy
        .root_for(tree, branch)
        .or_else(|| policy.root_for(tree, branch.other()))
}

/// Result of swapping one roster.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub roster: Roster,
    pub changed: bool,
    pub summary: SyncSummary,
}

/// Compute the composition `roster` should have under `tree`.
///
/// Totals of healthy and injured units are preserved: every entry either
/// stays where it is or moves wholesale onto one target id, merging with
/// whatever is already there. Entries that stay are placed first, so a move
/// whose merge would overflow the target's counters is left in place and
/// counted unresolved instead. Empty entries are dropped.
pub fn swap_roster(
    roster: &Roster,
    previous: Option<&TroopTree>,
    tree: &TroopTree,
    policy: &dyn RootResolutionPolicy,
) -> SwapOutcome {
    let mut summary = SyncSummary::default();
    let mut out = Roster::new();
    let mut moves = Vec::new();

    for element in roster.iter() {
        if element.entry.is_empty() {
            continue;
        }
        match remap_troop(&element.troop, previous, tree, policy) {
            Remap::Current => out.add(element.troop.clone(), element.entry),
            Remap::Unresolved => {
                summary.unresolved += 1;
                warn!(troop = %element.troop, "unresolved legacy troop left in place");
                out.add(element.troop.clone(), element.entry);
            }
            remap => moves.push((element, remap)),
        }
    }

    for (element, remap) in moves {
        let Some(target) = remap.target() else {
            continue;
        };
        if let Err(entry) = out.try_add(target.clone(), element.entry) {
            summary.unresolved += 1;
            warn!(
                troop = %element.troop,
                %target,
                count = entry.count,
                injured = entry.injured,
                "merge would overflow target; troop left in place"
            );
            out.add(element.troop.clone(), entry);
            continue;
        }
        match remap {
            Remap::Exact(_) => summary.exact += 1,
            Remap::Clamped(_) => summary.clamped += 1,
            Remap::Root(_) => summary.root_fallback += 1,
            Remap::Current | Remap::Unresolved => {}
        }
        summary.units_moved += u64::from(element.entry.count) + u64::from(element.entry.injured);
    }

    let changed = out != *roster;
    SwapOutcome {
        roster: out,
        changed,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::model::RosterEntry;
    use crate::policy::{DefaultRootPolicy, TierOverridePolicy};

    fn old_tree() -> TroopTree {
        let mut t = TroopTree::default();
        t.insert_root("recruit", "Recruit", 1, Branch::Basic).unwrap();
        t.insert_child("recruit", "warrior", "Warrior", Branch::Basic).unwrap();
        t.insert_child("warrior", "guard", "Guard", Branch::Basic).unwrap();
        t.insert_child("warrior", "raider", "Raider", Branch::Elite).unwrap();
        t.insert_child("guard", "veteran", "Veteran", Branch::Basic).unwrap();
        t
    }

    fn new_tree() -> TroopTree {
        let mut t = TroopTree::default();
        t.insert_root("levy", "Levy", 1, Branch::Basic).unwrap();
        t.insert_child("levy", "footman", "Footman", Branch::Basic).unwrap();
        t.insert_child("footman", "spearman", "Spearman", Branch::Basic).unwrap();
        t
    }

    #[test]
    fn exact_match_by_tier_and_branch() {
        let roster = Roster::new().with("warrior", 5, 0).with("guard", 3, 1);
        let out = swap_roster(&roster, Some(&old_tree()), &new_tree(), &DefaultRootPolicy);
        assert!(out.changed);
        assert_eq!(out.roster.get("footman"), Some(RosterEntry::new(5, 0)));
        assert_eq!(out.roster.get("spearman"), Some(RosterEntry::new(3, 1)));
        assert_eq!(out.summary.exact, 2);
    }

    #[test]
    fn deeper_troops_clamp_to_deepest_available() {
        let roster = Roster::new().with("veteran", 4, 2).with("guard", 1, 0);
        let out = swap_roster(&roster, Some(&old_tree()), &new_tree(), &DefaultRootPolicy);
        assert_eq!(out.roster.len(), 1);
        assert_eq!(out.roster.get("spearman"), Some(RosterEntry::new(5, 2)));
        assert_eq!(out.summary.clamped, 1);
    }

    #[test]
    fn missing_branch_falls_back_to_resolved_root() {
        let roster = Roster::new().with("raider", 2, 1);
        let out = swap_roster(&roster, Some(&old_tree()), &new_tree(), &DefaultRootPolicy);
        assert_eq!(out.roster.get("levy"), Some(RosterEntry::new(2, 1)));
        assert_eq!(out.summary.root_fallback, 1);
    }

    #[test]
    fn root_fallback_goes_through_policy() {
        let mut tree = new_tree();
        tree.insert_child("levy", "squire", "Squire", Branch::Elite).unwrap();
        tree.insert_child("squire", "knight", "Knight", Branch::Elite).unwrap();
        let mut previous = TroopTree::default();
        previous.insert_root("page", "Page", 1, Branch::Elite).unwrap();
        let roster = Roster::new().with("page", 3, 0);

        let plain = swap_roster(&roster, Some(&previous), &tree, &DefaultRootPolicy);
        assert_eq!(plain.roster.get("squire"), Some(RosterEntry::new(3, 0)));

        let remapped = TierOverridePolicy {
            basic_target: 1,
            elite_target: 3,
        };
        let out = swap_roster(&roster, Some(&previous), &tree, &remapped);
        assert_eq!(out.roster.get("knight"), Some(RosterEntry::new(3, 0)));
        assert_eq!(out.summary.root_fallback, 1);
    }

    #[test]
    fn unknown_ids_are_left_untouched() {
        let roster = Roster::new().with("mercenary", 7, 1).with("warrior", 1, 0);
        let out = swap_roster(&roster, Some(&old_tree()), &new_tree(), &DefaultRootPolicy);
        assert_eq!(out.roster.get("mercenary"), Some(RosterEntry::new(7, 1)));
        assert_eq!(out.summary.unresolved, 1);

        let first_commit = swap_roster(&roster, None, &new_tree(), &DefaultRootPolicy);
        assert_eq!(first_commit.summary.unresolved, 2);
        assert!(!first_commit.changed);
    }

    #[test]
    fn empty_new_tree_leaves_roster_alone() {
        let roster = Roster::new().with("warrior", 5, 0);
        let out = swap_roster(&roster, Some(&old_tree()), &TroopTree::default(), &DefaultRootPolicy);
        assert!(!out.changed);
        assert_eq!(out.roster, roster);
    }

    #[test]
    fn empty_entries_are_pruned() {
        let roster = Roster::new().with("levy", 0, 0).with("footman", 2, 0);
        let out = swap_roster(&roster, Some(&old_tree()), &new_tree(), &DefaultRootPolicy);
        assert!(out.changed);
        assert_eq!(out.roster.len(), 1);
    }

    #[test]
    fn overflowing_merge_leaves_troop_in_place() {
        let mut previous = TroopTree::default();
        previous.insert_root("a", "A", 1, Branch::Basic).unwrap();
        previous.insert_root("b", "B", 1, Branch::Basic).unwrap();
        let mut tree = TroopTree::default();
        tree.insert_root("c", "C", 1, Branch::Basic).unwrap();

        let roster = Roster::new().with("a", 3_000_000_000, 0).with("b", 3_000_000_000, 1);
        let out = swap_roster(&roster, Some(&previous), &tree, &DefaultRootPolicy);

        assert_eq!(out.roster.total_count(), 6_000_000_000);
        assert_eq!(out.roster.total_injured(), 1);
        assert_eq!(out.roster.get("c"), Some(RosterEntry::new(3_000_000_000, 0)));
        assert_eq!(out.roster.get("b"), Some(RosterEntry::new(3_000_000_000, 1)));
        assert_eq!(out.summary.exact, 1);
        assert_eq!(out.summary.unresolved, 1);
        assert_eq!(out.summary.units_moved, 3_000_000_000);
    }

    #[test]
    fn current_entries_are_placed_before_moves() {
        let mut previous = TroopTree::default();
        previous.insert_root("a", "A", 1, Branch::Basic).unwrap();
        let mut tree = TroopTree::default();
        tree.insert_root("c", "C", 1, Branch::Basic).unwrap();

        // The move from `a` would overflow `c` whichever order they appear in.
        let roster = Roster::new().with("a", 3_000_000_000, 0).with("c", 3_000_000_000, 0);
        let out = swap_roster(&roster, Some(&previous), &tree, &DefaultRootPolicy);
        assert_eq!(out.roster.total_count(), 6_000_000_000);
        assert_eq!(out.roster.get("a"), Some(RosterEntry::new(3_000_000_000, 0)));
        assert_eq!(out.roster.get("c"), Some(RosterEntry::new(3_000_000_000, 0)));
        assert_eq!(out.summary.unresolved, 1);
    }

    #[test]
    fn random_rosters_conserve_totals_and_settle() {
        let old = old_tree();
        let new = new_tree();
        let ids = ["recruit", "warrior", "guard", "raider", "veteran", "levy", "mercenary"];
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..200 {
            let mut roster = Roster::new();
            for _ in 0..rng.random_range(0..8) {
                let id = ids[rng.random_range(0..ids.len())];
                roster.add(id, RosterEntry::new(rng.random_range(0..50), rng.random_range(0..10)));
            }

            let once = swap_roster(&roster, Some(&old), &new, &DefaultRootPolicy);
            assert_eq!(once.roster.total_count(), roster.total_count());
            assert_eq!(once.roster.total_injured(), roster.total_injured());

            let twice = swap_roster(&once.roster, Some(&new), &new, &DefaultRootPolicy);
            assert!(!twice.changed);
            assert_eq!(twice.roster, once.roster);
        }
    }
}
