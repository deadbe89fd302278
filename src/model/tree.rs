use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::troop::{Branch, TierLimits, TroopId, TroopNode};

/// Upgrade targets a single troop may have.
pub const MAX_CHILDREN: usize = 2;

/// A tree edit that would break a structural rule. The edit is not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("troop id '{0}' already exists in the tree")]
    DuplicateId(TroopId),
    #[error("no troop '{0}' in the tree")]
    UnknownNode(TroopId),
    #[error("troop '{0}' has upgrade targets and cannot be removed")]
    NotALeaf(TroopId),
    #[error("troop '{id}' has tier {tier}; tiers start at 1")]
    TierBelowOne { id: TroopId, tier: i16 },
    #[error("troop '{id}' would reach tier {tier}, above the {branch} limit of {max}")]
    TierAboveLimit {
        id: TroopId,
        branch: Branch,
        tier: i16,
        max: u8,
    },
    #[error("troop '{child}' (tier {child_tier}) must sit exactly one tier above '{parent}' (tier {parent_tier})")]
    TierNotIncreasing {
        parent: TroopId,
        child: TroopId,
        parent_tier: u8,
        child_tier: u8,
    },
    #[error("troop '{id}' would have {count} upgrade targets; at most 2 are allowed")]
    TooManyChildren { id: TroopId, count: usize },
    #[error("elite troop '{parent}' cannot upgrade into basic troop '{child}'")]
    EliteParentsBasic { parent: TroopId, child: TroopId },
    #[error("'{second}' opens a second basic/elite divergence in the tree already split at '{first}'")]
    RepeatedDivergence { first: TroopId, second: TroopId },
    #[error("moving or linking '{0}' would create a cycle")]
    Cycle(TroopId),
    #[error("parent/child links between '{parent}' and '{child}' disagree")]
    BrokenLink { parent: TroopId, child: TroopId },
    #[error("root list and parent links disagree about '{0}'")]
    RootMismatch(TroopId),
    #[error("default {branch} root '{id}' is not on the {branch} branch")]
    DefaultRootBranch { branch: Branch, id: TroopId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRoots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<TroopId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elite: Option<TroopId>,
}

impl DefaultRoots {
    fn get(&self, branch: Branch) -> Option<&TroopId> {
        match branch {
            Branch::Basic => self.basic.as_ref(),
            Branch::Elite => self.elite.as_ref(),
        }
    }

    fn slot(&mut self, branch: Branch) -> &mut Option<TroopId> {
        match branch {
            Branch::Basic => &mut self.basic,
            Branch::Elite => &mut self.elite,
        }
    }
}

/// Serialized shape of a tree. Converting back into a `TroopTree` re-runs
/// validation, so a hand-edited file cannot smuggle in a broken tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParts {
    pub limits: TierLimits,
    pub roots: Vec<TroopId>,
    #[serde(default)]
    pub default_roots: DefaultRoots,
    pub nodes: Vec<TroopNode>,
}

/// The forest of troop definitions owned by one faction.
///
/// Every mutation runs against a scratch copy and is swapped in only after
/// `validate` passes, so a rejected edit leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TreeParts", try_from = "TreeParts")]
pub struct TroopTree {
    nodes: BTreeMap<TroopId, TroopNode>,
    roots: Vec<TroopId>,
    default_roots: DefaultRoots,
    limits: TierLimits,
}

impl Default for TroopTree {
    fn default() -> Self {
        Self::new(TierLimits::default())
    }
}

impl TroopTree {
    pub fn new(limits: TierLimits) -> Self {
        Self {
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            default_roots: DefaultRoots::default(),
            limits,
        }
    }

    /// Rebuild a tree from its serialized parts, validating every rule.
    pub fn from_parts(parts: TreeParts) -> Result<Self, TreeError> {
        let mut nodes = BTreeMap::new();
        for node in parts.nodes {
            let id = node.id.clone();
            if nodes.insert(id.clone(), node).is_some() {
                return Err(TreeError::DuplicateId(id));
            }
        }
        let tree = Self {
            nodes,
            roots: parts.roots,
            default_roots: parts.default_roots,
            limits: parts.limits,
        };
        tree.validate()?;
        Ok(tree)
    }

    pub fn to_parts(&self) -> TreeParts {
        TreeParts {
            limits: self.limits,
            roots: self.roots.clone(),
            default_roots: self.default_roots.clone(),
            nodes: self.breadth_first().into_iter().cloned().collect(),
        }
    }

    // -- Queries --

    pub fn limits(&self) -> TierLimits {
        self.limits
    }

    /// Highest tier any node of this tree may declare.
    pub fn max_tier(&self) -> u8 {
        self.limits.highest()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&TroopNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &TroopNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn children(&self, id: &str) -> impl Iterator<Item = &TroopNode> {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|c| self.nodes.get(c))
    }

    pub fn parent(&self, id: &str) -> Option<&TroopNode> {
        let parent = self.nodes.get(id)?.parent.as_ref()?;
        self.nodes.get(parent)
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self, id: &str) -> Vec<&TroopNode> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        // A valid tree reaches its root in fewer steps than the highest tier.
        while let Some(node) = current {
            if out.len() > usize::from(self.limits.highest()) {
                break;
            }
            out.push(node);
            current = self.parent(node.id.as_str());
        }
        out
    }

    pub fn is_ancestor_of(&self, ancestor: &str, id: &str) -> bool {
        self.ancestors(id).iter().any(|n| n.id.as_str() == ancestor)
    }

    /// All nodes below `id`, depth-first pre-order, excluding `id` itself.
    pub fn descendants(&self, id: &str) -> Vec<&TroopNode> {
        let mut out = self.depth_first(id);
        if !out.is_empty() {
            out.remove(0);
        }
        out
    }

    /// Depth-first pre-order enumeration starting at `id` (inclusive).
    pub fn depth_first(&self, id: &str) -> Vec<&TroopNode> {
        let mut out = Vec::new();
        let Some(start) = self.nodes.get(id) else {
            return out;
        };
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children.iter().rev() {
                if let Some(c) = self.nodes.get(child) {
                    stack.push(c);
                }
            }
        }
        out
    }

    /// Breadth-first over the whole forest: roots in insertion order, then
    /// children left to right. This is the canonical deterministic order used
    /// for every "first match" rule.
    pub fn breadth_first(&self) -> Vec<&TroopNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<&TroopNode> = self.roots().collect();
        while let Some(node) = queue.pop_front() {
            out.push(node);
            queue.extend(node.children.iter().filter_map(|c| self.nodes.get(c)));
        }
        out
    }

    pub fn nodes_on_branch(&self, branch: Branch) -> Vec<&TroopNode> {
        self.breadth_first()
            .into_iter()
            .filter(|n| n.branch == branch)
            .collect()
    }

    /// The node at `tier` on `branch`. When several qualify, the first in
    /// breadth-first order wins.
    pub fn node_matching(&self, tier: u8, branch: Branch) -> Option<&TroopNode> {
        self.breadth_first()
            .into_iter()
            .find(|n| n.tier == tier && n.branch == branch)
    }

    /// The highest-tier node on `branch` whose tier does not exceed `tier`.
    /// Ties go to the first in breadth-first order.
    pub fn deepest_at_or_below(&self, tier: u8, branch: Branch) -> Option<&TroopNode> {
        let mut best: Option<&TroopNode> = None;
        for node in self.nodes_on_branch(branch) {
            if node.tier > tier {
                continue;
            }
            if best.is_none_or(|b| node.tier > b.tier) {
                best = Some(node);
            }
        }
        best
    }

    /// The designated root for `branch`, or the lowest-tier node on that branch
    /// when none was designated.
    pub fn default_root(&self, branch: Branch) -> Option<&TroopNode> {
        if let Some(id) = self.default_roots.get(branch) {
            return self.nodes.get(id);
        }
        let mut best: Option<&TroopNode> = None;
        for node in self.nodes_on_branch(branch) {
            if best.is_none_or(|b| node.tier < b.tier) {
                best = Some(node);
            }
        }
        best
    }

    pub fn designated_root(&self, branch: Branch) -> Option<&TroopId> {
        self.default_roots.get(branch)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TroopId> {
        self.nodes.keys()
    }

    // -- Mutations --

    /// Apply `edit` to a copy, validate, and keep the result only on success.
    fn edit(&mut self, edit: impl FnOnce(&mut TroopTree) -> Result<(), TreeError>) -> Result<(), TreeError> {
        let mut scratch = self.clone();
        edit(&mut scratch)?;
        scratch.validate()?;
        *self = scratch;
        Ok(())
    }

    pub fn insert_root(
        &mut self,
        id: impl Into<TroopId>,
        name: impl Into<String>,
        tier: u8,
        branch: Branch,
    ) -> Result<(), TreeError> {
        let id = id.into();
        let name = name.into();
        self.edit(|t| {
            if t.nodes.contains_key(&id) {
                return Err(TreeError::DuplicateId(id));
            }
            t.nodes.insert(
                id.clone(),
                TroopNode {
                    id: id.clone(),
                    name,
                    tier,
                    branch,
                    parent: None,
                    children: Vec::new(),
                },
            );
            t.roots.push(id);
            Ok(())
        })
    }

    /// Add an upgrade target under `parent`, one tier above it.
    pub fn insert_child(
        &mut self,
        parent: &str,
        id: impl Into<TroopId>,
        name: impl Into<String>,
        branch: Branch,
    ) -> Result<(), TreeError> {
        let id = id.into();
        let name = name.into();
        self.edit(|t| {
            if t.nodes.contains_key(&id) {
                return Err(TreeError::DuplicateId(id));
            }
            let parent_node = t
                .nodes
                .get_mut(parent)
                .ok_or_else(|| TreeError::UnknownNode(TroopId::new(parent)))?;
            let tier = parent_node.tier.checked_add(1).ok_or(TreeError::TierAboveLimit {
                id: id.clone(),
                branch,
                tier: i16::from(u8::MAX) + 1,
                max: t.limits.max_for(branch),
            })?;
            parent_node.children.push(id.clone());
            let parent_id = parent_node.id.clone();
            t.nodes.insert(
                id.clone(),
                TroopNode {
                    id,
                    name,
                    tier,
                    branch,
                    parent: Some(parent_id),
                    children: Vec::new(),
                },
            );
            Ok(())
        })
    }

    pub fn remove_leaf(&mut self, id: &str) -> Result<TroopNode, TreeError> {
        let node = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| TreeError::UnknownNode(TroopId::new(id)))?;
        if !node.is_leaf() {
            return Err(TreeError::NotALeaf(node.id));
        }
        self.edit(|t| {
            t.detach(&node.id);
            t.nodes.remove(&node.id);
            for branch in Branch::ALL {
                let slot = t.default_roots.slot(*branch);
                if slot.as_ref() == Some(&node.id) {
                    *slot = None;
                }
            }
            Ok(())
        })?;
        Ok(node)
    }

    /// Move the subtree rooted at `id` under `new_parent` (or make it a root
    /// when `None`). The subtree keeps its shape and is re-tiered so that its
    /// root sits one tier above the new parent.
    pub fn reparent(&mut self, id: &str, new_parent: Option<&str>) -> Result<(), TreeError> {
        let moved = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| TreeError::UnknownNode(TroopId::new(id)))?;
        // Already there: keep sibling and root order as is.
        if moved.parent.as_ref().map(TroopId::as_str) == new_parent {
            return Ok(());
        }

        let new_tier: i16 = match new_parent {
            Some(p) => {
                if p == id || self.is_ancestor_of(id, p) {
                    return Err(TreeError::Cycle(TroopId::new(p)));
                }
                let parent = self
                    .nodes
                    .get(p)
                    .ok_or_else(|| TreeError::UnknownNode(TroopId::new(p)))?;
                i16::from(parent.tier) + 1
            }
            None => i16::from(moved.tier),
        };
        let delta = new_tier - i16::from(moved.tier);

        let subtree: Vec<TroopId> = self.depth_first(id).iter().map(|n| n.id.clone()).collect();
        for sid in &subtree {
            let node = &self.nodes[sid];
            let shifted = i16::from(node.tier) + delta;
            if shifted < 1 {
                return Err(TreeError::TierBelowOne {
                    id: sid.clone(),
                    tier: shifted,
                });
            }
            let max = self.limits.max_for(node.branch);
            if shifted > i16::from(max) {
                return Err(TreeError::TierAboveLimit {
                    id: sid.clone(),
                    branch: node.branch,
                    tier: shifted,
                    max,
                });
            }
        }

        self.edit(|t| {
            t.detach(&moved.id);
            for sid in &subtree {
                if let Some(node) = t.nodes.get_mut(sid) {
                    // Range-checked above.
                    node.tier = (i16::from(node.tier) + delta) as u8;
                }
            }
            match new_parent {
                Some(p) => {
                    if let Some(parent) = t.nodes.get_mut(p) {
                        parent.children.push(moved.id.clone());
                    }
                    if let Some(node) = t.nodes.get_mut(&moved.id) {
                        node.parent = Some(TroopId::new(p));
                    }
                }
                None => {
                    t.roots.push(moved.id.clone());
                    if let Some(node) = t.nodes.get_mut(&moved.id) {
                        node.parent = None;
                    }
                }
            }
            Ok(())
        })
    }

    pub fn set_default_root(&mut self, branch: Branch, id: &str) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::UnknownNode(TroopId::new(id)));
        }
        self.edit(|t| {
            *t.default_roots.slot(branch) = Some(TroopId::new(id));
            Ok(())
        })
    }

    pub fn clear_default_root(&mut self, branch: Branch) {
        *self.default_roots.slot(branch) = None;
    }

    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::UnknownNode(TroopId::new(id)))?;
        node.name = name.into();
        Ok(())
    }

    /// Unlink `id` from its parent's child list or from the root list.
    fn detach(&mut self, id: &TroopId) {
        let parent = self.nodes.get(id).and_then(|n| n.parent.clone());
        match parent {
            Some(p) => {
                if let Some(parent) = self.nodes.get_mut(&p) {
                    parent.children.retain(|c| c != id);
                }
            }
            None => self.roots.retain(|r| r != id),
        }
    }

    // -- Validation --

    /// Check every structural rule of the forest.
    pub fn validate(&self) -> Result<(), TreeError> {
        // Root list agrees with parent links.
        let mut seen_roots = BTreeSet::new();
        for root in &self.roots {
            let node = self
                .nodes
                .get(root)
                .ok_or_else(|| TreeError::UnknownNode(root.clone()))?;
            if node.parent.is_some() || !seen_roots.insert(root) {
                return Err(TreeError::RootMismatch(root.clone()));
            }
        }

        for node in self.nodes.values() {
            match &node.parent {
                None if !seen_roots.contains(&node.id) => {
                    return Err(TreeError::RootMismatch(node.id.clone()));
                }
                None => {}
                Some(p) => {
                    let parent = self.nodes.get(p).ok_or_else(|| TreeError::BrokenLink {
                        parent: p.clone(),
                        child: node.id.clone(),
                    })?;
                    if parent.children.iter().filter(|c| **c == node.id).count() != 1 {
                        return Err(TreeError::BrokenLink {
                            parent: p.clone(),
                            child: node.id.clone(),
                        });
                    }
                }
            }

            if node.tier < 1 {
                return Err(TreeError::TierBelowOne {
                    id: node.id.clone(),
                    tier: i16::from(node.tier),
                });
            }
            let max = self.limits.max_for(node.branch);
            if node.tier > max {
                return Err(TreeError::TierAboveLimit {
                    id: node.id.clone(),
                    branch: node.branch,
                    tier: i16::from(node.tier),
                    max,
                });
            }
            if node.children.len() > MAX_CHILDREN {
                return Err(TreeError::TooManyChildren {
                    id: node.id.clone(),
                    count: node.children.len(),
                });
            }

            for child_id in &node.children {
                let child = self.nodes.get(child_id).ok_or_else(|| TreeError::BrokenLink {
                    parent: node.id.clone(),
                    child: child_id.clone(),
                })?;
                if child.parent.as_ref() != Some(&node.id) {
                    return Err(TreeError::BrokenLink {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                    });
                }
                if u16::from(child.tier) != u16::from(node.tier) + 1 {
                    return Err(TreeError::TierNotIncreasing {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                        parent_tier: node.tier,
                        child_tier: child.tier,
                    });
                }
                if node.branch == Branch::Elite && child.branch == Branch::Basic {
                    return Err(TreeError::EliteParentsBasic {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                    });
                }
            }
        }

        // Reachability from the roots; anything left over hangs off a cycle.
        let mut visited = BTreeSet::new();
        for root in &self.roots {
            let mut divergence: Option<&TroopId> = None;
            let mut queue = VecDeque::from([root]);
            while let Some(id) = queue.pop_front() {
                if !visited.insert(id) {
                    return Err(TreeError::Cycle(id.clone()));
                }
                let node = &self.nodes[id];
                let diverges = node
                    .children
                    .iter()
                    .any(|c| self.nodes[c].branch != node.branch);
                if diverges {
                    if let Some(first) = divergence {
                        return Err(TreeError::RepeatedDivergence {
                            first: first.clone(),
                            second: id.clone(),
                        });
                    }
                    divergence = Some(id);
                }
                queue.extend(node.children.iter());
            }
        }
        if let Some(orphan) = self.nodes.keys().find(|id| !visited.contains(id)) {
            return Err(TreeError::Cycle(orphan.clone()));
        }

        for branch in Branch::ALL {
            if let Some(id) = self.default_roots.get(*branch) {
                let node = self
                    .nodes
                    .get(id)
                    .ok_or_else(|| TreeError::UnknownNode(id.clone()))?;
                if node.branch != *branch {
                    return Err(TreeError::DefaultRootBranch {
                        branch: *branch,
                        id: id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl From<TroopTree> for TreeParts {
    fn from(tree: TroopTree) -> Self {
        tree.to_parts()
    }
}

impl TryFrom<TreeParts> for TroopTree {
    type Error = TreeError;

    fn try_from(parts: TreeParts) -> Result<Self, Self::Error> {
        TroopTree::from_parts(parts)
    }
}
