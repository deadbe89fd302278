use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use crate::model::{FactionId, TroopTree};

/// Committed troop tree per faction. A commit replaces the whole tree.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TreeStore {
    trees: BTreeMap<FactionId, TroopTree>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, faction: FactionId) -> Option<&TroopTree> {
        self.trees.get(&faction)
    }

    /// Store `tree` as the faction's definition, returning the one it replaced.
    pub fn commit(&mut self, faction: FactionId, tree: TroopTree) -> Option<TroopTree> {
        self.trees.insert(faction, tree)
    }

    pub fn remove(&mut self, faction: FactionId) -> Option<TroopTree> {
        self.trees.remove(&faction)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactionId, &TroopTree)> {
        self.trees.iter().map(|(f, t)| (*f, t))
    }
}
