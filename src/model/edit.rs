use serde::{Deserialize, Serialize};

use super::tree::{TreeError, TroopTree};
use super::troop::{Branch, TroopId};

/// One operator edit against a draft tree, as sent by the editor view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeEdit {
    InsertRoot {
        id: TroopId,
        name: String,
        tier: u8,
        branch: Branch,
    },
    InsertChild {
        parent: TroopId,
        id: TroopId,
        name: String,
        branch: Branch,
    },
    RemoveLeaf {
        id: TroopId,
    },
    Reparent {
        id: TroopId,
        parent: Option<TroopId>,
    },
    SetDefaultRoot {
        branch: Branch,
        id: TroopId,
    },
    ClearDefaultRoot {
        branch: Branch,
    },
    Rename {
        id: TroopId,
        name: String,
    },
}

impl TreeEdit {
    /// Apply to `tree`. A rejected edit leaves `tree` unchanged.
    pub fn apply(&self, tree: &mut TroopTree) -> Result<(), TreeError> {
        match self {
            TreeEdit::InsertRoot {
                id,
                name,
                tier,
                branch,
            } => tree.insert_root(id.clone(), name.as_str(), *tier, *branch),
            TreeEdit::InsertChild {
                parent,
                id,
                name,
                branch,
            } => tree.insert_child(parent.as_str(), id.clone(), name.as_str(), *branch),
            TreeEdit::RemoveLeaf { id } => tree.remove_leaf(id.as_str()).map(|_| ()),
            TreeEdit::Reparent { id, parent } => {
                tree.reparent(id.as_str(), parent.as_ref().map(TroopId::as_str))
            }
            TreeEdit::SetDefaultRoot { branch, id } => tree.set_default_root(*branch, id.as_str()),
            TreeEdit::ClearDefaultRoot { branch } => {
                tree.clear_default_root(*branch);
                Ok(())
            }
            TreeEdit::Rename { id, name } => tree.rename(id.as_str(), name.as_str()),
        }
    }

    /// The troop the edit is about, for logging.
    pub fn subject(&self) -> Option<&TroopId> {
        match self {
            TreeEdit::InsertRoot { id, .. }
            | TreeEdit::InsertChild { id, .. }
            | TreeEdit::RemoveLeaf { id }
            | TreeEdit::Reparent { id, .. }
            | TreeEdit::SetDefaultRoot { id, .. }
            | TreeEdit::Rename { id, .. } => Some(id),
            TreeEdit::ClearDefaultRoot { .. } => None,
        }
    }
}
