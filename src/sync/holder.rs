use serde::{Deserialize, Serialize};

use crate::model::{FactionId, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum HolderKind {
    Garrison,
    Militia,
    FieldParty,
}

string_enum!(HolderKind {
    Garrison => "garrison",
    Militia => "militia",
    FieldParty => "field_party",
});

/// A live container whose troop composition the synchronizer may rewrite.
pub trait RosterHolder {
    fn kind(&self) -> HolderKind;

    /// Owning faction, if the container currently has one.
    fn owner(&self) -> Option<FactionId>;

    fn composition(&self) -> &Roster;

    /// Replace the whole composition in one write.
    fn set_composition(&mut self, roster: Roster);
}

impl<T: RosterHolder + ?Sized> RosterHolder for &mut T {
    fn kind(&self) -> HolderKind {
        (**self).kind()
    }

    fn owner(&self) -> Option<FactionId> {
        (**self).owner()
    }

    fn composition(&self) -> &Roster {
        (**self).composition()
    }

    fn set_composition(&mut self, roster: Roster) {
        (**self).set_composition(roster)
    }
}

/// Holder backed by plain data, for hosts that snapshot containers outside
/// the ECS world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetachedHolder {
    pub kind: HolderKind,
    pub owner: Option<FactionId>,
    pub roster: Roster,
}

impl DetachedHolder {
    pub fn new(kind: HolderKind, owner: Option<FactionId>, roster: Roster) -> Self {
        Self { kind, owner, roster }
    }
}

impl RosterHolder for DetachedHolder {
    fn kind(&self) -> HolderKind {
        self.kind
    }

    fn owner(&self) -> Option<FactionId> {
        self.owner
    }

    fn composition(&self) -> &Roster {
        &self.roster
    }

    fn set_composition(&mut self, roster: Roster) {
        self.roster = roster;
    }
}
