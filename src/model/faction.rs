use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CultureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClanId(pub u64);

/// Identity of a troop-tree owner: a culture-level default or a specific clan.
///
/// Equality is identity: two ids are equal only when they name the same
/// culture or the same clan. A clan never equals its own culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FactionId {
    Culture(CultureId),
    Clan(ClanId),
}

impl FactionId {
    pub fn is_clan(&self) -> bool {
        matches!(self, FactionId::Clan(_))
    }
}

impl From<CultureId> for FactionId {
    fn from(id: CultureId) -> Self {
        FactionId::Culture(id)
    }
}

impl From<ClanId> for FactionId {
    fn from(id: ClanId) -> Self {
        FactionId::Clan(id)
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactionId::Culture(id) => write!(f, "culture:{}", id.0),
            FactionId::Clan(id) => write!(f, "clan:{}", id.0),
        }
    }
}

/// Read-only snapshot of a culture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Culture {
    pub id: CultureId,
    pub name: String,
}

impl Culture {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: CultureId(id),
            name: name.into(),
        }
    }

    pub fn faction(&self) -> FactionId {
        FactionId::Culture(self.id)
    }
}

/// Read-only snapshot of a clan and the culture it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clan {
    pub id: ClanId,
    pub name: String,
    pub culture: CultureId,
}

impl Clan {
    pub fn new(id: u64, name: impl Into<String>, culture: CultureId) -> Self {
        Self {
            id: ClanId(id),
            name: name.into(),
            culture,
        }
    }

    pub fn faction(&self) -> FactionId {
        FactionId::Clan(self.id)
    }
}
