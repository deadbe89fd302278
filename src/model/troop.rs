use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable troop-definition id, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TroopId(pub String);

impl TroopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TroopId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for TroopId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TroopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Branch {
    Basic,
    Elite,
}

string_enum!(Branch {
    Basic => "basic",
    Elite => "elite",
});

impl Branch {
    pub fn is_elite(&self) -> bool {
        matches!(self, Branch::Elite)
    }

    pub fn other(&self) -> Branch {
        match self {
            Branch::Basic => Branch::Elite,
            Branch::Elite => Branch::Basic,
        }
    }
}

/// One troop definition in a tree. Pure data; structure is owned by `TroopTree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroopNode {
    pub id: TroopId,
    pub name: String,
    pub tier: u8,
    pub branch: Branch,
    pub parent: Option<TroopId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TroopId>,
}

impl TroopNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Highest tier each branch may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    pub basic: u8,
    pub elite: u8,
}

impl TierLimits {
    pub const BASIC_MAX: u8 = 5;
    pub const ELITE_MAX: u8 = 6;

    /// Vanilla limits, raised by one on both branches when an extended-tier
    /// extension is active.
    pub fn standard(extended: bool) -> Self {
        let bump = u8::from(extended);
        Self {
            basic: Self::BASIC_MAX + bump,
            elite: Self::ELITE_MAX + bump,
        }
    }

    pub fn max_for(&self, branch: Branch) -> u8 {
        match branch {
            Branch::Basic => self.basic,
            Branch::Elite => self.elite,
        }
    }

    pub fn highest(&self) -> u8 {
        self.basic.max(self.elite)
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self::standard(false)
    }
}
