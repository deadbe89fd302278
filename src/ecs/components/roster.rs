use bevy_ecs::component::Component;

use crate::model::{ExplainedStat, Roster};

/// Settlement garrison.
#[derive(Component, Debug, Clone, Default)]
pub struct Garrison {
    pub roster: Roster,
}

/// Settlement militia.
#[derive(Component, Debug, Clone, Default)]
pub struct Militia {
    pub roster: Roster,
}

/// Members of a roaming field party.
#[derive(Component, Debug, Clone, Default)]
pub struct PartyRoster {
    pub roster: Roster,
}

/// Party morale: host-computed base plus engine adjustments.
#[derive(Component, Debug, Clone, Default)]
pub struct PartyMorale(pub ExplainedStat);

impl PartyMorale {
    pub fn new(base: f64) -> Self {
        Self(ExplainedStat::new(base))
    }

    pub fn total(&self) -> f64 {
        self.0.total()
    }
}
