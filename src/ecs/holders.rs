//! Adapts the world's garrisons, militias and party rosters to `RosterHolder`.

use std::collections::BTreeMap;

use bevy_ecs::change_detection::Mut;
use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{ClanMarker, CultureMarker, FactionIdentity, Garrison, Militia, PartyRoster, SimEntity};
use crate::ecs::relationships::{ClanOf, OwnedBy};
use crate::model::{Clan, ClanId, Culture, CultureId, FactionId, Roster, TroopTree};
use crate::policy::RootResolutionPolicy;
use crate::sync::{HolderKind, RosterHolder, RosterSynchronizer, SyncSummary};

/// A roster component borrowed out of the world. Writing through it marks
/// the component changed; reading does not.
pub struct WorldHolder<'w> {
    kind: HolderKind,
    owner: Option<FactionId>,
    roster: Mut<'w, Roster>,
}

impl<'w> WorldHolder<'w> {
    pub fn new(kind: HolderKind, owner: Option<FactionId>, roster: Mut<'w, Roster>) -> Self {
        Self { kind, owner, roster }
    }
}

impl RosterHolder for WorldHolder<'_> {
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
        *self.roster = roster;
    }
}

/// Faction identity of every culture and clan entity.
pub fn faction_owners(world: &mut World) -> BTreeMap<Entity, FactionId> {
    let mut query = world.query::<(Entity, &FactionIdentity)>();
    query.iter(world).map(|(e, id)| (e, id.0)).collect()
}

/// Run one synchronization pass over every holder in the world.
///
/// Each entity is visited once; a settlement contributes its garrison and
/// its militia as two holders.
pub fn synchronize_world(
    world: &mut World,
    policy: &dyn RootResolutionPolicy,
    faction: FactionId,
    previous: Option<&TroopTree>,
    tree: &TroopTree,
) -> SyncSummary {
    let owners = faction_owners(world);
    let mut query = world.query::<(
        Option<&OwnedBy>,
        Option<&mut Garrison>,
        Option<&mut Militia>,
        Option<&mut PartyRoster>,
    )>();

    let holders = query
        .iter_mut(world)
        .flat_map(|(owned_by, garrison, militia, party)| {
            let owner = owned_by.and_then(|o| owners.get(&o.0).copied());
            [
                garrison.map(|g| {
                    WorldHolder::new(HolderKind::Garrison, owner, g.map_unchanged(|g| &mut g.roster))
                }),
                militia.map(|m| {
                    WorldHolder::new(HolderKind::Militia, owner, m.map_unchanged(|m| &mut m.roster))
                }),
                party.map(|p| {
                    WorldHolder::new(HolderKind::FieldParty, owner, p.map_unchanged(|p| &mut p.roster))
                }),
            ]
            .into_iter()
            .flatten()
        });

    RosterSynchronizer::new(policy).synchronize(faction, previous, tree, holders)
}

/// Value snapshot of a culture entity; `None` if `entity` is not a culture.
pub fn culture_snapshot(world: &World, entity: Entity) -> Option<Culture> {
    let entity_ref = world.get_entity(entity).ok()?;
    entity_ref.get::<CultureMarker>()?;
    let sim = entity_ref.get::<SimEntity>()?;
    match entity_ref.get::<FactionIdentity>()?.0 {
        FactionId::Culture(id) => Some(Culture {
            id,
            name: sim.name.clone(),
        }),
        FactionId::Clan(_) => None,
    }
}

/// Value snapshot of a clan entity and its culture link.
pub fn clan_snapshot(world: &World, entity: Entity) -> Option<Clan> {
    let entity_ref = world.get_entity(entity).ok()?;
    entity_ref.get::<ClanMarker>()?;
    let sim = entity_ref.get::<SimEntity>()?;
    let id: ClanId = match entity_ref.get::<FactionIdentity>()?.0 {
        FactionId::Clan(id) => id,
        FactionId::Culture(_) => return None,
    };
    let culture_entity = entity_ref.get::<ClanOf>()?.0;
    let culture: CultureId = match world.get::<FactionIdentity>(culture_entity)?.0 {
        FactionId::Culture(id) => id,
        FactionId::Clan(_) => return None,
    };
    Some(Clan {
        id,
        name: sim.name.clone(),
        culture,
    })
}
