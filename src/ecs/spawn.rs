use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::*;
use crate::ecs::relationships::{ClanOf, OwnedBy};
use crate::model::{ClanId, CultureId, FactionId, Roster};

fn owned(world: &mut World, entity: Entity, owner: Option<Entity>) {
    if let Some(owner) = owner {
        world.entity_mut(entity).insert(OwnedBy(owner));
    }
}

pub fn spawn_culture(world: &mut World, id: u64, name: impl Into<String>) -> Entity {
    world
        .spawn((
            SimEntity {
                id,
                name: name.into(),
            },
            CultureMarker,
            FactionIdentity(FactionId::Culture(CultureId(id))),
        ))
        .id()
}

pub fn spawn_clan(world: &mut World, id: u64, name: impl Into<String>, culture: Entity) -> Entity {
    world
        .spawn((
            SimEntity {
                id,
                name: name.into(),
            },
            ClanMarker,
            FactionIdentity(FactionId::Clan(ClanId(id))),
            ClanOf(culture),
        ))
        .id()
}

/// A settlement carries two holders: its garrison and its militia.
pub fn spawn_settlement(
    world: &mut World,
    id: u64,
    name: impl Into<String>,
    owner: Option<Entity>,
    garrison: Roster,
    militia: Roster,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity {
                id,
                name: name.into(),
            },
            Settlement,
            Garrison { roster: garrison },
            Militia { roster: militia },
        ))
        .id();
    owned(world, entity, owner);
    entity
}

pub fn spawn_party(
    world: &mut World,
    id: u64,
    name: impl Into<String>,
    owner: Option<Entity>,
    roster: Roster,
    base_morale: f64,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity {
                id,
                name: name.into(),
            },
            FieldParty,
            PartyRoster { roster },
            PartyMorale::new(base_morale),
        ))
        .id();
    owned(world, entity, owner);
    entity
}

/// Hand a settlement or party to another faction, or leave it ownerless.
pub fn set_owner(world: &mut World, entity: Entity, owner: Option<Entity>) {
    let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
        return;
    };
    match owner {
        Some(owner) => {
            entity_mut.insert(OwnedBy(owner));
        }
        None => {
            entity_mut.remove::<OwnedBy>();
        }
    }
}
