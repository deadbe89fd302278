use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res};

use crate::config::EngineConfig;
use crate::ecs::components::{FactionIdentity, FieldParty, PartyMorale, PartyRoster};
use crate::ecs::relationships::OwnedBy;
use crate::ecs::resources::UnlockState;
use crate::store::TreeStore;

/// Refresh the retinue morale adjustment of every field party.
///
/// The ratio is the share of the party's healthy units whose troop belongs
/// to the owning faction's committed tree. Parties without an owner or whose
/// owner has no tree get no adjustment.
pub fn apply_unlock_bonus(
    config: Res<EngineConfig>,
    store: Res<TreeStore>,
    unlocks: Res<UnlockState>,
    owners: Query<&FactionIdentity>,
    mut parties: Query<(&PartyRoster, Option<&OwnedBy>, &mut PartyMorale), With<FieldParty>>,
) {
    let calculator = config.bonus_calculator();
    let unlocked = unlocks.is_unlocked(&config.bonus_unlock);
    let key = calculator.label.key.as_str();

    for (party, owned_by, mut morale) in &mut parties {
        let tree = owned_by
            .and_then(|o| owners.get(o.0).ok())
            .and_then(|identity| store.get(identity.0));
        let adjustment = tree.and_then(|tree| {
            let ratio = party.roster.share_of(|troop| tree.contains(troop.as_str()));
            calculator.bonus(morale.0.base, ratio, unlocked)
        });
        if morale.0.adjustment(key) != adjustment.as_ref() {
            morale.0.set_adjustment(key, adjustment);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::schedule::Schedule;
    use bevy_ecs::world::World;

    use super::*;
    use crate::ecs::components::SimEntity;
    use crate::model::{Branch, ClanId, FactionId, Roster, TroopTree};

    fn setup(unlocked: bool) -> (World, bevy_ecs::entity::Entity) {
        let mut world = World::new();
        let clan_id = FactionId::Clan(ClanId(1));
        let mut tree = TroopTree::default();
        tree.insert_root("retainer", "Retainer", 1, Branch::Basic).unwrap();
        let mut store = TreeStore::new();
        store.commit(clan_id, tree);

        let mut unlocks = UnlockState::default();
        if unlocked {
            unlocks.unlock("retinue_morale");
        }
        world.insert_resource(EngineConfig::default());
        world.insert_resource(store);
        world.insert_resource(unlocks);

        let clan = world.spawn(FactionIdentity(clan_id)).id();
        let party = world
            .spawn((
                SimEntity {
                    id: 2,
                    name: "Warband".into(),
                },
                FieldParty,
                OwnedBy(clan),
                PartyRoster {
                    roster: Roster::new().with("retainer", 3, 4).with("looter", 1, 0),
                },
                PartyMorale::new(40.0),
            ))
            .id();
        (world, party)
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(apply_unlock_bonus);
        schedule.run(world);
    }

    #[test]
    fn unlocked_party_gets_scaled_bonus() {
        let (mut world, party) = setup(true);
        run(&mut world);
        let morale = world.get::<PartyMorale>(party).unwrap();
        // 40 * 0.75 * 0.2
        assert!((morale.total() - 46.0).abs() < 1e-9);

        run(&mut world);
        let morale = world.get::<PartyMorale>(party).unwrap();
        assert_eq!(morale.0.adjustments.len(), 1);
    }

    #[test]
    fn locked_party_gets_nothing() {
        let (mut world, party) = setup(false);
        run(&mut world);
        let morale = world.get::<PartyMorale>(party).unwrap();
        assert_eq!(morale.total(), 40.0);
        assert!(morale.0.adjustments.is_empty());
    }
}
