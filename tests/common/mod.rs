#![allow(dead_code)]

use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use troop_sync::ecs::*;
use troop_sync::model::*;

pub struct TestWorld {
    pub app: App,
    pub vlandia: Entity,
    pub sturgia: Entity,
    pub meroc: Entity,
    pub varagos: Entity,
    pub pravend: Entity,
    pub ocs_hall: Entity,
    pub warband: Entity,
    pub rival_party: Entity,
}

/// Recruit(1,B) → Warrior(2,B) → {Guard(3,B), Raider(3,E)}.
pub fn current_tree() -> TroopTree {
    let mut tree = TroopTree::default();
    tree.insert_root("recruit", "Recruit", 1, Branch::Basic).unwrap();
    tree.insert_child("recruit", "warrior", "Warrior", Branch::Basic).unwrap();
    tree.insert_child("warrior", "guard", "Guard", Branch::Basic).unwrap();
    tree.insert_child("warrior", "raider", "Raider", Branch::Elite).unwrap();
    tree
}

/// Same shape with tier 2 basic renamed Footman and tier 3 basic Spearman.
pub fn edited_tree() -> TroopTree {
    let mut tree = TroopTree::default();
    tree.insert_root("recruit", "Recruit", 1, Branch::Basic).unwrap();
    tree.insert_child("recruit", "footman", "Footman", Branch::Basic).unwrap();
    tree.insert_child("footman", "spearman", "Spearman", Branch::Basic).unwrap();
    tree.insert_child("footman", "raider", "Raider", Branch::Elite).unwrap();
    tree
}

/// Two cultures with one clan each. The clan dey Meroc owns a town and a
/// party, its culture owns a castle, and the other clan owns a party; every
/// holder starts on `current_tree` ids, which is committed for dey Meroc.
pub fn build_test_world() -> TestWorld {
    let mut app = build_engine_app();
    let world = app.world_mut();

    let vlandia = spawn_culture(world, 1, "Vlandia");
    let sturgia = spawn_culture(world, 2, "Sturgia");
    let meroc = spawn_clan(world, 10, "dey Meroc", vlandia);
    let varagos = spawn_clan(world, 11, "Varagos", sturgia);

    let pravend = spawn_settlement(
        world,
        100,
        "Pravend",
        Some(meroc),
        Roster::new().with("warrior", 5, 0).with("guard", 3, 0),
        Roster::new().with("recruit", 12, 2),
    );
    let ocs_hall = spawn_settlement(
        world,
        101,
        "Ocs Hall",
        Some(vlandia),
        Roster::new().with("warrior", 4, 1),
        Roster::new(),
    );
    let warband = spawn_party(
        world,
        200,
        "dey Meroc warband",
        Some(meroc),
        Roster::new().with("guard", 6, 2).with("raider", 2, 0).with("looter", 2, 0),
        40.0,
    );
    let rival_party = spawn_party(
        world,
        201,
        "Varagos raiders",
        Some(varagos),
        Roster::new().with("warrior", 9, 0),
        40.0,
    );

    commit_tree(world, FactionId::Clan(ClanId(10)), current_tree());

    TestWorld {
        app,
        vlandia,
        sturgia,
        meroc,
        varagos,
        pravend,
        ocs_hall,
        warband,
        rival_party,
    }
}

pub fn meroc_faction() -> FactionId {
    FactionId::Clan(ClanId(10))
}

pub fn garrison(app: &App, entity: Entity) -> Roster {
    app.world().get::<Garrison>(entity).unwrap().roster.clone()
}

pub fn militia(app: &App, entity: Entity) -> Roster {
    app.world().get::<Militia>(entity).unwrap().roster.clone()
}

pub fn party(app: &App, entity: Entity) -> Roster {
    app.world().get::<PartyRoster>(entity).unwrap().roster.clone()
}

pub fn run_commands(app: &mut App, commands: impl IntoIterator<Item = EditorCommand>) -> Vec<EditorEvent> {
    {
        let mut messages = app.world_mut().resource_mut::<Messages<EditorCommand>>();
        for cmd in commands {
            messages.write(cmd);
        }
    }
    app.world_mut().run_schedule(SimTick);
    app.world_mut()
        .resource_mut::<Messages<EditorEvent>>()
        .drain()
        .collect()
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
