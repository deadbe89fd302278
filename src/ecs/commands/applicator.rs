use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;
use tracing::{debug, info, warn};

use crate::ecs::clock::SimClock;
use crate::ecs::events::EditorEvent;
use crate::ecs::holders::{clan_snapshot, culture_snapshot, synchronize_world};
use crate::ecs::resources::{ActiveRootPolicy, ActiveTierLimits, EditorSession, SyncLog};
use crate::model::{EditState, FactionId, TierLimits, TroopTree};
use crate::store::TreeStore;
use crate::sync::SyncSummary;

use super::EditorCommand;

/// Exclusive system that drains pending `EditorCommand` messages, applies
/// them to the open session and the tree store, synchronizes the world on
/// every commit, and emits `EditorEvent` messages.
///
/// Runs in `SimPhase::PostUpdate`.
pub fn apply_editor_commands(world: &mut World) {
    let commands: Vec<EditorCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<EditorCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    if commands.is_empty() {
        return;
    }

    world.init_resource::<TreeStore>();
    // The session leaves the world while commands run and goes back after.
    let mut session = world.remove_resource::<EditorSession>();
    let mut events = Vec::new();

    for cmd in commands {
        match cmd {
            EditorCommand::OpenSession { target } => {
                let Some(state) = session_state_for(world, target) else {
                    warn!(?target, "OpenSession target is neither a culture nor a clan");
                    continue;
                };
                let opened = EditorSession::open(state, world.resource::<TreeStore>(), tier_limits(world));
                events.push(EditorEvent::SessionOpened {
                    faction: opened.faction(),
                });
                session = Some(opened);
            }
            EditorCommand::CloseSession => {
                if session.take().is_some() {
                    events.push(EditorEvent::SessionClosed);
                }
            }
            EditorCommand::SelectCulture(entity) => {
                let Some(open) = session.as_mut() else {
                    warn!("SelectCulture without an open editor session");
                    continue;
                };
                let culture = culture_snapshot(world, entity);
                if culture.is_none() {
                    debug!(?entity, "culture selection ignored");
                }
                let change = open.select_culture(culture.as_ref(), world.resource::<TreeStore>(), tier_limits(world));
                if !change.is_noop() {
                    events.push(EditorEvent::SelectionChanged {
                        faction: open.faction(),
                        change,
                    });
                }
            }
            EditorCommand::SelectClan(entity) => {
                let Some(open) = session.as_mut() else {
                    warn!("SelectClan without an open editor session");
                    continue;
                };
                let clan = clan_snapshot(world, entity);
                if clan.is_none() {
                    debug!(?entity, "clan selection ignored");
                }
                let change = open.select_clan(clan.as_ref(), world.resource::<TreeStore>(), tier_limits(world));
                if !change.is_noop() {
                    events.push(EditorEvent::SelectionChanged {
                        faction: open.faction(),
                        change,
                    });
                }
            }
            EditorCommand::Edit(edit) => {
                let Some(open) = session.as_mut() else {
                    warn!("Edit without an open editor session");
                    continue;
                };
                if let Err(error) = open.edit(&edit) {
                    warn!(faction = %open.faction(), troop = ?edit.subject(), %error, "tree edit rejected");
                    events.push(EditorEvent::EditRejected { edit, error });
                }
            }
            EditorCommand::CommitDraft => {
                let Some(open) = session.as_ref() else {
                    warn!("CommitDraft without an open editor session");
                    continue;
                };
                let faction = open.faction();
                let summary = commit_tree(world, faction, open.draft.clone());
                events.push(EditorEvent::TreeCommitted { faction, summary });
            }
            EditorCommand::Commit { faction, tree } => {
                let summary = commit_tree(world, faction, tree);
                if let Some(open) = session.as_mut().filter(|s| s.faction() == faction) {
                    open.reload_draft(world.resource::<TreeStore>(), tier_limits(world));
                }
                events.push(EditorEvent::TreeCommitted { faction, summary });
            }
        }
    }

    if let Some(session) = session {
        world.insert_resource(session);
    }
    if let Some(mut messages) = world.get_resource_mut::<Messages<EditorEvent>>() {
        messages.write_batch(events);
    }
}

/// Store `tree` as the faction's committed tree and synchronize every holder
/// the faction owns against it.
pub fn commit_tree(world: &mut World, faction: FactionId, tree: TroopTree) -> SyncSummary {
    let previous = world
        .get_resource_or_insert_with(TreeStore::default)
        .commit(faction, tree.clone());

    let policy = world.remove_resource::<ActiveRootPolicy>().unwrap_or_default();
    let summary = synchronize_world(world, policy.0.as_ref(), faction, previous.as_ref(), &tree);
    world.insert_resource(policy);

    let tick = world.get_resource::<SimClock>().map(|c| c.tick_count).unwrap_or(0);
    world
        .get_resource_or_insert_with(SyncLog::default)
        .record(tick, faction, summary);
    info!(%faction, tick, troops = tree.len(), %summary, "troop tree committed");
    summary
}

fn session_state_for(world: &World, target: Entity) -> Option<EditState> {
    if let Some(culture) = culture_snapshot(world, target) {
        return Some(EditState::for_culture(&culture));
    }
    clan_snapshot(world, target).map(|clan| EditState::for_clan(&clan))
}

fn tier_limits(world: &World) -> TierLimits {
    world
        .get_resource::<ActiveTierLimits>()
        .map(|l| l.0)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_engine_app;
    use crate::ecs::components::Garrison;
    use crate::ecs::spawn::{spawn_clan, spawn_culture, spawn_settlement};
    use crate::ecs::test_helpers::{run_commands, send, tick};
    use crate::model::{Branch, ClanId, Roster, TreeEdit, TroopId};

    fn tree(root: &str) -> TroopTree {
        let mut t = TroopTree::default();
        t.insert_root(root, root, 1, Branch::Basic).unwrap();
        t
    }

    #[test]
    fn open_on_non_faction_entity_is_ignored() {
        let mut app = build_engine_app();
        let town = spawn_settlement(app.world_mut(), 1, "Town", None, Roster::new(), Roster::new());
        let events = run_commands(&mut app, [EditorCommand::OpenSession { target: town }]);
        assert!(events.is_empty());
        assert!(app.world().get_resource::<EditorSession>().is_none());
    }

    #[test]
    fn external_commit_reloads_open_draft() {
        let mut app = build_engine_app();
        let culture = spawn_culture(app.world_mut(), 1, "Vlandia");
        let clan = spawn_clan(app.world_mut(), 10, "dey Meroc", culture);
        let faction = FactionId::Clan(ClanId(10));

        run_commands(&mut app, [EditorCommand::OpenSession { target: clan }]);
        let events = run_commands(
            &mut app,
            [
                EditorCommand::Edit(TreeEdit::InsertRoot {
                    id: TroopId::new("draft_only"),
                    name: "Draft".into(),
                    tier: 1,
                    branch: Branch::Basic,
                }),
                EditorCommand::Commit {
                    faction,
                    tree: tree("levy"),
                },
            ],
        );
        assert!(matches!(events.as_slice(), [EditorEvent::TreeCommitted { .. }]));

        let session = app.world().resource::<EditorSession>();
        assert!(session.draft.contains("levy"));
        assert!(!session.draft.contains("draft_only"));
        assert_eq!(session.state.focused_troop().map(TroopId::as_str), Some("levy"));
    }

    #[test]
    fn sync_log_records_commit_tick() {
        let mut app = build_engine_app();
        let culture = spawn_culture(app.world_mut(), 1, "Vlandia");
        spawn_settlement(
            app.world_mut(),
            2,
            "Ocs Hall",
            Some(culture),
            Roster::new().with("levy", 3, 0),
            Roster::new(),
        );
        let faction = FactionId::Culture(crate::model::CultureId(1));

        tick(&mut app, 2);
        send(&mut app, [EditorCommand::Commit { faction, tree: tree("levy") }]);
        tick(&mut app, 1);

        let log = app.world().resource::<SyncLog>();
        let record = log.last().unwrap();
        assert_eq!(record.tick, 2);
        assert_eq!(record.faction, faction);
        assert_eq!(record.summary.holders_matched, 2);
        assert_eq!(record.summary.holders_changed, 0);
    }

    #[test]
    fn commit_tree_works_without_app_resources() {
        let mut world = World::new();
        let culture = spawn_culture(&mut world, 1, "Vlandia");
        let faction = FactionId::Culture(crate::model::CultureId(1));
        let town = spawn_settlement(
            &mut world,
            2,
            "Town",
            Some(culture),
            Roster::new().with("old", 4, 1),
            Roster::new(),
        );
        let mut previous = TroopTree::default();
        previous.insert_root("old", "Old", 1, Branch::Basic).unwrap();

        commit_tree(&mut world, faction, previous);
        let summary = commit_tree(&mut world, faction, tree("new"));
        assert_eq!(summary.exact, 1);
        assert_eq!(
            world.get::<Garrison>(town).unwrap().roster,
            Roster::new().with("new", 4, 1)
        );
        assert_eq!(world.resource::<SyncLog>().len(), 2);
        assert_eq!(world.resource::<TreeStore>().len(), 1);
    }
}
