use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::SimClock;
use super::commands::{EditorCommand, apply_editor_commands};
use super::events::EditorEvent;
use super::resources::{ActiveRootPolicy, ActiveTierLimits, SyncLog, UnlockState};
use super::schedule::{SimPhase, configure_sim_schedule};
use super::systems::apply_unlock_bonus;
use crate::config::{EngineConfig, load_engine_config_from_env};
use crate::policy::{CompatibilityProbe, StaticProbe, select_root_policy, select_tier_limits};
use crate::store::TreeStore;

/// Build a headless engine app with default config and no extensions.
///
/// Manual tick control:
/// ```no_run
/// # use troop_sync::ecs::{build_engine_app, SimTick};
/// let mut app = build_engine_app();
/// app.world_mut().run_schedule(SimTick);
/// ```
pub fn build_engine_app() -> App {
    build_engine_app_with(EngineConfig::default(), &StaticProbe::default())
}

/// Build with config from `TROOP_ENGINE_CONFIG` (or defaults).
pub fn build_engine_app_from_env(probe: &dyn CompatibilityProbe) -> App {
    build_engine_app_with(load_engine_config_from_env(), probe)
}

/// Build with an explicit config and compatibility probe. The root policy and
/// tier limits are decided here, once, and stay fixed for the app's life.
pub fn build_engine_app_with(config: EngineConfig, probe: &dyn CompatibilityProbe) -> App {
    let executor: ExecutorKind = config.executor.into();
    let mut app = App::empty();

    app.insert_resource(SimClock::new());
    app.insert_resource(TreeStore::new());
    app.insert_resource(SyncLog::with_capacity(config.sync_log_capacity));
    app.insert_resource(UnlockState::default());
    app.insert_resource(ActiveRootPolicy(select_root_policy(probe, &config)));
    app.insert_resource(ActiveTierLimits(select_tier_limits(probe, &config)));
    app.insert_resource(config);

    MessageRegistry::register_message::<EditorCommand>(app.world_mut());
    MessageRegistry::register_message::<EditorEvent>(app.world_mut());

    let mut schedule = configure_sim_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(SimPhase::PreUpdate));
    schedule.add_systems(apply_unlock_bonus.in_set(SimPhase::Update));
    schedule.add_systems(apply_editor_commands.in_set(SimPhase::PostUpdate));
    app.add_schedule(schedule);
    app
}
