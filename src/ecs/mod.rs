pub mod app;
pub mod clock;
pub mod commands;
pub mod components;
pub mod events;
pub mod holders;
pub mod relationships;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod systems;
#[cfg(test)]
pub mod test_helpers;

pub use app::{build_engine_app, build_engine_app_from_env, build_engine_app_with};
pub use clock::SimClock;
pub use commands::{EditorCommand, apply_editor_commands, commit_tree};
pub use components::{
    ClanMarker, CultureMarker, FactionIdentity, FieldParty, Garrison, Militia, PartyMorale,
    PartyRoster, Settlement, SimEntity,
};
pub use events::EditorEvent;
pub use holders::{WorldHolder, clan_snapshot, culture_snapshot, synchronize_world};
pub use relationships::{ClanOf, CultureClans, OwnedBy, OwnedHolders};
pub use resources::{
    ActiveRootPolicy, ActiveTierLimits, EditorSession, SyncLog, SyncRecord,
    UnlockState,
};
pub use schedule::{SimPhase, SimTick, configure_sim_schedule};
pub use spawn::{set_owner, spawn_clan, spawn_culture, spawn_party, spawn_settlement};
