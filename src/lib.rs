#[macro_use]
pub mod model;

pub mod config;
pub mod ecs;
pub mod flush;
pub mod policy;
pub mod store;
pub mod sync;

pub use config::{ConfigError, EngineConfig};
pub use model::{
    Branch, Clan, ClanId, Culture, CultureId, EditState, FactionId, Roster, RosterEntry,
    SelectionChange, TierLimits, TreeEdit, TreeError, TroopId, TroopNode, TroopTree,
    UnlockGatedBonus,
};
pub use policy::{CompatibilityProbe, RootResolutionPolicy, StaticProbe, StructuralOverride};
pub use store::TreeStore;
pub use sync::{HolderKind, RosterHolder, RosterSynchronizer, SyncSummary};
