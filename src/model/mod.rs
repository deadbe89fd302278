#[macro_use]
mod macros;

pub mod bonus;
pub mod edit;
pub mod faction;
pub mod roster;
pub mod selection;
pub mod tree;
pub mod troop;

pub use bonus::{ExplainedStat, FallbackLocalizer, LabelKey, Localizer, StatAdjustment, UnlockGatedBonus};
pub use edit::TreeEdit;
pub use faction::{Clan, ClanId, Culture, CultureId, FactionId};
pub use roster::{Roster, RosterElement, RosterEntry};
pub use selection::{EditState, SelectionChange};
pub use tree::{DefaultRoots, TreeError, TreeParts, TroopTree, MAX_CHILDREN};
pub use troop::{Branch, TierLimits, TroopId, TroopNode};
