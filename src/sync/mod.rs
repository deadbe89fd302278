pub mod holder;
pub mod summary;
pub mod swap;
pub mod synchronizer;

pub use holder::{DetachedHolder, HolderKind, RosterHolder};
pub use summary::SyncSummary;
pub use swap::{Remap, SwapOutcome, remap_troop, swap_roster};
pub use synchronizer::RosterSynchronizer;
