mod common;
mod faction;
mod roster;

pub use common::*;
pub use faction::*;
pub use roster::*;
