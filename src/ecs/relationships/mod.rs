pub mod structural;

pub use structural::{ClanOf, CultureClans, OwnedBy, OwnedHolders};
