pub mod bonus;

pub use bonus::apply_unlock_bonus;
