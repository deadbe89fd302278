pub mod jsonl;

pub use jsonl::{PersistError, TREES_FILE, flush_trees_to_jsonl, load_trees_from_jsonl};
