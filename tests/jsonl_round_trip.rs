mod common;

use common::*;
use troop_sync::flush::{PersistError, TREES_FILE, flush_trees_to_jsonl, load_trees_from_jsonl};
use troop_sync::model::*;
use troop_sync::TreeStore;

fn build_store() -> TreeStore {
    let mut store = TreeStore::new();
    store.commit(meroc_faction(), current_tree());

    let mut culture_tree = edited_tree();
    culture_tree.set_default_root(Branch::Basic, "recruit").unwrap();
    store.commit(FactionId::Culture(CultureId(1)), culture_tree);

    let mut elite_only = TroopTree::default();
    elite_only.insert_root("squire", "Squire", 2, Branch::Elite).unwrap();
    elite_only.insert_child("squire", "knight", "Knight", Branch::Elite).unwrap();
    store.commit(FactionId::Clan(ClanId(11)), elite_only);
    store
}

#[test]
fn flush_writes_one_line_per_faction() {
    let store = build_store();
    let dir = tempfile::tempdir().unwrap();

    let path = flush_trees_to_jsonl(&store, dir.path()).unwrap();
    assert_eq!(path, dir.path().join(TREES_FILE));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 3);
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("faction").is_some());
        assert!(value["tree"]["nodes"].is_array());
    }
}

#[test]
fn reload_reproduces_the_store() {
    let store = build_store();
    let dir = tempfile::tempdir().unwrap();
    let path = flush_trees_to_jsonl(&store, dir.path()).unwrap();

    let loaded = load_trees_from_jsonl(&path).unwrap();
    assert_eq!(loaded.len(), store.len());
    for (faction, tree) in store.iter() {
        assert_eq!(loaded.get(faction), Some(tree), "{faction}");
    }
    let culture = loaded.get(FactionId::Culture(CultureId(1))).unwrap();
    assert_eq!(
        culture.default_root(Branch::Basic).map(|n| n.id.as_str()),
        Some("recruit")
    );
}

#[test]
fn nested_output_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("saves").join("slot1");
    let path = flush_trees_to_jsonl(&build_store(), &nested).unwrap();
    assert!(path.exists());
}

#[test]
fn duplicate_faction_is_rejected() {
    let store = build_store();
    let dir = tempfile::tempdir().unwrap();
    let path = flush_trees_to_jsonl(&store, dir.path()).unwrap();

    let first = read_lines(&path).remove(0);
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str(&first);
    content.push('\n');
    std::fs::write(&path, content).unwrap();

    let err = load_trees_from_jsonl(&path).unwrap_err();
    assert!(matches!(err, PersistError::DuplicateFaction { line: 4, .. }), "{err}");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_trees_from_jsonl(&dir.path().join(TREES_FILE)).unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }));
}
