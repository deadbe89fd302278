use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FactionId, TreeError, TreeParts, TroopTree};
use crate::store::TreeStore;

/// File written by [`flush_trees_to_jsonl`] inside the output directory.
pub const TREES_FILE: &str = "troop_trees.jsonl";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: malformed record: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: tree for {faction} is invalid: {source}")]
    Tree {
        line: usize,
        faction: FactionId,
        #[source]
        source: TreeError,
    },
    #[error("line {line}: faction {faction} appears more than once")]
    DuplicateFaction { line: usize, faction: FactionId },
}

#[derive(Serialize)]
struct TreeRecordRef<'a> {
    faction: FactionId,
    tree: &'a TroopTree,
}

#[derive(Deserialize)]
struct TreeRecord {
    faction: FactionId,
    tree: TreeParts,
}

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush every committed tree to `troop_trees.jsonl` in `output_dir`, one
/// `{faction, tree}` record per line. Creates the directory if needed.
pub fn flush_trees_to_jsonl(store: &TreeStore, output_dir: &Path) -> Result<PathBuf, PersistError> {
    let io_err = |source| PersistError::Io {
        path: output_dir.to_path_buf(),
        source,
    };
    fs::create_dir_all(output_dir).map_err(io_err)?;

    let path = output_dir.join(TREES_FILE);
    write_jsonl(
        &path,
        store.iter().map(|(faction, tree)| TreeRecordRef { faction, tree }),
    )
    .map_err(|source| PersistError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), trees = store.len(), "troop trees flushed");
    Ok(path)
}

/// Load a store written by [`flush_trees_to_jsonl`]. Every tree is
/// revalidated; the first bad line aborts the load.
pub fn load_trees_from_jsonl(path: &Path) -> Result<TreeStore, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut store = TreeStore::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TreeRecord = serde_json::from_str(&line).map_err(|source| PersistError::Json {
            line: line_no,
            source,
        })?;
        let tree = TroopTree::from_parts(record.tree).map_err(|source| PersistError::Tree {
            line: line_no,
            faction: record.faction,
            source,
        })?;
        if store.commit(record.faction, tree).is_some() {
            return Err(PersistError::DuplicateFaction {
                line: line_no,
                faction: record.faction,
            });
        }
    }
    Ok(store)
}
