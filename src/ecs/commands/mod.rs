pub mod applicator;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::model::{FactionId, TreeEdit, TroopTree};

pub use applicator::{apply_editor_commands, commit_tree};

/// An operator request against the editor.
///
/// The view layer writes these via `MessageWriter<EditorCommand>`. The
/// applicator in `SimPhase::PostUpdate` processes them in order and reports
/// through `EditorEvent` messages.
#[derive(Message, Clone, Debug)]
pub enum EditorCommand {
    /// Open a session on a culture or clan entity. Replaces any open session.
    OpenSession { target: Entity },
    CloseSession,
    SelectCulture(Entity),
    SelectClan(Entity),
    /// Apply one edit to the session draft.
    Edit(TreeEdit),
    /// Commit the session draft for the session's faction.
    CommitDraft,
    /// Commit a tree built outside the session.
    Commit { faction: FactionId, tree: TroopTree },
}
