use bevy_ecs::message::Message;

use crate::model::{FactionId, SelectionChange, TreeEdit, TreeError};
use crate::sync::SyncSummary;

/// Outcomes emitted by the editor command applicator, for the view layer.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum EditorEvent {
    SessionOpened {
        faction: FactionId,
    },
    SessionClosed,
    /// Only emitted when something actually changed.
    SelectionChanged {
        faction: FactionId,
        change: SelectionChange,
    },
    EditRejected {
        edit: TreeEdit,
        error: TreeError,
    },
    TreeCommitted {
        faction: FactionId,
        summary: SyncSummary,
    },
}
