use bevy_ecs::resource::Resource;

use crate::model::{
    Clan, Culture, EditState, FactionId, SelectionChange, TierLimits, TreeEdit, TreeError,
    TroopTree,
};
use crate::store::TreeStore;

/// One open editing session. Present as a resource only while the editor is
/// open; the draft is the tree being edited for the selected faction.
#[derive(Resource, Debug, Clone)]
pub struct EditorSession {
    pub state: EditState,
    pub draft: TroopTree,
}

impl EditorSession {
    pub fn open(state: EditState, store: &TreeStore, limits: TierLimits) -> Self {
        let mut session = Self {
            state,
            draft: TroopTree::new(limits),
        };
        session.reload_draft(store, limits);
        session
    }

    pub fn faction(&self) -> FactionId {
        self.state.faction()
    }

    /// Start over from the faction's committed tree, or an empty one.
    pub fn reload_draft(&mut self, store: &TreeStore, limits: TierLimits) {
        self.draft = store
            .get(self.state.faction())
            .cloned()
            .unwrap_or_else(|| TroopTree::new(limits));
        self.state.focus_first_troop(Some(&self.draft));
    }

    pub fn select_culture(
        &mut self,
        culture: Option<&Culture>,
        store: &TreeStore,
        limits: TierLimits,
    ) -> SelectionChange {
        let change = self.state.select_culture(culture);
        if change.faction {
            self.reload_draft(store, limits);
        }
        change
    }

    pub fn select_clan(
        &mut self,
        clan: Option<&Clan>,
        store: &TreeStore,
        limits: TierLimits,
    ) -> SelectionChange {
        let change = self.state.select_clan(clan);
        if change.faction {
            self.reload_draft(store, limits);
        }
        change
    }

    pub fn edit(&mut self, edit: &TreeEdit) -> Result<(), TreeError> {
        edit.apply(&mut self.draft)?;
        if self
            .state
            .focused_troop()
            .is_none_or(|t| !self.draft.contains(t.as_str()))
        {
            self.state.focus_first_troop(Some(&self.draft));
        }
        Ok(())
    }
}
