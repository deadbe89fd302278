use super::faction::{Clan, ClanId, Culture, CultureId, FactionId};
use super::tree::TroopTree;
use super::troop::TroopId;

/// Which parts of the selection moved during a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionChange {
    pub culture: bool,
    pub clan: bool,
    pub faction: bool,
}

impl SelectionChange {
    pub fn is_noop(&self) -> bool {
        !(self.culture || self.clan || self.faction)
    }
}

/// Editor selection for one session: the culture being browsed, the clan
/// within it (if any), and the faction whose tree is being edited.
///
/// `faction` is always the selected clan when there is one, otherwise the
/// selected culture, and `culture` is always that entity's culture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    culture: CultureId,
    clan: Option<ClanId>,
    faction: FactionId,
    focused_troop: Option<TroopId>,
}

impl EditState {
    /// Start a session editing a culture's default tree.
    pub fn for_culture(culture: &Culture) -> Self {
        Self {
            culture: culture.id,
            clan: None,
            faction: culture.faction(),
            focused_troop: None,
        }
    }

    /// Start a session editing a clan's tree.
    pub fn for_clan(clan: &Clan) -> Self {
        Self {
            culture: clan.culture,
            clan: Some(clan.id),
            faction: clan.faction(),
            focused_troop: None,
        }
    }

    pub fn culture(&self) -> CultureId {
        self.culture
    }

    pub fn clan(&self) -> Option<ClanId> {
        self.clan
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    pub fn focused_troop(&self) -> Option<&TroopId> {
        self.focused_troop.as_ref()
    }

    /// Edit a culture's default tree. Absent input, or the culture already
    /// being the edit target, leaves the state untouched.
    pub fn select_culture(&mut self, culture: Option<&Culture>) -> SelectionChange {
        let mut change = SelectionChange::default();
        let Some(culture) = culture else {
            return change;
        };
        if self.faction == culture.faction() {
            return change;
        }

        if self.clan.take().is_some() {
            change.clan = true;
        }
        if self.culture != culture.id {
            self.culture = culture.id;
            change.culture = true;
        }
        self.faction = culture.faction();
        self.focused_troop = None;
        change.faction = true;
        change
    }

    /// Edit a clan's tree, following the clan into its own culture.
    pub fn select_clan(&mut self, clan: Option<&Clan>) -> SelectionChange {
        let mut change = SelectionChange::default();
        let Some(clan) = clan else {
            return change;
        };
        if self.faction == clan.faction() {
            return change;
        }

        if self.culture != clan.culture {
            self.culture = clan.culture;
            change.culture = true;
        }
        if self.clan != Some(clan.id) {
            self.clan = Some(clan.id);
            change.clan = true;
        }
        self.faction = clan.faction();
        self.focused_troop = None;
        change.faction = true;
        change
    }

    /// Focus the first troop of the edited faction's tree, if it has one.
    pub fn focus_first_troop(&mut self, tree: Option<&TroopTree>) {
        self.focused_troop = tree
            .and_then(|t| t.breadth_first().into_iter().next())
            .map(|n| n.id.clone());
    }

    /// Focus a specific troop; ignored when the tree does not define it.
    pub fn focus_troop(&mut self, tree: &TroopTree, troop: &str) -> bool {
        if !tree.contains(troop) {
            return false;
        }
        self.focused_troop = Some(TroopId::new(troop));
        true
    }
}
