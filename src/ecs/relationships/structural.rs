use std::ops::Deref;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

// ---------------------------------------------------------------------------
// OwnedBy: settlement/party → culture or clan
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = OwnedHolders)]
pub struct OwnedBy(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = OwnedBy)]
pub struct OwnedHolders(Vec<Entity>);

impl Deref for OwnedHolders {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ClanOf: clan → culture
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = CultureClans)]
pub struct ClanOf(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = ClanOf)]
pub struct CultureClans(Vec<Entity>);

impl Deref for CultureClans {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
