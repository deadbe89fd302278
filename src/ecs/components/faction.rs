use bevy_ecs::component::Component;

use crate::model::FactionId;

/// Tree-owner identity of a culture or clan entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionIdentity(pub FactionId);
