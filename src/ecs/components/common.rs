use bevy_ecs::component::Component;

/// Identity component present on every ECS entity that maps to a host entity.
#[derive(Component, Debug, Clone)]
pub struct SimEntity {
    pub id: u64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Marker components
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CultureMarker;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ClanMarker;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Settlement;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FieldParty;
