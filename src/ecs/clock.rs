use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

/// Tick counter. Advanced at the end of each tick (in `SimPhase::Last`), so
/// every other system sees the tick it is running in.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimClock {
    pub tick_count: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.tick_count += 1;
    }
}

pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}
