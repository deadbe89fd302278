use bevy_app::App;
use bevy_ecs::message::Messages;

use crate::ecs::commands::EditorCommand;
use crate::ecs::events::EditorEvent;
use crate::ecs::schedule::SimTick;

/// Run `n` ticks.
pub fn tick(app: &mut App, n: u32) {
    for _ in 0..n {
        app.world_mut().run_schedule(SimTick);
    }
}

/// Queue editor commands for the next tick.
pub fn send(app: &mut App, commands: impl IntoIterator<Item = EditorCommand>) {
    let mut messages = app.world_mut().resource_mut::<Messages<EditorCommand>>();
    for cmd in commands {
        messages.write(cmd);
    }
}

/// Queue commands, run one tick, and return the events it produced.
pub fn run_commands(app: &mut App, commands: impl IntoIterator<Item = EditorCommand>) -> Vec<EditorEvent> {
    send(app, commands);
    tick(app, 1);
    app.world_mut()
        .resource_mut::<Messages<EditorEvent>>()
        .drain()
        .collect()
}
