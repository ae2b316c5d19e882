//! Starduel - a gravity artillery duel.
//!
//! Desktop entry point: a fixed-timestep Bevy app around the headless
//! simulation core.

use bevy::prelude::*;

use starduel::audio::AudioPlugin;
use starduel::galaxy::{Galaxy, GalaxyPlugin};
use starduel::game::GamePlugin;
use starduel::input::InputPlugin;
use starduel::physics::PhysicsPlugin;
use starduel::render::RenderPlugin;
use starduel::types::{FIELD_HEIGHT, FIELD_WIDTH, MAX_PLANETS, MIN_PLANETS, TICK_INTERVAL_MS, Tunables};
use starduel::ui::UiPlugin;

fn main() {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let bodies = MIN_PLANETS + (seed as usize) % (MAX_PLANETS - MIN_PLANETS + 1);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Starduel".into(),
                resolution: (FIELD_WIDTH as f32, FIELD_HEIGHT as f32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_seconds(TICK_INTERVAL_MS / 1000.0))
        .insert_resource(Tunables::default())
        .insert_resource(Galaxy::generate(bodies, seed))
        .add_plugins((
            GalaxyPlugin,
            PhysicsPlugin,
            GamePlugin,
            InputPlugin,
            RenderPlugin,
            AudioPlugin,
            UiPlugin,
        ))
        .run();
}
