//! Grid city generator.
//!
//! Places a block grid of randomized-height buildings on a subdivided ground
//! plane and carves two perpendicular roads through it. The layout logic in
//! [`procgen`] is pure and deterministic given an rng; [`world`] realizes a
//! layout as meshes and entities; [`ui`] is the parameter form driving it.

use bevy::prelude::*;

pub mod camera;
pub mod procgen;
pub mod ui;
pub mod world;

/// Build and run the application.
pub fn run() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Grid City".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(camera::CameraPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
