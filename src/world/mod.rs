//! Scene-side realization of generated city layouts.

use bevy::prelude::*;

pub mod city;
pub mod ground;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<city::City>()
            .init_resource::<GenerationConfig>()
            .add_event::<city::GenerateGround>()
            .add_event::<city::GenerateCity>()
            .add_event::<city::ClearCity>()
            .add_systems(Startup, setup_lighting)
            .add_systems(
                Update,
                (
                    city::handle_generate_ground,
                    city::handle_generate_city,
                    city::handle_clear_city,
                )
                    .chain(),
            );
    }
}

/// Generation knobs that are not part of the parameter form.
#[derive(Resource)]
pub struct GenerationConfig {
    /// Fixed rng seed for reproducible layouts; `None` seeds from entropy,
    /// so repeated generations differ within a session.
    pub seed: Option<u64>,
    /// Ground slab thickness; building bases sit on top of it.
    pub base_height: f32,
    /// Inset applied to road faces when they are recessed.
    pub recess_inset: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            base_height: 0.25,
            recess_inset: 0.1,
        }
    }
}

impl GenerationConfig {
    pub fn slab_params(&self) -> ground::SlabParams {
        ground::SlabParams {
            base_height: self.base_height,
            recess_inset: self.recess_inset,
        }
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
    });
}
