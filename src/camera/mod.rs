//! Perspective orbit camera around the city origin.
//!
//! Right-drag orbits, middle-drag pans the focus across the ground plane,
//! scroll zooms.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (camera_orbit, camera_pan, camera_zoom, apply_camera_rig).chain(),
        );
    }
}

/// Spherical rig the camera transform is derived from every frame.
#[derive(Component)]
pub struct CameraRig {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.9,
            distance: 18.0,
        }
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera3d::default(), CameraRig::default(), Transform::default()));
}

fn camera_orbit(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut rigs: Query<&mut CameraRig>,
) {
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();
    if !buttons.pressed(MouseButton::Right) || delta == Vec2::ZERO {
        return;
    }
    let Ok(mut rig) = rigs.get_single_mut() else {
        return;
    };
    rig.yaw -= delta.x * 0.005;
    rig.pitch = (rig.pitch + delta.y * 0.005).clamp(0.1, 1.5);
}

fn camera_pan(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut rigs: Query<&mut CameraRig>,
) {
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();
    if !buttons.pressed(MouseButton::Middle) || delta == Vec2::ZERO {
        return;
    }
    let Ok(mut rig) = rigs.get_single_mut() else {
        return;
    };
    let right = Quat::from_axis_angle(Vec3::Y, rig.yaw) * Vec3::X;
    let forward = Quat::from_axis_angle(Vec3::Y, rig.yaw) * Vec3::NEG_Z;
    let speed = rig.distance * 0.0015;
    rig.focus += (-delta.x * right + delta.y * forward) * speed;
}

fn camera_zoom(mut wheel: EventReader<MouseWheel>, mut rigs: Query<&mut CameraRig>) {
    let scroll: f32 = wheel.read().map(|event| event.y).sum();
    if scroll == 0.0 {
        return;
    }
    let Ok(mut rig) = rigs.get_single_mut() else {
        return;
    };
    rig.distance = (rig.distance * (1.0 - scroll * 0.1)).clamp(3.0, 80.0);
}

fn apply_camera_rig(mut rigs: Query<(&CameraRig, &mut Transform)>) {
    for (rig, mut transform) in &mut rigs {
        let rotation =
            Quat::from_axis_angle(Vec3::Y, rig.yaw) * Quat::from_axis_angle(Vec3::X, -rig.pitch);
        transform.translation = rig.focus + rotation * Vec3::new(0.0, 0.0, rig.distance);
        transform.look_at(rig.focus, Vec3::Y);
    }
}
