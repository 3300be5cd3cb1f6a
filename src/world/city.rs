//! The city aggregate and the systems that (re)generate it.
//!
//! All generated scene objects are owned through the [`City`] resource:
//! the hidden ground template, the working slab it is copied into, and the
//! building ledger. Generation is full-replacement - every `GenerateCity`
//! despawns the prior working copy and buildings before spawning new ones,
//! so a re-run is the recovery path for anything that looks wrong.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

use crate::procgen::grid::GroundGrid;
use crate::procgen::layout::{self, CityError, CityLayout, CityParams};
use crate::procgen::placement::BuildingSite;
use crate::world::ground::{self, SlabParams};
use crate::world::GenerationConfig;

/// Rebuild the ground template at the given size.
#[derive(Event, Clone, Copy, Debug)]
pub struct GenerateGround {
    pub width: u32,
    pub height: u32,
}

/// Generate a full city: working ground copy, buildings, carved roads.
#[derive(Event, Clone, Copy, Debug)]
pub struct GenerateCity {
    pub width: u32,
    pub height: u32,
    pub max_height: u32,
    pub spacing: u32,
}

/// Remove every generated building, leaving the ground alone.
#[derive(Event, Clone, Copy, Debug)]
pub struct ClearCity;

/// One spawned building and the layout record behind it.
#[derive(Clone, Copy, Debug)]
pub struct BuildingRecord {
    pub site: BuildingSite,
    pub entity: Entity,
}

/// Everything the current generation owns.
///
/// Invariant: at most one template and one working surface exist; the
/// template stays hidden and pristine, the working copy and the buildings
/// are despawned and recreated wholesale on regeneration.
#[derive(Resource, Default)]
pub struct City {
    pub template: Option<Entity>,
    pub working: Option<Entity>,
    pub grid: Option<GroundGrid>,
    pub buildings: Vec<BuildingRecord>,
}

impl City {
    /// Hand back every owned entity and forget the ground entirely.
    pub fn reset_ground(&mut self) -> Vec<Entity> {
        let mut doomed = self.drop_working();
        doomed.extend(self.template.take());
        self.grid = None;
        doomed
    }

    /// Hand back the working surface and all buildings; the template stays.
    pub fn drop_working(&mut self) -> Vec<Entity> {
        let mut doomed = self.clear_buildings();
        doomed.extend(self.working.take());
        doomed
    }

    /// Hand back all building entities and empty the ledger. A no-op on an
    /// empty ledger.
    pub fn clear_buildings(&mut self) -> Vec<Entity> {
        self.buildings.drain(..).map(|record| record.entity).collect()
    }
}

pub(super) fn handle_generate_ground(
    mut commands: Commands,
    mut events: EventReader<GenerateGround>,
    mut city: ResMut<City>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in events.read() {
        let grid = match GroundGrid::new(event.width, event.height) {
            Ok(grid) => grid,
            Err(err) => {
                warn!("Ground rejected: {}", err);
                continue;
            }
        };

        for entity in city.reset_ground() {
            commands.entity(entity).despawn_recursive();
        }
        let template = spawn_template(&mut commands, &mut meshes, &mut materials, &grid);
        city.template = Some(template);
        city.grid = Some(grid);
        info!("Ground template rebuilt at {}x{}", grid.width, grid.height);
    }
}

pub(super) fn handle_generate_city(
    mut commands: Commands,
    mut events: EventReader<GenerateCity>,
    mut city: ResMut<City>,
    config: Res<GenerationConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in events.read() {
        let params = CityParams {
            width: event.width,
            height: event.height,
            max_height: event.max_height,
            spacing: event.spacing,
        };

        if city.template.is_none() {
            warn!("City rejected: {}", CityError::MissingGroundPlane);
            continue;
        }

        // Validate and compute the whole layout before touching the scene.
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layout = match layout::generate_layout(&params, &mut rng) {
            Ok(layout) => layout,
            Err(err) => {
                warn!("City rejected: {}", err);
                continue;
            }
        };

        // The working copy and buildings are always replaced; the template
        // only when the requested size no longer matches it.
        if city.grid != Some(layout.grid) {
            for entity in city.reset_ground() {
                commands.entity(entity).despawn_recursive();
            }
            let template = spawn_template(&mut commands, &mut meshes, &mut materials, &layout.grid);
            city.template = Some(template);
            city.grid = Some(layout.grid);
        } else {
            for entity in city.drop_working() {
                commands.entity(entity).despawn_recursive();
            }
        }

        let slab = config.slab_params();
        city.working = Some(spawn_working(
            &mut commands,
            &mut meshes,
            &mut materials,
            &layout,
            &slab,
        ));
        city.buildings = spawn_buildings(
            &mut commands,
            &mut meshes,
            &mut materials,
            &config,
            &layout,
            &slab,
        );

        info!(
            "Generated {} buildings on a {}x{} grid ({} removed for roads, {} faces recessed)",
            city.buildings.len(),
            layout.grid.width,
            layout.grid.height,
            layout.roads.removed_ids.len(),
            layout.roads.recessed_faces.len(),
        );
    }
}

pub(super) fn handle_clear_city(
    mut commands: Commands,
    mut events: EventReader<ClearCity>,
    mut city: ResMut<City>,
) {
    for _ in events.read() {
        let count = city.buildings.len();
        for entity in city.clear_buildings() {
            commands.entity(entity).despawn_recursive();
        }
        if count > 0 {
            info!("Cleared {} buildings", count);
        } else {
            debug!("Clear requested with no buildings present");
        }
    }
}

fn spawn_template(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    grid: &GroundGrid,
) -> Entity {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.4, 0.32),
        perceptual_roughness: 0.95,
        ..default()
    });
    commands
        .spawn((
            Mesh3d(meshes.add(ground::template_mesh(grid))),
            MeshMaterial3d(material),
            Transform::default(),
            Visibility::Hidden,
        ))
        .id()
}

fn spawn_working(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &CityLayout,
    slab: &SlabParams,
) -> Entity {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.42, 0.45, 0.38),
        perceptual_roughness: 0.95,
        ..default()
    });
    commands
        .spawn((
            Mesh3d(meshes.add(ground::working_mesh(
                &layout.grid,
                &layout.roads.recessed_faces,
                slab,
            ))),
            MeshMaterial3d(material),
            Transform::default(),
        ))
        .id()
}

// Facade palette; a tint is picked per building by sampling Perlin noise at
// the building position so neighbourhoods shade together.
const FACADE_TINTS: [Color; 5] = [
    Color::srgb(0.74, 0.48, 0.38),
    Color::srgb(0.65, 0.65, 0.65),
    Color::srgb(0.4, 0.6, 0.75),
    Color::srgb(0.55, 0.55, 0.58),
    Color::srgb(0.85, 0.78, 0.62),
];

fn spawn_buildings(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &GenerationConfig,
    layout: &CityLayout,
    slab: &SlabParams,
) -> Vec<BuildingRecord> {
    let tint_noise = Perlin::new(config.seed.unwrap_or(0) as u32);
    let mut height_meshes: HashMap<u32, Handle<Mesh>> = HashMap::new();
    let mut tint_materials: HashMap<usize, Handle<StandardMaterial>> = HashMap::new();

    let mut records = Vec::with_capacity(layout.buildings.len());
    for site in &layout.buildings {
        let mesh = height_meshes
            .entry(site.height)
            .or_insert_with(|| {
                meshes.add(Cuboid::new(
                    layout.footprint,
                    site.height as f32,
                    layout.footprint,
                ))
            })
            .clone();

        let sample = tint_noise.get([site.position.x as f64 * 0.7, site.position.y as f64 * 0.7]);
        let tint = ((sample + 1.0) / 2.0 * FACADE_TINTS.len() as f64) as usize % FACADE_TINTS.len();
        let material = tint_materials
            .entry(tint)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: FACADE_TINTS[tint],
                    perceptual_roughness: 0.85,
                    ..default()
                })
            })
            .clone();

        // Bottom face flush with the slab top.
        let entity = commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_xyz(
                    site.position.x,
                    slab.base_height + site.height as f32 / 2.0,
                    site.position.y,
                ),
            ))
            .id();
        records.push(BuildingRecord {
            site: *site,
            entity,
        });
    }
    records
}
