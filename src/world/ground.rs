//! Ground surface meshes.
//!
//! Two surfaces exist per city: the hidden template (a flat shared-vertex
//! subdivided plane, never edited) and the working slab it is copied into on
//! every generation. The slab's top is built from per-face quads so each road
//! face can be inset and lowered independently of its neighbours.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use std::collections::HashSet;

use crate::procgen::grid::GroundGrid;

/// Vertical and inset parameters of the working slab.
#[derive(Clone, Copy, Debug)]
pub struct SlabParams {
    /// Slab thickness; building bases sit flush with this height.
    pub base_height: f32,
    /// How far a recessed face is pulled in from its outline.
    pub recess_inset: f32,
}

impl Default for SlabParams {
    fn default() -> Self {
        Self {
            base_height: 0.25,
            recess_inset: 0.1,
        }
    }
}

impl SlabParams {
    /// How far road faces drop below the slab top. A fifth of the thickness
    /// is left so the road bed stays above the slab bottom.
    pub fn recess_depth(&self) -> f32 {
        self.base_height - self.base_height / 5.0
    }
}

/// Accumulates quads and produces a triangle-list mesh.
#[derive(Default)]
struct MeshScratch {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

impl MeshScratch {
    /// Push a planar quad wound counterclockwise when viewed from its front.
    fn push_quad(&mut self, corners: [Vec3; 4]) {
        let normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero();
        let base = self.positions.len() as u32;
        for (corner, uv) in corners.iter().zip(QUAD_UVS) {
            self.positions.push([corner.x, corner.y, corner.z]);
            self.normals.push([normal.x, normal.y, normal.z]);
            self.uvs.push(uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn into_mesh(self) -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
            .with_inserted_indices(Indices::U32(self.indices))
    }
}

/// Flat subdivided plane at y = 0 with shared lattice vertices, one vertex
/// per grid lattice point in row-major order.
pub fn template_mesh(grid: &GroundGrid) -> Mesh {
    let verts_per_row = grid.verts_per_row();
    let rows = 2 * grid.height as usize + 1;

    let mut positions = Vec::with_capacity(grid.vertex_count());
    let mut normals = Vec::with_capacity(grid.vertex_count());
    let mut uvs = Vec::with_capacity(grid.vertex_count());
    for index in 0..grid.vertex_count() {
        let pos = grid.vertex_position(index);
        positions.push([pos.x, 0.0, pos.y]);
        normals.push([0.0, 1.0, 0.0]);
        let row = index / verts_per_row;
        let col = index % verts_per_row;
        uvs.push([
            col as f32 / (verts_per_row - 1) as f32,
            row as f32 / (rows - 1) as f32,
        ]);
    }

    let mut indices = Vec::with_capacity(grid.face_count() * 6);
    for face in 0..grid.face_count() {
        let row = face / grid.faces_per_row();
        let col = face % grid.faces_per_row();
        let a = (row * verts_per_row + col) as u32;
        let b = a + 1;
        let d = a + verts_per_row as u32;
        let c = d + 1;
        indices.extend_from_slice(&[a, c, b, a, d, c]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// The working slab: per-face top quads at `base_height`, recessed road
/// faces (inset rim walls included), a perimeter skirt and a bottom cap.
pub fn working_mesh(grid: &GroundGrid, recessed: &[usize], params: &SlabParams) -> Mesh {
    let recessed: HashSet<usize> = recessed.iter().copied().collect();
    let top = params.base_height;
    let low = top - params.recess_depth();
    let inset = params.recess_inset;

    let mut scratch = MeshScratch::default();

    for face in 0..grid.face_count() {
        let (min, max) = grid.face_bounds(face);
        if !recessed.contains(&face) {
            scratch.push_quad([
                Vec3::new(min.x, top, min.y),
                Vec3::new(min.x, top, max.y),
                Vec3::new(max.x, top, max.y),
                Vec3::new(max.x, top, min.y),
            ]);
            continue;
        }

        let imin = min + Vec2::splat(inset);
        let imax = max - Vec2::splat(inset);
        // Outer rim ring at the slab top and the matching inset ring at road
        // level, both in the same counterclockwise-from-above order.
        let outer = [
            Vec3::new(min.x, top, min.y),
            Vec3::new(min.x, top, max.y),
            Vec3::new(max.x, top, max.y),
            Vec3::new(max.x, top, min.y),
        ];
        let inner = [
            Vec3::new(imin.x, low, imin.y),
            Vec3::new(imin.x, low, imax.y),
            Vec3::new(imax.x, low, imax.y),
            Vec3::new(imax.x, low, imin.y),
        ];
        scratch.push_quad(inner);
        for edge in 0..4 {
            let next = (edge + 1) % 4;
            scratch.push_quad([outer[edge], outer[next], inner[next], inner[edge]]);
        }
    }

    // Perimeter skirt down to y = 0, outward facing.
    let half_w = grid.width as f32 / 2.0;
    let half_h = grid.height as f32 / 2.0;
    scratch.push_quad([
        Vec3::new(-half_w, 0.0, half_h),
        Vec3::new(half_w, 0.0, half_h),
        Vec3::new(half_w, top, half_h),
        Vec3::new(-half_w, top, half_h),
    ]);
    scratch.push_quad([
        Vec3::new(half_w, 0.0, -half_h),
        Vec3::new(-half_w, 0.0, -half_h),
        Vec3::new(-half_w, top, -half_h),
        Vec3::new(half_w, top, -half_h),
    ]);
    scratch.push_quad([
        Vec3::new(half_w, 0.0, half_h),
        Vec3::new(half_w, 0.0, -half_h),
        Vec3::new(half_w, top, -half_h),
        Vec3::new(half_w, top, half_h),
    ]);
    scratch.push_quad([
        Vec3::new(-half_w, 0.0, -half_h),
        Vec3::new(-half_w, 0.0, half_h),
        Vec3::new(-half_w, top, half_h),
        Vec3::new(-half_w, top, -half_h),
    ]);
    // Bottom cap, facing down.
    scratch.push_quad([
        Vec3::new(-half_w, 0.0, -half_h),
        Vec3::new(half_w, 0.0, -half_h),
        Vec3::new(half_w, 0.0, half_h),
        Vec3::new(-half_w, 0.0, half_h),
    ]);

    scratch.into_mesh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn positions(mesh: &Mesh) -> &Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap() {
            VertexAttributeValues::Float32x3(positions) => positions,
            other => panic!("unexpected attribute format {:?}", other.len()),
        }
    }

    #[test]
    fn template_has_one_vertex_per_lattice_point() {
        let grid = GroundGrid::new(5, 5).unwrap();
        let mesh = template_mesh(&grid);
        assert_eq!(positions(&mesh).len(), 121);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices.len(), 100 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < 121));
    }

    #[test]
    fn flat_slab_quad_budget() {
        let grid = GroundGrid::new(5, 5).unwrap();
        let mesh = working_mesh(&grid, &[], &SlabParams::default());
        // 100 top faces + 4 skirt walls + bottom cap.
        assert_eq!(positions(&mesh).len(), 105 * 4);
    }

    #[test]
    fn recessed_faces_add_rim_geometry() {
        let grid = GroundGrid::new(5, 5).unwrap();
        let recessed = [0, 17, 99];
        let mesh = working_mesh(&grid, &recessed, &SlabParams::default());
        // Each recessed face swaps its quad for an inner quad plus 4 walls.
        assert_eq!(positions(&mesh).len(), (105 + 4 * recessed.len()) * 4);
    }

    #[test]
    fn recessed_faces_drop_below_the_top() {
        let grid = GroundGrid::new(3, 3).unwrap();
        let params = SlabParams::default();
        let mesh = working_mesh(&grid, &[5], &params);
        let road_level = params.base_height - params.recess_depth();
        let ys: Vec<f32> = positions(&mesh).iter().map(|p| p[1]).collect();
        assert!(ys.iter().any(|&y| (y - road_level).abs() < 1e-6));
        assert!(ys.iter().all(|&y| y >= -1e-6 && y <= params.base_height + 1e-6));
    }

    #[test]
    fn default_recess_depth_leaves_a_road_bed() {
        let params = SlabParams::default();
        assert!((params.recess_depth() - 0.2).abs() < 1e-6);
        assert!(params.recess_depth() < params.base_height);
    }
}
