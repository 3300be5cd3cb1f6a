//! Lattice arithmetic for the subdivided ground plane.

use bevy::prelude::*;

use super::layout::CityError;

/// Integer dimensions of the city grid.
///
/// The ground plane spans `width x height` world units centred on the origin
/// and is subdivided into `2*width x 2*height` quads, so the lattice step is
/// 0.5 along both axes. Vertices and faces are numbered row-major from the
/// (-x, -z) corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundGrid {
    pub width: u32,
    pub height: u32,
}

impl GroundGrid {
    pub fn new(width: u32, height: u32) -> Result<Self, CityError> {
        if width == 0 || height == 0 {
            return Err(CityError::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of lattice vertices: `(2w+1)(2h+1)`.
    pub fn vertex_count(&self) -> usize {
        self.verts_per_row() * (2 * self.height as usize + 1)
    }

    /// Vertices in one full lattice row: `2w+1`.
    pub fn verts_per_row(&self) -> usize {
        2 * self.width as usize + 1
    }

    /// Half a lattice row plus one: `w+1`, the length of the seam runs the
    /// placement prune removes.
    pub fn odd_row(&self) -> usize {
        self.width as usize + 1
    }

    /// Number of quad faces: `(2w)(2h)`.
    pub fn face_count(&self) -> usize {
        self.faces_per_row() * 2 * self.height as usize
    }

    /// Faces in one lattice row: `2w`.
    pub fn faces_per_row(&self) -> usize {
        2 * self.width as usize
    }

    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    /// World-space position of lattice vertex `index`, on the XZ plane.
    pub fn vertex_position(&self, index: usize) -> Vec2 {
        let row = index / self.verts_per_row();
        let col = index % self.verts_per_row();
        Vec2::new(
            col as f32 * 0.5 - self.width as f32 / 2.0,
            row as f32 * 0.5 - self.height as f32 / 2.0,
        )
    }

    /// Min/max corners of quad face `index`, on the XZ plane.
    pub fn face_bounds(&self, index: usize) -> (Vec2, Vec2) {
        let row = index / self.faces_per_row();
        let col = index % self.faces_per_row();
        let min = Vec2::new(
            col as f32 * 0.5 - self.width as f32 / 2.0,
            row as f32 * 0.5 - self.height as f32 / 2.0,
        );
        (min, min + Vec2::splat(0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_by_five_counts() {
        let grid = GroundGrid::new(5, 5).unwrap();
        assert_eq!(grid.vertex_count(), 121);
        assert_eq!(grid.face_count(), 100);
        assert_eq!(grid.verts_per_row(), 11);
        assert_eq!(grid.odd_row(), 6);
        assert_eq!(grid.faces_per_row(), 10);
        // Every other vertex is a placement candidate.
        assert_eq!(grid.vertex_count().div_ceil(2), 61);
    }

    #[test]
    fn rectangular_counts() {
        let grid = GroundGrid::new(3, 7).unwrap();
        assert_eq!(grid.vertex_count(), 7 * 15);
        assert_eq!(grid.face_count(), 6 * 14);
        assert_eq!(grid.max_dimension(), 7);
    }

    #[test]
    fn vertex_positions_span_the_plane() {
        let grid = GroundGrid::new(5, 5).unwrap();
        assert_eq!(grid.vertex_position(0), Vec2::new(-2.5, -2.5));
        assert_eq!(grid.vertex_position(10), Vec2::new(2.5, -2.5));
        assert_eq!(grid.vertex_position(60), Vec2::ZERO);
        assert_eq!(grid.vertex_position(120), Vec2::new(2.5, 2.5));
    }

    #[test]
    fn face_bounds_are_half_unit_quads() {
        let grid = GroundGrid::new(5, 5).unwrap();
        let (min, max) = grid.face_bounds(0);
        assert_eq!(min, Vec2::new(-2.5, -2.5));
        assert_eq!(max, Vec2::new(-2.0, -2.0));
        let (min, max) = grid.face_bounds(99);
        assert_eq!(min, Vec2::new(2.0, 2.0));
        assert_eq!(max, Vec2::new(2.5, 2.5));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            GroundGrid::new(0, 5),
            Err(CityError::InvalidDimension { .. })
        ));
        assert!(matches!(
            GroundGrid::new(5, 0),
            Err(CityError::InvalidDimension { .. })
        ));
    }
}
