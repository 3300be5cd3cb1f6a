//! Road carving: one band of ground faces per axis, recessed into the
//! terrain, with the buildings along the band removed.
//!
//! Band starts are drawn as multiples of the axis step so a road always
//! aligns with lattice lines and never clips a building along its own axis.

use rand::Rng;
use smallvec::{smallvec, SmallVec};
use std::collections::HashSet;

use super::grid::GroundGrid;
use super::placement::BuildingSite;

/// Axis a road runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadAxis {
    /// Spans the full width of the grid: a contiguous run of face indices.
    Width,
    /// Spans the full height: a modular residue class of face indices.
    Height,
}

/// One road's worth of ground faces.
#[derive(Clone, Debug)]
pub struct RoadBand {
    pub axis: RoadAxis,
    /// Start offset of the band, always a multiple of the axis step.
    pub start: usize,
    /// Face indices the band covers.
    pub faces: Vec<usize>,
}

impl RoadBand {
    /// Stride the start offset is quantized to.
    pub fn step(&self, grid: &GroundGrid) -> usize {
        match self.axis {
            RoadAxis::Width => grid.faces_per_row() * 2,
            RoadAxis::Height => 2,
        }
    }
}

/// Outcome of carving both roads through a placed building set.
#[derive(Clone, Debug)]
pub struct CarvePlan {
    pub bands: SmallVec<[RoadBand; 2]>,
    /// Sequential ids of the buildings the roads ran through.
    pub removed_ids: Vec<usize>,
    /// Union of both bands' faces, sorted ascending.
    pub recessed_faces: Vec<usize>,
}

/// Pick one road band per axis and prune the buildings they intersect.
///
/// Runs strictly after placement renumbering: the removed ids refer to the
/// final sequential building ids. Ids absent from `buildings` (or already
/// claimed by the other pass, at the crossing cell) are skipped silently.
pub fn carve_roads(
    grid: &GroundGrid,
    buildings: &[BuildingSite],
    rng: &mut impl Rng,
) -> CarvePlan {
    let w = grid.width as usize;
    let h = grid.height as usize;

    // Width axis: one quadrant row of faces, i.e. two lattice face rows.
    let width_step = grid.faces_per_row() * 2;
    let row_start = rng.gen_range(0..h) * width_step;
    let row = row_start / width_step;
    let width_band = RoadBand {
        axis: RoadAxis::Width,
        start: row_start,
        faces: (row_start..row_start + width_step).collect(),
    };

    // Height axis: a two-face-wide residue class down every face row.
    let col_start = rng.gen_range(0..w) * 2;
    let col = col_start / 2;
    let modulus = grid.faces_per_row();
    let height_band = RoadBand {
        axis: RoadAxis::Height,
        start: col_start,
        faces: (0..grid.face_count())
            .filter(|f| {
                let m = f % modulus;
                m == col_start || m == col_start + 1
            })
            .collect(),
    };

    let placed: HashSet<usize> = buildings.iter().map(|b| b.id).collect();
    let mut claimed = HashSet::new();
    let mut removed_ids = Vec::with_capacity(w + h);
    for id in row * w..row * w + w {
        if placed.contains(&id) && claimed.insert(id) {
            removed_ids.push(id);
        }
    }
    for b in buildings {
        if b.id % w == col && claimed.insert(b.id) {
            removed_ids.push(b.id);
        }
    }

    let mut recessed: HashSet<usize> = width_band.faces.iter().copied().collect();
    recessed.extend(height_band.faces.iter().copied());
    let mut recessed_faces: Vec<usize> = recessed.into_iter().collect();
    recessed_faces.sort_unstable();

    CarvePlan {
        bands: smallvec![width_band, height_band],
        removed_ids,
        recessed_faces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::placement::place_buildings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn carve(w: u32, h: u32, seed: u64) -> (GroundGrid, Vec<BuildingSite>, CarvePlan) {
        let grid = GroundGrid::new(w, h).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let buildings = place_buildings(&grid, 3, &mut rng).unwrap();
        let plan = carve_roads(&grid, &buildings, &mut rng);
        (grid, buildings, plan)
    }

    #[test]
    fn removes_one_row_and_one_column() {
        for seed in 0..25 {
            let (grid, _, plan) = carve(5, 4, seed);
            let w = grid.width as usize;
            let h = grid.height as usize;
            // Intersection cell is claimed once, never twice.
            assert_eq!(plan.removed_ids.len(), w + h - 1, "seed {}", seed);

            let removed: HashSet<usize> = plan.removed_ids.iter().copied().collect();
            let full_row = (0..h).any(|r| (r * w..r * w + w).all(|id| removed.contains(&id)));
            let full_col = (0..w).any(|c| (0..h).map(|r| r * w + c).all(|id| removed.contains(&id)));
            assert!(full_row, "seed {}", seed);
            assert!(full_col, "seed {}", seed);
        }
    }

    #[test]
    fn band_starts_are_step_aligned() {
        for seed in 0..25 {
            let (grid, _, plan) = carve(7, 3, seed);
            for band in &plan.bands {
                assert_eq!(band.start % band.step(&grid), 0, "seed {}", seed);
            }
            let faces = grid.face_count();
            assert!(plan.bands[0].start < faces);
            assert!(plan.bands[1].start < grid.faces_per_row());
        }
    }

    #[test]
    fn recessed_union_covers_both_bands_once() {
        for seed in 0..25 {
            let (grid, _, plan) = carve(6, 5, seed);
            let w = grid.width as usize;
            let h = grid.height as usize;
            // Bands overlap in exactly four faces where the roads cross.
            assert_eq!(plan.recessed_faces.len(), 4 * w + 4 * h - 4, "seed {}", seed);
            assert!(plan.recessed_faces.windows(2).all(|p| p[0] < p[1]));
            assert!(plan.recessed_faces.iter().all(|&f| f < grid.face_count()));
        }
    }

    #[test]
    fn degenerate_single_quadrant_grid() {
        let (grid, buildings, plan) = carve(1, 1, 3);
        assert_eq!(buildings.len(), 1);
        assert_eq!(plan.removed_ids, vec![0]);
        assert_eq!(plan.recessed_faces.len(), grid.face_count());
    }

    #[test]
    fn already_absent_buildings_are_skipped() {
        let grid = GroundGrid::new(4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut buildings = place_buildings(&grid, 3, &mut rng).unwrap();
        // Someone already bulldozed half the city.
        buildings.retain(|b| b.id % 2 == 0);
        let plan = carve_roads(&grid, &buildings, &mut rng);
        let placed: HashSet<usize> = buildings.iter().map(|b| b.id).collect();
        assert!(plan.removed_ids.iter().all(|id| placed.contains(id)));
    }
}
