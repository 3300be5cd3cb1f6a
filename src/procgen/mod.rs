//! Procedural city layout.
//!
//! - Lattice arithmetic over the subdivided ground plane
//! - One building per grid quadrant with randomized heights
//! - Two perpendicular road bands carved through the result
//!
//! Everything here is pure data-in/data-out and deterministic given the
//! caller's rng; the scene side of things lives in `world`.

pub mod grid;
pub mod layout;
pub mod placement;
pub mod roads;
