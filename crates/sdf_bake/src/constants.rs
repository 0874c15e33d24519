//! Numeric defaults and volume layout helpers.
//!
//! # Volume Layout
//!
//! ```text
//! Volume memory layout (row-major in (x, y, z), Z innermost):
//!
//! Address:  0        1        ...  nz-1       nz       ...
//! Content: [0,0,0]  [0,0,1]  ...  [0,0,nz-1] [0,1,0]  ...
//!          └──────────── Z ────────────────┘└──── Z ────
//!
//! index = (x * ny + y) * nz + z
//! ```
//!
//! # Cell Sampling
//!
//! ```text
//!   outer_min                                          outer_max
//!      │                                                   │
//!      ├────────┬────────┬────────┬─────── ... ──┬─────────┤
//!      │   ×    │   ×    │   ×    │              │    ×    │
//!      ├────────┴────────┴────────┴─────── ... ──┴─────────┤
//!      │◄──────►│                                          │
//!      cell_size = (outer_max - outer_min) / n
//!
//!   × = sample point = outer_min + cell_size * i + cell_size / 2
//! ```
//!
//! # Debug Strip Layout
//!
//! The debug strip is keyed the other way around (X innermost) to match the
//! linear invocation index of a 3D dispatch:
//!
//! ```text
//! debug_index = x + y * nx + z * nx * ny
//! ```

use glam::Vec3;

/// Ray/plane parallelism and hit-distance tolerance.
pub const DEFAULT_RAY_EPSILON: f32 = 1e-6;

/// Distance under which two ray hits are the same surface crossing.
pub const DEFAULT_DEDUP_EPSILON: f32 = 1e-6;

/// Distinct crossings recorded per voxel before recording stops.
pub const DEFAULT_INTERSECTION_CAP: usize = 100;

/// Inline capacity of an intersection set before it spills to the heap.
///
/// Closed meshes rarely produce more than a handful of crossings per ray.
pub const INLINE_CROSSINGS: usize = 16;

/// Squared sine of the smallest corner angle still treated as a real
/// triangle. `|ba × ac|² <= eps * |ba|² * |ac|²` marks a sliver or collapsed
/// triangle.
pub const DEFAULT_DEGENERATE_EPSILON: f32 = 1e-12;

/// Unsigned distance written when the mesh has no usable triangles.
pub const DEFAULT_EMPTY_DISTANCE: f32 = 1000.0;

/// Canonical classification ray direction (+Y in the grid frame).
pub const DEFAULT_RAY_DIRECTION: Vec3 = Vec3::Y;

/// Extra classification directions for majority voting.
/// Unit length, with no zero component.
pub const VOTE_DIRECTIONS: [Vec3; 2] = [
  Vec3::new(0.267_261_24, 0.534_522_5, 0.801_783_7), // (1, 2, 3) / √14
  Vec3::new(-0.742_781_4, 0.557_086, -0.371_390_7),  // (-4, 3, -2) / √29
];

/// Outer bounds scale applied around a mesh's own bounds.
pub const OUTER_BOUNDS_SCALE: f32 = 1.1;

/// Default triangles per BVH leaf.
pub const DEFAULT_MAX_TRIANGLES_PER_LEAF: usize = 4;

/// Convert 3D cell coordinates to a linear volume index.
///
/// Layout: X is major axis (stride ny * nz), Y is middle (stride nz), Z is
/// minor (stride 1).
#[inline(always)]
pub const fn coord_to_index(x: usize, y: usize, z: usize, dims: [usize; 3]) -> usize {
  (x * dims[1] + y) * dims[2] + z
}

/// Convert a linear volume index back to 3D cell coordinates.
#[inline(always)]
pub const fn index_to_coord(idx: usize, dims: [usize; 3]) -> (usize, usize, usize) {
  let z = idx % dims[2];
  let y = (idx / dims[2]) % dims[1];
  let x = idx / (dims[1] * dims[2]);
  (x, y, z)
}

/// Linear invocation index used by the debug strip (X innermost).
#[inline(always)]
pub const fn debug_index(x: usize, y: usize, z: usize, dims: [usize; 3]) -> usize {
  x + y * dims[0] + z * dims[0] * dims[1]
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
