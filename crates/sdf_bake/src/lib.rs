//! sdf_bake - Triangle mesh to dense signed distance volume
//!
//! This crate converts a closed triangle mesh into a regular 3D grid where
//! every cell holds the signed distance from its center to the nearest
//! point of the surface: negative inside, positive outside. The result is
//! the kind of volume a sphere tracer or collision query samples directly.
//!
//! # Features
//!
//! - **Exact unsigned distance**: closest-region point/triangle kernel on
//!   squared distances
//! - **Parity classification**: Möller–Trumbore ray casts with crossing
//!   deduplication for rays through shared edges and vertices
//! - **Deterministic parallel bakes**: rayon over x-slabs, or a fold/reduce
//!   over triangles for tiny grids and huge meshes
//! - **Optional BVH**: same answers as the brute-force scan, fewer
//!   kernel evaluations
//! - **Debug strip**: per-voxel RGBA side channel for inspection
//!
//! # Example
//!
//! ```ignore
//! use sdf_bake::{generate, primitives, BakeConfig, BoundingBox};
//! use glam::Vec3;
//!
//! let cube = primitives::cube(Vec3::ZERO, 1.0);
//! let bounds = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
//! let volume = generate(cube.view(), &bounds, [2, 2, 2], &BakeConfig::default())?;
//!
//! // Every cell center is 0.5 inside the nearest face.
//! assert!(volume.data().iter().all(|&d| d == -0.5));
//! ```

pub mod constants;
pub mod error;
pub mod types;
pub mod config;

pub use constants::{coord_to_index, debug_index, index_to_coord};
pub use error::SdfError;
pub use types::{Aabb, BoundingBox, Vertex};
pub use config::{Acceleration, BakeConfig, ParallelMode, SignMode};

// Geometry model
pub mod mesh;
pub mod primitives;
pub use mesh::{MeshView, TriangleMesh, VertexPosition};

// Kernels
pub mod distance;
pub mod intersect;
pub use distance::{distance_squared_to_triangle, distance_to_triangle, is_degenerate};
pub use intersect::{intersect_ray_triangle, Ray};

// Triangle queries
pub mod bvh;
pub mod query;
pub mod reduce;
pub use bvh::TriangleBvh;
pub use query::{Nearest, Triangle, TriangleQuery, TriangleSet};

// Sign classification
pub mod classify;
pub use classify::{is_inside, is_inside_along, Classification, InsertOutcome, IntersectionSet};

// Grid driver
pub mod bake;
pub mod debug;
pub mod grid;
pub use bake::{
  bake_mesh, bake_meshes, generate, generate_into, generate_into_slice, generate_timed, sample_cell,
  BakeOutput, BakeStats, CellProbe,
};
pub use debug::DebugStrip;
pub use grid::{GridSpec, Volume};

// Background baking
pub mod async_bake;
pub use async_bake::{AsyncBaker, BakeRequest, BakeResult};
