//! Bake configuration.

use glam::Vec3;

use crate::constants::{
  DEFAULT_DEDUP_EPSILON, DEFAULT_DEGENERATE_EPSILON, DEFAULT_EMPTY_DISTANCE,
  DEFAULT_INTERSECTION_CAP, DEFAULT_MAX_TRIANGLES_PER_LEAF, DEFAULT_RAY_DIRECTION,
  DEFAULT_RAY_EPSILON,
};

/// How the inside/outside sign is decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SignMode {
  /// One parity ray along `BakeConfig::ray_direction`.
  #[default]
  SingleRay,

  /// Parity along `ray_direction` plus two fixed off-axis directions; the
  /// majority of the three votes wins. Tolerates one grazing ray.
  MajorityVote,
}

/// Triangle query backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Acceleration {
  /// Every triangle for every voxel.
  #[default]
  BruteForce,

  /// Bounding volume hierarchy over the triangles.
  Bvh {
    /// Leaf size; leaves are split until they hold at most this many.
    max_triangles_per_leaf: usize,
  },
}

impl Acceleration {
  /// BVH with the default leaf size.
  pub fn bvh() -> Self {
    Acceleration::Bvh {
      max_triangles_per_leaf: DEFAULT_MAX_TRIANGLES_PER_LEAF,
    }
  }
}

/// Where parallelism is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParallelMode {
  /// Parallel over x-slabs of the volume, triangles scanned sequentially
  /// per voxel.
  #[default]
  PerVoxel,

  /// Voxels sequential, each voxel's triangle scan split into a parallel
  /// fold + reduce. Suits tiny grids over huge meshes (single-cell probes).
  PerTriangle,

  /// Everything on the calling thread.
  Sequential,
}

/// Configuration for a bake pass.
#[derive(Clone, Debug, PartialEq)]
pub struct BakeConfig {
  /// Parallel-plane and minimum hit distance for the ray test.
  pub ray_epsilon: f32,

  /// Hits closer than this are one crossing.
  pub dedup_epsilon: f32,

  /// Distinct crossings recorded per voxel.
  pub intersection_cap: usize,

  /// Classification ray direction (normalized on use).
  pub ray_direction: Vec3,

  pub sign_mode: SignMode,

  pub acceleration: Acceleration,

  pub parallel_mode: ParallelMode,

  /// Unsigned distance used when no triangle contributes.
  pub empty_distance: f32,

  /// Near-zero-area threshold, see [`crate::distance::is_degenerate`].
  pub degenerate_epsilon: f32,

  /// Fill the debug strip alongside the volume.
  ///
  /// Only [`generate_timed`](crate::bake::generate_timed) and the entry
  /// points built on it return a strip. `generate`, `generate_into` and
  /// `generate_into_slice` write the volume alone and ignore this flag.
  pub debug_output: bool,
}

impl Default for BakeConfig {
  fn default() -> Self {
    Self {
      ray_epsilon: DEFAULT_RAY_EPSILON,
      dedup_epsilon: DEFAULT_DEDUP_EPSILON,
      intersection_cap: DEFAULT_INTERSECTION_CAP,
      ray_direction: DEFAULT_RAY_DIRECTION,
      sign_mode: SignMode::default(),
      acceleration: Acceleration::default(),
      parallel_mode: ParallelMode::default(),
      empty_distance: DEFAULT_EMPTY_DISTANCE,
      degenerate_epsilon: DEFAULT_DEGENERATE_EPSILON,
      debug_output: false,
    }
  }
}

impl BakeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_ray_epsilon(mut self, epsilon: f32) -> Self {
    self.ray_epsilon = epsilon;
    self
  }

  pub fn with_dedup_epsilon(mut self, epsilon: f32) -> Self {
    self.dedup_epsilon = epsilon;
    self
  }

  pub fn with_intersection_cap(mut self, cap: usize) -> Self {
    self.intersection_cap = cap;
    self
  }

  pub fn with_ray_direction(mut self, direction: Vec3) -> Self {
    self.ray_direction = direction;
    self
  }

  pub fn with_sign_mode(mut self, mode: SignMode) -> Self {
    self.sign_mode = mode;
    self
  }

  pub fn with_acceleration(mut self, acceleration: Acceleration) -> Self {
    self.acceleration = acceleration;
    self
  }

  pub fn with_parallel_mode(mut self, mode: ParallelMode) -> Self {
    self.parallel_mode = mode;
    self
  }

  pub fn with_empty_distance(mut self, distance: f32) -> Self {
    self.empty_distance = distance;
    self
  }

  pub fn with_degenerate_epsilon(mut self, epsilon: f32) -> Self {
    self.degenerate_epsilon = epsilon;
    self
  }

  pub fn with_debug_output(mut self, enabled: bool) -> Self {
    self.debug_output = enabled;
    self
  }

  /// Normalized classification direction, falling back to +Y for a zero or
  /// non-finite vector.
  pub fn primary_direction(&self) -> Vec3 {
    self.ray_direction.try_normalize().unwrap_or(DEFAULT_RAY_DIRECTION)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
