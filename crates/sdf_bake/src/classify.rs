//! Inside/outside classification by ray-crossing parity.
//!
//! A point is inside a closed mesh when a ray from it crosses the surface
//! an odd number of times. A ray through an edge or vertex shared by
//! several triangles reports the same crossing once per triangle, so hits
//! are collapsed into an [`IntersectionSet`] before counting.
//!
//! ```text
//!        ▲ +Y
//!        │
//!   ─────●─────   shared edge: two triangle hits, one point
//!        │
//!   ─────×─────   ordinary face hit
//!        │
//!        ○ sample point  →  2 distinct crossings, even = outside
//! ```

use glam::Vec3;
use smallvec::SmallVec;

use crate::config::{BakeConfig, SignMode};
use crate::constants::{INLINE_CROSSINGS, VOTE_DIRECTIONS};
use crate::intersect::Ray;
use crate::mesh::{MeshView, VertexPosition};
use crate::query::{HitList, TriangleQuery, TriangleSet};

/// Result of offering a point to an [`IntersectionSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
  /// New crossing.
  Recorded,
  /// Within the dedup radius of a recorded crossing.
  Duplicate,
  /// New crossing, but the set is full.
  Dropped,
}

/// Distinct crossing points along one ray.
#[derive(Clone, Debug)]
pub struct IntersectionSet {
  points: SmallVec<[Vec3; INLINE_CROSSINGS]>,
  cap: usize,
  dedup_epsilon: f32,
  truncated: bool,
}

impl IntersectionSet {
  pub fn new(cap: usize, dedup_epsilon: f32) -> Self {
    Self {
      points: SmallVec::new(),
      cap,
      dedup_epsilon,
      truncated: false,
    }
  }

  pub fn from_config(config: &BakeConfig) -> Self {
    Self::new(config.intersection_cap, config.dedup_epsilon)
  }

  pub fn insert(&mut self, point: Vec3) -> InsertOutcome {
    let radius_sq = self.dedup_epsilon * self.dedup_epsilon;
    if self
      .points
      .iter()
      .any(|recorded| recorded.distance_squared(point) < radius_sq)
    {
      return InsertOutcome::Duplicate;
    }

    if self.points.len() >= self.cap {
      self.truncated = true;
      return InsertOutcome::Dropped;
    }

    self.points.push(point);
    InsertOutcome::Recorded
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn points(&self) -> &[Vec3] {
    &self.points
  }

  /// A distinct crossing was dropped because the cap was reached.
  pub fn is_truncated(&self) -> bool {
    self.truncated
  }

  /// Odd crossing count, i.e. inside.
  pub fn is_odd(&self) -> bool {
    self.points.len() % 2 == 1
  }
}

/// Deduplicated crossings of the ray from `point` along `direction`.
///
/// Hits are inserted nearest first, so which crossings survive the cap and
/// the dedup radius does not depend on triangle order.
pub fn crossings_along<Q: TriangleQuery + ?Sized>(
  point: Vec3,
  direction: Vec3,
  triangles: &Q,
  config: &BakeConfig,
) -> IntersectionSet {
  let ray = Ray::new(point, direction);
  let mut hits = HitList::new();
  triangles.ray_hits(&ray, config.ray_epsilon, &mut hits);
  hits.sort_unstable_by(f32::total_cmp);

  let mut set = IntersectionSet::from_config(config);
  for t in hits {
    set.insert(ray.at(t));
  }
  set
}

/// Sign decision for one sample point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
  pub inside: bool,
  /// Distinct crossings along the primary direction.
  pub crossings: usize,
  /// Any ray hit the intersection cap.
  pub truncated: bool,
}

/// Classify `point` according to `config.sign_mode`.
pub fn classify<Q: TriangleQuery + ?Sized>(point: Vec3, triangles: &Q, config: &BakeConfig) -> Classification {
  let primary = crossings_along(point, config.primary_direction(), triangles, config);

  match config.sign_mode {
    SignMode::SingleRay => Classification {
      inside: primary.is_odd(),
      crossings: primary.len(),
      truncated: primary.is_truncated(),
    },
    SignMode::MajorityVote => {
      let mut votes = primary.is_odd() as usize;
      let mut truncated = primary.is_truncated();
      for direction in VOTE_DIRECTIONS {
        let set = crossings_along(point, direction, triangles, config);
        votes += set.is_odd() as usize;
        truncated |= set.is_truncated();
      }
      Classification {
        inside: votes * 2 > VOTE_DIRECTIONS.len() + 1,
        crossings: primary.len(),
        truncated,
      }
    }
  }
}

/// Whether `point` is inside `mesh`, along the configured direction (or by
/// vote, per `config.sign_mode`).
///
/// Prepares the triangle set on every call; bake passes share one.
pub fn is_inside<V: VertexPosition>(point: Vec3, mesh: MeshView<'_, V>, config: &BakeConfig) -> bool {
  let triangles = TriangleSet::from_mesh(mesh, config.degenerate_epsilon);
  classify(point, &triangles, config).inside
}

/// Single-ray parity along an explicit `direction`.
pub fn is_inside_along<V: VertexPosition>(
  point: Vec3,
  mesh: MeshView<'_, V>,
  direction: Vec3,
  config: &BakeConfig,
) -> bool {
  let triangles = TriangleSet::from_mesh(mesh, config.degenerate_epsilon);
  crossings_along(point, direction, &triangles, config).is_odd()
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;
