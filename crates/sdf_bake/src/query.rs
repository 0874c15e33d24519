//! Triangle sets the per-voxel queries run against.
//!
//! Preparation resolves the index buffer once per pass, drops degenerate
//! triangles and keeps each survivor's original index for tie-breaking and
//! reporting. Backends answer two questions through [`TriangleQuery`]:
//! the nearest triangle to a point, and every ray hit parameter.

use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::INLINE_CROSSINGS;
use crate::distance::{distance_squared_to_triangle, is_degenerate};
use crate::intersect::{intersect_ray_triangle, Ray};
use crate::mesh::{MeshView, VertexPosition};
use crate::types::Aabb;

/// Ray hit parameters collected for one ray, in no particular order.
pub type HitList = SmallVec<[f32; INLINE_CROSSINGS]>;

/// A resolved, non-degenerate triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
  pub corners: [Vec3; 3],
  /// Position in the source index buffer.
  pub index: usize,
}

impl Triangle {
  pub fn new(corners: [Vec3; 3], index: usize) -> Self {
    Self { corners, index }
  }

  pub fn bounds(&self) -> Aabb {
    let [a, b, c] = self.corners;
    Aabb::new(a.min(b).min(c), a.max(b).max(c))
  }

  #[inline]
  pub fn centroid(&self) -> Vec3 {
    let [a, b, c] = self.corners;
    (a + b + c) / 3.0
  }

  #[inline(always)]
  pub fn distance_squared(&self, point: Vec3) -> f32 {
    let [a, b, c] = self.corners;
    distance_squared_to_triangle(point, a, b, c)
  }

  #[inline(always)]
  pub fn ray_hit(&self, ray: &Ray, epsilon: f32) -> Option<f32> {
    let [a, b, c] = self.corners;
    intersect_ray_triangle(ray, a, b, c, epsilon)
  }
}

/// Closest triangle found so far.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
  pub distance_squared: f32,
  pub triangle: usize,
}

impl Nearest {
  /// The closer of two candidates. Equal distances resolve to the lower
  /// triangle index, so the winner never depends on visit order.
  #[inline]
  pub fn closer(a: Option<Nearest>, b: Option<Nearest>) -> Option<Nearest> {
    match (a, b) {
      (Some(x), Some(y)) => {
        let y_wins = y.distance_squared < x.distance_squared
          || (y.distance_squared == x.distance_squared && y.triangle < x.triangle);
        Some(if y_wins { y } else { x })
      }
      (x, None) => x,
      (None, y) => y,
    }
  }
}

/// Nearest-triangle and ray-hit queries over a prepared triangle set.
pub trait TriangleQuery: Sync {
  /// Triangles that take part in queries.
  fn triangle_count(&self) -> usize;

  /// Nearest triangle to `point`, `None` when the set is empty.
  fn nearest(&self, point: Vec3) -> Option<Nearest>;

  /// Append the parameter of every hit along `ray` to `hits`.
  fn ray_hits(&self, ray: &Ray, epsilon: f32, hits: &mut HitList);
}

/// Flat list of non-degenerate triangles, scanned exhaustively.
#[derive(Clone, Debug, Default)]
pub struct TriangleSet {
  triangles: Vec<Triangle>,
  source_triangles: usize,
}

impl TriangleSet {
  /// Resolve every triangle of `mesh`, skipping degenerate ones.
  ///
  /// The mesh must already be validated.
  pub fn from_mesh<V: VertexPosition>(mesh: MeshView<'_, V>, degenerate_epsilon: f32) -> Self {
    let triangles = mesh
      .triangles()
      .enumerate()
      .filter(|(_, [a, b, c])| !is_degenerate(*a, *b, *c, degenerate_epsilon))
      .map(|(index, corners)| Triangle::new(corners, index))
      .collect();

    Self {
      triangles,
      source_triangles: mesh.triangle_count(),
    }
  }

  pub fn triangles(&self) -> &[Triangle] {
    &self.triangles
  }

  pub fn into_triangles(self) -> Vec<Triangle> {
    self.triangles
  }

  /// Triangles in the source mesh, degenerate ones included.
  pub fn source_triangles(&self) -> usize {
    self.source_triangles
  }

  /// Triangles dropped as degenerate.
  pub fn degenerate_triangles(&self) -> usize {
    self.source_triangles - self.triangles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.triangles.is_empty()
  }
}

impl TriangleQuery for TriangleSet {
  fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  fn nearest(&self, point: Vec3) -> Option<Nearest> {
    nearest_in(&self.triangles, point)
  }

  fn ray_hits(&self, ray: &Ray, epsilon: f32, hits: &mut HitList) {
    hits_in(&self.triangles, ray, epsilon, hits);
  }
}

/// Sequential nearest scan over a slice.
#[inline]
pub(crate) fn nearest_in(triangles: &[Triangle], point: Vec3) -> Option<Nearest> {
  triangles.iter().fold(None, |best, triangle| {
    Nearest::closer(
      best,
      Some(Nearest {
        distance_squared: triangle.distance_squared(point),
        triangle: triangle.index,
      }),
    )
  })
}

/// Sequential ray scan over a slice.
#[inline]
pub(crate) fn hits_in(triangles: &[Triangle], ray: &Ray, epsilon: f32, hits: &mut HitList) {
  hits.extend(triangles.iter().filter_map(|triangle| triangle.ray_hit(ray, epsilon)));
}
