//! Map/combine reduction over the triangles of a single voxel.
//!
//! ```text
//!   triangles: [t0 t1 t2 t3 | t4 t5 t6 t7 | t8 ...]
//!                    │             │          │
//!          fold ─────┼─────────────┼──────────┤   (map: one accumulator
//!                    ▼             ▼          ▼    per rayon split)
//!                  acc0          acc1       acc2
//!                    └──────┬──────┘          │
//!          reduce           ▼                 │   (combine: pairwise join)
//!                         acc01 ──────┬───────┘
//!                                     ▼
//!                           nearest + ray hits
//! ```
//!
//! Both phases use [`TriangleAccumulator`]. Merging is order-independent:
//! [`Nearest::closer`] breaks ties by triangle index and hit lists are
//! sorted before deduplication, so the result matches a sequential scan
//! exactly.

use glam::Vec3;
use rayon::prelude::*;

use crate::intersect::Ray;
use crate::query::{hits_in, nearest_in, HitList, Nearest, Triangle, TriangleQuery};

/// Smallest triangle run handed to one rayon task.
const MIN_TRIANGLES_PER_TASK: usize = 256;

/// Partial result over a subset of triangles.
#[derive(Clone, Debug, Default)]
pub struct TriangleAccumulator {
  pub nearest: Option<Nearest>,
  pub hits: HitList,
}

impl TriangleAccumulator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Map step: fold one triangle in.
  #[inline]
  pub fn accumulate(mut self, triangle: &Triangle, point: Vec3, ray: Option<&Ray>, epsilon: f32) -> Self {
    self.nearest = Nearest::closer(
      self.nearest,
      Some(Nearest {
        distance_squared: triangle.distance_squared(point),
        triangle: triangle.index,
      }),
    );
    if let Some(ray) = ray {
      if let Some(t) = triangle.ray_hit(ray, epsilon) {
        self.hits.push(t);
      }
    }
    self
  }

  /// Combine step.
  #[inline]
  pub fn merge(mut self, other: Self) -> Self {
    self.nearest = Nearest::closer(self.nearest, other.nearest);
    self.hits.extend(other.hits);
    self
  }
}

/// Sequential scan of `triangles` for one point and optional ray.
pub fn scan(triangles: &[Triangle], point: Vec3, ray: Option<&Ray>, epsilon: f32) -> TriangleAccumulator {
  triangles
    .iter()
    .fold(TriangleAccumulator::new(), |acc, triangle| {
      acc.accumulate(triangle, point, ray, epsilon)
    })
}

/// Parallel fold + reduce over `triangles` for one point and optional ray.
pub fn par_scan(triangles: &[Triangle], point: Vec3, ray: Option<&Ray>, epsilon: f32) -> TriangleAccumulator {
  triangles
    .par_iter()
    .with_min_len(MIN_TRIANGLES_PER_TASK)
    .fold(TriangleAccumulator::new, |acc, triangle| {
      acc.accumulate(triangle, point, ray, epsilon)
    })
    .reduce(TriangleAccumulator::new, TriangleAccumulator::merge)
}

/// Query backend that splits every scan across the rayon pool.
#[derive(Clone, Copy, Debug)]
pub struct ParallelScan<'a> {
  triangles: &'a [Triangle],
}

impl<'a> ParallelScan<'a> {
  pub fn new(triangles: &'a [Triangle]) -> Self {
    Self { triangles }
  }
}

impl TriangleQuery for ParallelScan<'_> {
  fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  fn nearest(&self, point: Vec3) -> Option<Nearest> {
    if self.triangles.len() < MIN_TRIANGLES_PER_TASK {
      return nearest_in(self.triangles, point);
    }
    par_scan(self.triangles, point, None, 0.0).nearest
  }

  fn ray_hits(&self, ray: &Ray, epsilon: f32, hits: &mut HitList) {
    if self.triangles.len() < MIN_TRIANGLES_PER_TASK {
      hits_in(self.triangles, ray, epsilon, hits);
      return;
    }
    let partial = self
      .triangles
      .par_iter()
      .with_min_len(MIN_TRIANGLES_PER_TASK)
      .fold(HitList::new, |mut acc, triangle| {
        if let Some(t) = triangle.ray_hit(ray, epsilon) {
          acc.push(t);
        }
        acc
      })
      .reduce(HitList::new, |mut a, b| {
        a.extend(b);
        a
      });
    hits.extend(partial);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives;
  use crate::query::TriangleSet;

  fn sorted(mut hits: HitList) -> HitList {
    hits.sort_by(f32::total_cmp);
    hits
  }

  #[test]
  fn parallel_scan_matches_sequential() {
    let sphere = primitives::uv_sphere(Vec3::ZERO, 1.0, 48, 24);
    let set = TriangleSet::from_mesh(sphere.view(), 1e-12);
    assert!(set.triangle_count() > MIN_TRIANGLES_PER_TASK * 4);

    let ray = Ray::new(Vec3::new(0.1, -0.05, 0.2), Vec3::new(0.3, 0.9, 0.1).normalize());
    for point in [Vec3::ZERO, Vec3::new(0.4, 0.3, -0.2), Vec3::splat(2.0)] {
      let seq = scan(set.triangles(), point, Some(&ray), 1e-6);
      let par = par_scan(set.triangles(), point, Some(&ray), 1e-6);

      assert_eq!(seq.nearest, par.nearest);
      assert_eq!(sorted(seq.hits), sorted(par.hits));
    }
  }

  #[test]
  fn parallel_backend_matches_flat_set() {
    let sphere = primitives::uv_sphere(Vec3::ZERO, 1.0, 48, 24);
    let set = TriangleSet::from_mesh(sphere.view(), 1e-12);
    let parallel = ParallelScan::new(set.triangles());

    let point = Vec3::new(0.5, 0.9, 0.1);
    assert_eq!(set.nearest(point), parallel.nearest(point));

    let ray = Ray::new(point, Vec3::Y);
    let mut a = HitList::new();
    let mut b = HitList::new();
    set.ray_hits(&ray, 1e-6, &mut a);
    parallel.ray_hits(&ray, 1e-6, &mut b);
    assert_eq!(sorted(a), sorted(b));
  }

  #[test]
  fn merge_keeps_closer_and_all_hits() {
    let mut left = TriangleAccumulator::new();
    left.nearest = Some(Nearest { distance_squared: 2.0, triangle: 7 });
    left.hits.push(1.0);

    let mut right = TriangleAccumulator::new();
    right.nearest = Some(Nearest { distance_squared: 0.5, triangle: 9 });
    right.hits.push(3.0);

    let merged = left.merge(right);
    assert_eq!(merged.nearest.map(|n| n.triangle), Some(9));
    assert_eq!(merged.hits.len(), 2);
  }
}
