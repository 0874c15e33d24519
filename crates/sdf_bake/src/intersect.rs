//! Ray–triangle intersection (Möller–Trumbore).

use glam::Vec3;

/// Half-line `origin + direction * t`, `t > 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  pub origin: Vec3,
  pub direction: Vec3,
}

impl Ray {
  pub fn new(origin: Vec3, direction: Vec3) -> Self {
    Self { origin, direction }
  }

  #[inline(always)]
  pub fn at(&self, t: f32) -> Vec3 {
    self.origin + self.direction * t
  }
}

/// Ray parameter of the hit with triangle `(v0, v1, v2)`, if any.
///
/// Returns `None` when the ray is parallel to the triangle plane
/// (`|det| < epsilon`), misses the barycentric range, or hits at
/// `t <= epsilon`. Barycentric bounds are inclusive, so a ray through a
/// shared edge hits both neighbours; the classifier deduplicates.
#[inline]
pub fn intersect_ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3, epsilon: f32) -> Option<f32> {
  let e1 = v1 - v0;
  let e2 = v2 - v0;
  let h = ray.direction.cross(e2);
  let a = e1.dot(h);

  if a.abs() < epsilon {
    return None;
  }

  let f = 1.0 / a;
  let s = ray.origin - v0;
  let u = f * s.dot(h);
  if !(0.0..=1.0).contains(&u) {
    return None;
  }

  let q = s.cross(e1);
  let v = f * ray.direction.dot(q);
  if v < 0.0 || u + v > 1.0 {
    return None;
  }

  let t = f * e2.dot(q);
  (t > epsilon).then_some(t)
}

#[cfg(test)]
mod tests {
  use super::*;

  const V0: Vec3 = Vec3::new(-1.0, 2.0, -1.0);
  const V1: Vec3 = Vec3::new(1.0, 2.0, -1.0);
  const V2: Vec3 = Vec3::new(0.0, 2.0, 1.0);

  #[test]
  fn hits_triangle_above() {
    let ray = Ray::new(Vec3::ZERO, Vec3::Y);
    let t = intersect_ray_triangle(&ray, V0, V1, V2, 1e-6).unwrap();
    assert!((t - 2.0).abs() < 1e-6);
    assert!((ray.at(t) - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
  }

  #[test]
  fn hit_is_independent_of_winding() {
    let ray = Ray::new(Vec3::ZERO, Vec3::Y);
    assert!(intersect_ray_triangle(&ray, V0, V2, V1, 1e-6).is_some());
  }

  #[test]
  fn misses_behind_origin() {
    let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Y);
    assert_eq!(intersect_ray_triangle(&ray, V0, V1, V2, 1e-6), None);
  }

  #[test]
  fn misses_outside_triangle() {
    let ray = Ray::new(Vec3::new(0.9, 0.0, 0.9), Vec3::Y);
    assert_eq!(intersect_ray_triangle(&ray, V0, V1, V2, 1e-6), None);
  }

  #[test]
  fn parallel_ray_never_hits() {
    let ray = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::X);
    assert_eq!(intersect_ray_triangle(&ray, V0, V1, V2, 1e-6), None);
  }

  #[test]
  fn origin_on_surface_is_not_a_hit() {
    let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
    assert_eq!(intersect_ray_triangle(&ray, V0, V1, V2, 1e-6), None);
  }

  #[test]
  fn edge_hit_is_inclusive() {
    // Midpoint of edge v0-v1.
    let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
    assert!(intersect_ray_triangle(&ray, V0, V1, V2, 1e-6).is_some());
  }
}
