use glam::Vec3;

use super::*;

#[test]
fn test_vertex_record_is_tightly_packed() {
  // 4 + 4 + 2 + 4 + 4 + 4 + 4 lanes of 4 bytes.
  assert_eq!(std::mem::size_of::<Vertex>(), 26 * 4);
}

#[test]
fn test_vertex_from_position_sets_w() {
  let v = Vertex::from_position(Vec3::new(1.0, 2.0, 3.0));
  assert_eq!(v.position, [1.0, 2.0, 3.0, 1.0]);
  assert_eq!(v.weights, [0.0; 4]);
}

#[test]
fn test_aabb_encapsulate() {
  let mut aabb = Aabb::empty();
  assert!(!aabb.is_valid());

  aabb.encapsulate(Vec3::new(1.0, 2.0, 3.0));
  aabb.encapsulate(Vec3::new(-1.0, -2.0, -3.0));

  assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
  assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
  assert!(aabb.is_valid());
}

#[test]
fn test_aabb_scaled_keeps_center() {
  let aabb = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
  let scaled = aabb.scaled(1.5);

  assert_eq!(scaled.center(), aabb.center());
  assert_eq!(scaled.size(), Vec3::new(3.0, 6.0, 9.0));
}

#[test]
fn test_aabb_distance_squared() {
  let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

  assert_eq!(aabb.distance_squared(Vec3::ZERO), 0.0);
  assert_eq!(aabb.distance_squared(Vec3::new(3.0, 0.0, 0.0)), 4.0);
  assert_eq!(aabb.distance_squared(Vec3::new(2.0, 2.0, 0.0)), 2.0);
}

#[test]
fn test_aabb_ray_slab() {
  let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

  assert!(aabb.intersects_ray(Vec3::new(0.0, -5.0, 0.0), Vec3::Y));
  assert!(aabb.intersects_ray(Vec3::ZERO, Vec3::Y), "origin inside");
  assert!(!aabb.intersects_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::Y), "box behind");
  assert!(!aabb.intersects_ray(Vec3::new(2.0, -5.0, 0.0), Vec3::Y), "misses in x");
  // Origin exactly on a face plane with a zero direction component.
  assert!(aabb.intersects_ray(Vec3::new(1.0, -5.0, 1.0), Vec3::Y));
}

#[test]
fn test_flat_aabb_still_hit() {
  // Box of a face lying in the y = 1 plane.
  let aabb = Aabb::new(Vec3::new(-1.0, 1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
  assert!(aabb.intersects_ray(Vec3::new(0.5, 0.5, 0.5), Vec3::Y));
}

#[test]
fn test_bounding_box_around_mesh() {
  let mesh = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
  let bounds = BoundingBox::around_mesh_default(mesh);

  assert_eq!(bounds.inner(), mesh);
  assert!((bounds.outer_max.x - 1.1).abs() < 1e-6);
  assert!((bounds.outer_min.y + 1.1).abs() < 1e-6);
}

#[test]
fn test_bounding_box_validate() {
  assert!(BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    .validate()
    .is_ok());

  let flat = BoundingBox::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
  assert!(matches!(
    flat.validate(),
    Err(SdfError::InvalidBounds { .. })
  ));

  let nan = BoundingBox::new(Vec3::splat(f32::NAN), Vec3::splat(1.0));
  assert!(nan.validate().is_err());
}
