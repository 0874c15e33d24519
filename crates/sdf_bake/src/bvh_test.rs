use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::primitives;
use crate::query::TriangleSet;

fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
  Vec3::new(
    rng.random_range(-extent..extent),
    rng.random_range(-extent..extent),
    rng.random_range(-extent..extent),
  )
}

fn sorted(mut hits: HitList) -> HitList {
  hits.sort_by(f32::total_cmp);
  hits
}

fn sphere_set() -> TriangleSet {
  let sphere = primitives::uv_sphere(Vec3::new(0.2, -0.1, 0.3), 1.0, 24, 12);
  TriangleSet::from_mesh(sphere.view(), 1e-12)
}

#[test]
fn test_build_keeps_every_triangle() {
  let set = sphere_set();
  let bvh = TriangleBvh::build(set.triangles().to_vec(), 4);

  assert_eq!(bvh.triangle_count(), set.triangle_count());
  let mut indices: Vec<usize> = bvh.triangles().iter().map(|t| t.index).collect();
  indices.sort_unstable();
  let expected: Vec<usize> = set.triangles().iter().map(|t| t.index).collect();
  assert_eq!(indices, expected);
}

#[test]
fn test_tree_is_balanced() {
  let set = sphere_set();
  let count = set.triangle_count();
  let bvh = TriangleBvh::build(set.into_triangles(), 4);

  // Median splits halve every level.
  let bound = (count as f32).log2().ceil() as usize + 1;
  assert!(bvh.depth() <= bound, "depth {} > {bound}", bvh.depth());
  assert!(bvh.node_count() < 2 * count);
}

#[test]
fn test_single_leaf_for_small_input() {
  let cube = primitives::cube(Vec3::ZERO, 1.0);
  let set = TriangleSet::from_mesh(cube.view(), 1e-12);
  let bvh = TriangleBvh::build(set.into_triangles(), 64);

  assert_eq!(bvh.node_count(), 1);
  assert_eq!(bvh.depth(), 1);
}

#[test]
fn test_empty_tree() {
  let bvh = TriangleBvh::build(Vec::new(), 4);

  assert_eq!(bvh.depth(), 0);
  assert_eq!(bvh.nearest(Vec3::ZERO), None);
  let mut hits = HitList::new();
  bvh.ray_hits(&Ray::new(Vec3::ZERO, Vec3::Y), 1e-6, &mut hits);
  assert!(hits.is_empty());
}

#[test]
fn test_nearest_matches_flat_scan() {
  let set = sphere_set();
  let mut rng = StdRng::seed_from_u64(9);

  for leaf in [1, 4, 16] {
    let bvh = TriangleBvh::build(set.triangles().to_vec(), leaf);
    for _ in 0..200 {
      let point = random_point(&mut rng, 2.5);
      assert_eq!(bvh.nearest(point), set.nearest(point), "leaf {leaf}, point {point}");
    }
  }
}

#[test]
fn test_ray_hits_match_flat_scan() {
  let set = sphere_set();
  let bvh = TriangleBvh::build(set.triangles().to_vec(), 4);
  let mut rng = StdRng::seed_from_u64(10);

  for _ in 0..200 {
    let origin = random_point(&mut rng, 2.0);
    let direction = random_point(&mut rng, 1.0).try_normalize().unwrap_or(Vec3::Y);
    let ray = Ray::new(origin, direction);

    let mut flat = HitList::new();
    let mut tree = HitList::new();
    set.ray_hits(&ray, 1e-6, &mut flat);
    bvh.ray_hits(&ray, 1e-6, &mut tree);
    assert_eq!(sorted(flat), sorted(tree));
  }
}

#[test]
fn test_axis_aligned_rays_on_cube() {
  let cube = primitives::cube(Vec3::ZERO, 1.0);
  let set = TriangleSet::from_mesh(cube.view(), 1e-12);
  let bvh = TriangleBvh::build(set.triangles().to_vec(), 1);

  for origin in [Vec3::ZERO, Vec3::new(0.5, -0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)] {
    let ray = Ray::new(origin, Vec3::Y);
    let mut flat = HitList::new();
    let mut tree = HitList::new();
    set.ray_hits(&ray, 1e-6, &mut flat);
    bvh.ray_hits(&ray, 1e-6, &mut tree);
    assert_eq!(sorted(flat), sorted(tree), "origin {origin}");
  }
}
