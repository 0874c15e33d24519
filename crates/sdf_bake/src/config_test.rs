use glam::Vec3;

use super::*;

#[test]
fn test_defaults_match_reference_constants() {
  let config = BakeConfig::default();

  assert_eq!(config.ray_epsilon, 1e-6);
  assert_eq!(config.dedup_epsilon, 1e-6);
  assert_eq!(config.intersection_cap, 100);
  assert_eq!(config.ray_direction, Vec3::Y);
  assert_eq!(config.sign_mode, SignMode::SingleRay);
  assert_eq!(config.acceleration, Acceleration::BruteForce);
  assert_eq!(config.parallel_mode, ParallelMode::PerVoxel);
  assert!(!config.debug_output);
}

#[test]
fn test_builder() {
  let config = BakeConfig::new()
    .with_intersection_cap(8)
    .with_dedup_epsilon(1e-4)
    .with_sign_mode(SignMode::MajorityVote)
    .with_acceleration(Acceleration::bvh())
    .with_parallel_mode(ParallelMode::Sequential)
    .with_empty_distance(50.0)
    .with_debug_output(true);

  assert_eq!(config.intersection_cap, 8);
  assert_eq!(config.dedup_epsilon, 1e-4);
  assert_eq!(config.sign_mode, SignMode::MajorityVote);
  assert_eq!(
    config.acceleration,
    Acceleration::Bvh {
      max_triangles_per_leaf: 4
    }
  );
  assert_eq!(config.parallel_mode, ParallelMode::Sequential);
  assert_eq!(config.empty_distance, 50.0);
  assert!(config.debug_output);
}

#[test]
fn test_primary_direction_normalizes() {
  let config = BakeConfig::new().with_ray_direction(Vec3::new(0.0, 0.0, 5.0));
  assert_eq!(config.primary_direction(), Vec3::Z);

  let zero = BakeConfig::new().with_ray_direction(Vec3::ZERO);
  assert_eq!(zero.primary_direction(), Vec3::Y);
}
