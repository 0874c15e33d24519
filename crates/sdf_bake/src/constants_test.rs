use super::*;

#[test]
fn test_coord_to_index_roundtrip() {
  let dims = [3, 4, 5];
  for x in 0..dims[0] {
    for y in 0..dims[1] {
      for z in 0..dims[2] {
        let idx = coord_to_index(x, y, z, dims);
        assert_eq!(
          (x, y, z),
          index_to_coord(idx, dims),
          "Roundtrip failed for ({}, {}, {})",
          x,
          y,
          z
        );
      }
    }
  }
}

#[test]
fn test_z_is_innermost() {
  let dims = [2, 3, 4];
  assert_eq!(coord_to_index(0, 0, 1, dims), 1);
  assert_eq!(coord_to_index(0, 1, 0, dims), 4);
  assert_eq!(coord_to_index(1, 0, 0, dims), 12);
  assert_eq!(coord_to_index(1, 2, 3, dims), 23);
}

#[test]
fn test_debug_index_is_x_innermost() {
  let dims = [2, 3, 4];
  assert_eq!(debug_index(1, 0, 0, dims), 1);
  assert_eq!(debug_index(0, 1, 0, dims), 2);
  assert_eq!(debug_index(0, 0, 1, dims), 6);
  assert_eq!(debug_index(1, 2, 3, dims), 23);
}

#[test]
fn test_vote_directions_are_unit_and_off_axis() {
  for dir in VOTE_DIRECTIONS {
    assert!((dir.length() - 1.0).abs() < 1e-5, "{dir:?} is not unit length");
    assert!(dir.x != 0.0 && dir.y != 0.0 && dir.z != 0.0);
  }
}
