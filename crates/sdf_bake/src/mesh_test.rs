use glam::{Affine3A, Quat, Vec3};

use super::*;
use crate::primitives;

#[test]
fn test_triangle_lookup_follows_indices() {
  let positions = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
  ];
  let indices = [0, 1, 2, 3, 2, 1];
  let mesh = MeshView::validated(&positions, &indices).unwrap();

  assert_eq!(mesh.triangle_count(), 2);
  assert_eq!(mesh.triangle(1), [positions[3], positions[2], positions[1]]);
  assert_eq!(mesh.triangles().count(), 2);
}

#[test]
fn test_vertex_records_read_position_only() {
  let mut vertex = Vertex::from_position(Vec3::new(1.0, 2.0, 3.0));
  vertex.normal = [9.0; 4];
  vertex.weights = [0.25; 4];
  vertex.position[3] = 1.0;

  assert_eq!(vertex.position(), Vec3::new(1.0, 2.0, 3.0));
  assert_eq!([4.0f32, 5.0, 6.0, 1.0].position(), Vec3::new(4.0, 5.0, 6.0));
  assert_eq!([7.0f32, 8.0, 9.0].position(), Vec3::new(7.0, 8.0, 9.0));
}

#[test]
fn test_rejects_partial_triangle() {
  let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
  let indices = [0, 1, 2, 0];

  assert_eq!(
    MeshView::validated(&positions, &indices).unwrap_err(),
    SdfError::IndexCountNotMultipleOfThree { len: 4 }
  );
}

#[test]
fn test_rejects_out_of_range_index() {
  let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
  let indices = [0, 1, 2, 2, 1, 3];

  assert_eq!(
    MeshView::validated(&positions, &indices).unwrap_err(),
    SdfError::IndexOutOfRange {
      triangle: 1,
      index: 3,
      vertex_count: 3
    }
  );
}

#[test]
fn test_empty_mesh_is_valid() {
  let positions: [Vec3; 0] = [];
  let mesh = MeshView::validated(&positions, &[]).unwrap();

  assert!(mesh.is_empty());
  assert!(!mesh.bounds().is_valid());
}

#[test]
fn test_bounds_ignore_unreferenced_vertices() {
  let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(100.0)];
  let indices = [0, 1, 2];
  let bounds = MeshView::new(&positions, &indices).bounds();

  assert_eq!(bounds.min, Vec3::ZERO);
  assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_owned_mesh_roundtrip_through_vertices() {
  let cube = primitives::cube(Vec3::ZERO, 1.0);
  let vertices = cube.to_vertices();
  let view = MeshView::new(&vertices, &cube.indices);

  assert_eq!(TriangleMesh::from_view(view), cube);
}

#[test]
fn test_append_rebases_indices() {
  let mut mesh = primitives::cube(Vec3::ZERO, 1.0);
  let other = primitives::cube(Vec3::new(5.0, 0.0, 0.0), 1.0);
  mesh.append(&other).unwrap();

  assert_eq!(mesh.triangle_count(), 24);
  assert_eq!(mesh.positions.len(), 16);
  assert_eq!(mesh.view().triangle(12), other.view().triangle(0));
  assert!(mesh.view().validate().is_ok());
}

#[test]
fn test_append_rejects_index_overflow() {
  let mut mesh = primitives::cube(Vec3::ZERO, 1.0);
  let before = mesh.clone();
  let other = TriangleMesh::new(vec![Vec3::ZERO; 3], vec![0, 1, u32::MAX - 3]);

  assert_eq!(
    mesh.append(&other),
    Err(SdfError::VertexIndexOverflow {
      index: u32::MAX as usize + 5
    })
  );
  assert_eq!(mesh, before);
}

#[test]
fn test_transformed_moves_bounds() {
  let cube = primitives::cube(Vec3::ZERO, 1.0);
  let transform = Affine3A::from_rotation_translation(Quat::IDENTITY, Vec3::new(0.0, 3.0, 0.0));
  let moved = cube.transformed(&transform);

  assert_eq!(moved.bounds().center(), Vec3::new(0.0, 3.0, 0.0));
  assert_eq!(moved.indices, cube.indices);
}
