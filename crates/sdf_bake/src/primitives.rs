//! Simple closed meshes for testing and benchmarking.
//!
//! These shapes have exact, easy-to-verify distance fields. Use them to check
//! the kernels and the driver without a mesh loader.

use std::f32::consts::PI;

use glam::Vec3;

use crate::mesh::TriangleMesh;

/// Axis-aligned cube centered at `center`, faces at `±half_extent`.
///
/// Each face is split along one diagonal; all triangles wind outward.
pub fn cube(center: Vec3, half_extent: f32) -> TriangleMesh {
  const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
  ];

  #[rustfmt::skip]
  const INDICES: [u32; 36] = [
    0, 3, 2, 0, 2, 1, // -Z
    4, 5, 6, 4, 6, 7, // +Z
    0, 1, 5, 0, 5, 4, // -Y
    3, 7, 6, 3, 6, 2, // +Y
    0, 4, 7, 0, 7, 3, // -X
    1, 2, 6, 1, 6, 5, // +X
  ];

  let positions = CORNERS
    .iter()
    .map(|&c| center + Vec3::from_array(c) * half_extent)
    .collect();

  TriangleMesh::new(positions, INDICES.to_vec())
}

/// Regular octahedron with vertices on the axes at distance `radius`.
pub fn octahedron(center: Vec3, radius: f32) -> TriangleMesh {
  let positions = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z]
    .iter()
    .map(|&v| center + v * radius)
    .collect();

  #[rustfmt::skip]
  let indices = vec![
    0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0,
    4, 3, 0, 1, 3, 4, 5, 3, 1, 0, 3, 5,
  ];

  TriangleMesh::new(positions, indices)
}

/// Tetrahedron from four corner points (winding fixed up to face outward).
pub fn tetrahedron(corners: [Vec3; 4]) -> TriangleMesh {
  let centroid = (corners[0] + corners[1] + corners[2] + corners[3]) * 0.25;
  let mut indices = Vec::with_capacity(12);

  for [a, b, c] in [[0u32, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]] {
    let (pa, pb, pc) = (corners[a as usize], corners[b as usize], corners[c as usize]);
    let normal = (pb - pa).cross(pc - pa);
    if normal.dot(pa - centroid) >= 0.0 {
      indices.extend_from_slice(&[a, b, c]);
    } else {
      indices.extend_from_slice(&[a, c, b]);
    }
  }

  TriangleMesh::new(corners.to_vec(), indices)
}

/// Latitude/longitude sphere with poles on the Y axis.
///
/// `segments` ≥ 3 around the equator, `rings` ≥ 2 from pole to pole.
pub fn uv_sphere(center: Vec3, radius: f32, segments: u32, rings: u32) -> TriangleMesh {
  let segments = segments.max(3);
  let rings = rings.max(2);

  let mut positions = Vec::with_capacity((segments * (rings - 1) + 2) as usize);
  positions.push(center + Vec3::Y * radius);
  for ring in 1..rings {
    let phi = PI * ring as f32 / rings as f32;
    let (sin_phi, cos_phi) = phi.sin_cos();
    for seg in 0..segments {
      let theta = 2.0 * PI * seg as f32 / segments as f32;
      let (sin_theta, cos_theta) = theta.sin_cos();
      let dir = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
      positions.push(center + dir * radius);
    }
  }
  positions.push(center - Vec3::Y * radius);

  let south = positions.len() as u32 - 1;
  let ring_start = |ring: u32| 1 + (ring - 1) * segments;
  let mut indices = Vec::new();

  for seg in 0..segments {
    let next = (seg + 1) % segments;
    // North cap.
    indices.extend_from_slice(&[0, ring_start(1) + next, ring_start(1) + seg]);
    // South cap.
    let last = ring_start(rings - 1);
    indices.extend_from_slice(&[south, last + seg, last + next]);
  }

  for ring in 1..rings - 1 {
    let upper = ring_start(ring);
    let lower = ring_start(ring + 1);
    for seg in 0..segments {
      let next = (seg + 1) % segments;
      indices.extend_from_slice(&[upper + seg, upper + next, lower + next]);
      indices.extend_from_slice(&[upper + seg, lower + next, lower + seg]);
    }
  }

  TriangleMesh::new(positions, indices)
}

/// Two triangles sharing the edge `(-1, y, -1)`–`(1, y, 1)` in the plane
/// `y = height`. Open surface; used for graze tests.
pub fn shared_edge_quad(height: f32) -> TriangleMesh {
  let positions = vec![
    Vec3::new(-1.0, height, -1.0),
    Vec3::new(1.0, height, -1.0),
    Vec3::new(1.0, height, 1.0),
    Vec3::new(-1.0, height, 1.0),
  ];
  TriangleMesh::new(positions, vec![0, 3, 2, 0, 2, 1])
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Sum of signed tetrahedron volumes against the origin.
  fn enclosed_volume(mesh: &TriangleMesh) -> f32 {
    mesh
      .view()
      .triangles()
      .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
      .sum()
  }

  #[test]
  fn cube_is_closed_and_outward() {
    let mesh = cube(Vec3::ZERO, 1.0);
    assert_eq!(mesh.triangle_count(), 12);
    assert!((enclosed_volume(&mesh) - 8.0).abs() < 1e-5);
  }

  #[test]
  fn octahedron_volume() {
    let mesh = octahedron(Vec3::ZERO, 1.0);
    assert_eq!(mesh.triangle_count(), 8);
    assert!((enclosed_volume(&mesh) - 4.0 / 3.0).abs() < 1e-5);
  }

  #[test]
  fn tetrahedron_winding_is_outward() {
    let mesh = tetrahedron([
      Vec3::ZERO,
      Vec3::X,
      Vec3::Z,
      Vec3::Y,
    ]);
    assert!((enclosed_volume(&mesh) - 1.0 / 6.0).abs() < 1e-6);
  }

  #[test]
  fn uv_sphere_approaches_ball_volume() {
    let mesh = uv_sphere(Vec3::ZERO, 1.0, 32, 16);
    assert_eq!(mesh.triangle_count(), 2 * 32 + 2 * 32 * 14);

    let ball = 4.0 / 3.0 * PI;
    let volume = enclosed_volume(&mesh);
    assert!(volume > 0.0 && volume < ball);
    assert!((volume - ball).abs() / ball < 0.05);
  }

  #[test]
  fn shared_edge_quad_is_planar() {
    let mesh = shared_edge_quad(1.0);
    assert!(mesh.positions.iter().all(|p| p.y == 1.0));
    assert_eq!(mesh.triangle_count(), 2);
  }
}
