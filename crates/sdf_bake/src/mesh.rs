//! Read-only mesh views.
//!
//! A mesh is an ordered vertex sequence plus a flat `u32` index list where
//! triangle `t` is `(indices[3t], indices[3t + 1], indices[3t + 2])`. The
//! baker never owns host geometry: it borrows it through [`MeshView`] for the
//! duration of a pass.

use glam::{Affine3A, Vec3};

use crate::error::SdfError;
use crate::types::{Aabb, Vertex};

/// Anything that carries a 3D position.
pub trait VertexPosition: Sync {
  fn position(&self) -> Vec3;
}

impl VertexPosition for Vertex {
  #[inline(always)]
  fn position(&self) -> Vec3 {
    Vec3::new(self.position[0], self.position[1], self.position[2])
  }
}

impl VertexPosition for Vec3 {
  #[inline(always)]
  fn position(&self) -> Vec3 {
    *self
  }
}

impl VertexPosition for [f32; 3] {
  #[inline(always)]
  fn position(&self) -> Vec3 {
    Vec3::from_array(*self)
  }
}

impl VertexPosition for [f32; 4] {
  #[inline(always)]
  fn position(&self) -> Vec3 {
    Vec3::new(self[0], self[1], self[2])
  }
}

/// Borrowed vertices + triangle indices.
#[derive(Debug)]
pub struct MeshView<'a, V = Vertex> {
  vertices: &'a [V],
  indices: &'a [u32],
}

impl<V> Clone for MeshView<'_, V> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<V> Copy for MeshView<'_, V> {}

impl<'a, V: VertexPosition> MeshView<'a, V> {
  /// Wrap buffers without checking them. Bake entry points validate before
  /// reading any triangle.
  pub fn new(vertices: &'a [V], indices: &'a [u32]) -> Self {
    Self { vertices, indices }
  }

  /// Wrap buffers, rejecting malformed index lists up front.
  pub fn validated(vertices: &'a [V], indices: &'a [u32]) -> Result<Self, SdfError> {
    let view = Self::new(vertices, indices);
    view.validate()?;
    Ok(view)
  }

  /// Check that the index list has whole triangles and every index is in
  /// range.
  pub fn validate(&self) -> Result<(), SdfError> {
    if self.indices.len() % 3 != 0 {
      return Err(SdfError::IndexCountNotMultipleOfThree {
        len: self.indices.len(),
      });
    }

    let vertex_count = self.vertices.len();
    for (i, &index) in self.indices.iter().enumerate() {
      if index as usize >= vertex_count {
        return Err(SdfError::IndexOutOfRange {
          triangle: i / 3,
          index,
          vertex_count,
        });
      }
    }

    Ok(())
  }

  pub fn vertices(&self) -> &'a [V] {
    self.vertices
  }

  pub fn indices(&self) -> &'a [u32] {
    self.indices
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  /// Number of whole triangles in the index list.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.triangle_count() == 0
  }

  /// Corner positions of triangle `t`.
  ///
  /// # Panics
  /// If `t` or one of its indices is out of range; call [`validate`] first.
  ///
  /// [`validate`]: Self::validate
  #[inline]
  pub fn triangle(&self, t: usize) -> [Vec3; 3] {
    let base = t * 3;
    [
      self.vertices[self.indices[base] as usize].position(),
      self.vertices[self.indices[base + 1] as usize].position(),
      self.vertices[self.indices[base + 2] as usize].position(),
    ]
  }

  /// Iterate triangles in index order.
  pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
    (0..self.triangle_count()).map(move |t| self.triangle(t))
  }

  /// Bounds of every vertex referenced by a triangle.
  ///
  /// Empty (inverted) for a mesh without triangles.
  pub fn bounds(&self) -> Aabb {
    let mut aabb = Aabb::empty();
    for &index in &self.indices[..self.triangle_count() * 3] {
      if let Some(v) = self.vertices.get(index as usize) {
        aabb.encapsulate(v.position());
      }
    }
    aabb
  }
}

/// Owned positions + indices.
///
/// Used as the `'static` payload for background bakes and by the shape
/// generators in [`crate::primitives`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
  pub positions: Vec<Vec3>,
  pub indices: Vec<u32>,
}

impl TriangleMesh {
  pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
    Self { positions, indices }
  }

  /// Copy positions out of any vertex slice.
  pub fn from_view<V: VertexPosition>(view: MeshView<'_, V>) -> Self {
    Self {
      positions: view.vertices().iter().map(VertexPosition::position).collect(),
      indices: view.indices().to_vec(),
    }
  }

  pub fn view(&self) -> MeshView<'_, Vec3> {
    MeshView::new(&self.positions, &self.indices)
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn bounds(&self) -> Aabb {
    self.view().bounds()
  }

  /// Same topology with every position mapped through `transform`.
  pub fn transformed(&self, transform: &Affine3A) -> Self {
    Self {
      positions: self
        .positions
        .iter()
        .map(|&p| transform.transform_point3(p))
        .collect(),
      indices: self.indices.clone(),
    }
  }

  /// Append another mesh, re-basing its indices.
  ///
  /// Fails without touching `self` if a re-based index leaves the `u32`
  /// range.
  pub fn append(&mut self, other: &TriangleMesh) -> Result<(), SdfError> {
    let base = self.positions.len();
    let overflow = |i: u32| SdfError::VertexIndexOverflow {
      index: base.saturating_add(i as usize),
    };
    let offset = u32::try_from(base).map_err(|_| overflow(0))?;
    let rebased = other
      .indices
      .iter()
      .map(|&i| i.checked_add(offset).ok_or_else(|| overflow(i)))
      .collect::<Result<Vec<_>, _>>()?;

    self.positions.extend_from_slice(&other.positions);
    self.indices.extend(rebased);
    Ok(())
  }

  /// Full vertex records for hosts that want the packed layout.
  pub fn to_vertices(&self) -> Vec<Vertex> {
    self.positions.iter().map(|&p| Vertex::from_position(p)).collect()
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
