//! Core data types shared by the baking stages.

use glam::Vec3;

use crate::constants::OUTER_BOUNDS_SCALE;
use crate::error::SdfError;

/// Full mesh vertex record, tightly packed.
///
/// Field sizes match the host-side vertex buffer, so a slice of these can be
/// handed over as-is. Only `position` is read while baking.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Position with homogeneous `w` fixed at 1.
  pub position: [f32; 4],

  /// Surface normal (unused by the distance math).
  pub normal: [f32; 4],

  pub tex_coords: [f32; 2],

  pub tangent: [f32; 4],

  pub bitangent: [f32; 4],

  /// Skinning bone indices.
  pub bone_ids: [i32; 4],

  /// Skinning weights (parallel to `bone_ids`).
  pub weights: [f32; 4],
}

impl Vertex {
  /// Vertex at `position` with every other attribute zeroed.
  pub fn from_position(position: Vec3) -> Self {
    Self {
      position: [position.x, position.y, position.z, 1.0],
      ..Self::default()
    }
  }
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: [0.0, 0.0, 0.0, 1.0],
      normal: [0.0, 1.0, 0.0, 0.0],
      tex_coords: [0.0; 2],
      tangent: [0.0; 4],
      bitangent: [0.0; 4],
      bone_ids: [0; 4],
      weights: [0.0; 4],
    }
  }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  pub min: Vec3,
  pub max: Vec3,
}

impl Aabb {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Expand AABB to include another AABB.
  #[inline]
  pub fn encapsulate_aabb(&mut self, other: &Aabb) {
    self.min = self.min.min(other.min);
    self.max = self.max.max(other.max);
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Box scaled by `factor` about its own center.
  pub fn scaled(&self, factor: f32) -> Self {
    let center = self.center();
    let half = self.size() * 0.5 * factor;
    Self::new(center - half, center + half)
  }

  /// Box grown by `margin` on every side.
  pub fn padded(&self, margin: f32) -> Self {
    Self::new(self.min - Vec3::splat(margin), self.max + Vec3::splat(margin))
  }

  /// Longest axis (0=X, 1=Y, 2=Z).
  #[inline]
  pub fn longest_axis(&self) -> usize {
    let d = self.size();
    if d.x > d.y && d.x > d.z {
      0
    } else if d.y > d.z {
      1
    } else {
      2
    }
  }

  /// Squared distance from `point` to the box (zero inside).
  #[inline]
  pub fn distance_squared(&self, point: Vec3) -> f32 {
    let outside = (self.min - point).max(point - self.max).max(Vec3::ZERO);
    outside.length_squared()
  }

  /// Slab test for a ray starting at `origin` (t >= 0).
  ///
  /// Axes where `direction` is exactly zero are checked by containment.
  pub fn intersects_ray(&self, origin: Vec3, direction: Vec3) -> bool {
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
      let o = origin[axis];
      let d = direction[axis];
      let (lo, hi) = (self.min[axis], self.max[axis]);

      if d == 0.0 {
        if o < lo || o > hi {
          return false;
        }
        continue;
      }

      let inv = 1.0 / d;
      let mut t0 = (lo - o) * inv;
      let mut t1 = (hi - o) * inv;
      if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
      }

      t_min = t_min.max(t0);
      t_max = t_max.min(t1);
      if t_min > t_max {
        return false;
      }
    }

    true
  }
}

impl Default for Aabb {
  fn default() -> Self {
    Self::empty()
  }
}

/// Region to voxelize.
///
/// `outer_*` spans the grid. `inner_*` is carried for hosts that clip or
/// skip work inside the tight mesh bounds; the distance and sign math never
/// read it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
  pub inner_min: Vec3,
  pub inner_max: Vec3,
  pub outer_min: Vec3,
  pub outer_max: Vec3,
}

impl BoundingBox {
  /// Bounds whose inner and outer boxes coincide.
  pub fn new(outer_min: Vec3, outer_max: Vec3) -> Self {
    Self {
      inner_min: outer_min,
      inner_max: outer_max,
      outer_min,
      outer_max,
    }
  }

  pub fn with_inner(mut self, inner_min: Vec3, inner_max: Vec3) -> Self {
    self.inner_min = inner_min;
    self.inner_max = inner_max;
    self
  }

  /// Inner box = mesh bounds, outer box = mesh bounds scaled about the
  /// center (1.1 leaves a band of positive cells around the surface).
  pub fn around_mesh(mesh_bounds: Aabb, scale: f32) -> Self {
    let outer = mesh_bounds.scaled(scale);
    Self {
      inner_min: mesh_bounds.min,
      inner_max: mesh_bounds.max,
      outer_min: outer.min,
      outer_max: outer.max,
    }
  }

  /// [`around_mesh`](Self::around_mesh) with the default scale.
  pub fn around_mesh_default(mesh_bounds: Aabb) -> Self {
    Self::around_mesh(mesh_bounds, OUTER_BOUNDS_SCALE)
  }

  pub fn outer(&self) -> Aabb {
    Aabb::new(self.outer_min, self.outer_max)
  }

  pub fn inner(&self) -> Aabb {
    Aabb::new(self.inner_min, self.inner_max)
  }

  /// Check `outer_min < outer_max` on every axis (and finiteness).
  pub fn validate(&self) -> Result<(), SdfError> {
    let finite = self.outer_min.is_finite() && self.outer_max.is_finite();
    if finite && self.outer_min.cmplt(self.outer_max).all() {
      Ok(())
    } else {
      Err(SdfError::InvalidBounds {
        min: self.outer_min.to_array(),
        max: self.outer_max.to_array(),
      })
    }
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
