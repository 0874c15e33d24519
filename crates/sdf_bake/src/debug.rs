//! Per-voxel debug strip.
//!
//! A `voxel_count × 1` strip of RGBA texels, one per cell, addressed by
//! [`debug_index`](crate::constants::debug_index) (X innermost). Hosts upload
//! it as a 2D texture to inspect a bake without reading the volume back.
//!
//! ```text
//!   texel = [signed_distance, crossing_count, has_nearest, 1.0]
//! ```

use crate::constants::{debug_index, index_to_coord};

/// Debug payload for one cell.
#[inline]
pub fn debug_texel(signed_distance: f32, crossings: usize, has_nearest: bool) -> [f32; 4] {
  [signed_distance, crossings as f32, has_nearest as u8 as f32, 1.0]
}

/// RGBA strip keyed by debug index.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugStrip {
  dims: [usize; 3],
  texels: Vec<[f32; 4]>,
}

impl DebugStrip {
  /// Strip of zeroed texels for a grid of `dims`.
  pub fn new(dims: [usize; 3]) -> Self {
    Self {
      dims,
      texels: vec![[0.0; 4]; dims.iter().product()],
    }
  }

  /// Re-key texels stored in volume order (Z innermost).
  pub fn from_volume_order(dims: [usize; 3], texels: &[[f32; 4]]) -> Self {
    let mut strip = Self::new(dims);
    for (index, texel) in texels.iter().enumerate().take(strip.texels.len()) {
      let (x, y, z) = index_to_coord(index, dims);
      strip.texels[debug_index(x, y, z, dims)] = *texel;
    }
    strip
  }

  /// Strip width in texels.
  pub fn width(&self) -> usize {
    self.texels.len()
  }

  pub fn height(&self) -> usize {
    1
  }

  pub fn dims(&self) -> [usize; 3] {
    self.dims
  }

  pub fn texels(&self) -> &[[f32; 4]] {
    &self.texels
  }

  pub fn get(&self, x: usize, y: usize, z: usize) -> Option<[f32; 4]> {
    let [nx, ny, nz] = self.dims;
    if x >= nx || y >= ny || z >= nz {
      return None;
    }
    self.texels.get(debug_index(x, y, z, self.dims)).copied()
  }

  pub fn set(&mut self, x: usize, y: usize, z: usize, texel: [f32; 4]) {
    let index = debug_index(x, y, z, self.dims);
    if let Some(slot) = self.texels.get_mut(index) {
      *slot = texel;
    }
  }
}
