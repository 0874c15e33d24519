//! Input-contract violations that abort a bake before any cell is written.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdfError {
  #[error("index buffer length {len} is not a multiple of 3")]
  IndexCountNotMultipleOfThree { len: usize },

  #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
  IndexOutOfRange {
    triangle: usize,
    index: u32,
    vertex_count: usize,
  },

  #[error("outer bounds must satisfy min < max on every axis (min {min:?}, max {max:?})")]
  InvalidBounds { min: [f32; 3], max: [f32; 3] },

  #[error("grid resolution must be non-zero on every axis, got {dims:?}")]
  ZeroResolution { dims: [usize; 3] },

  #[error("grid resolution {dims:?} holds more cells than can be addressed")]
  ResolutionOverflow { dims: [usize; 3] },

  #[error("appended mesh would need vertex index {index}, past the u32 range")]
  VertexIndexOverflow { index: usize },

  #[error("volume holds {actual} cells, expected {expected}")]
  VolumeSizeMismatch { expected: usize, actual: usize },

  #[error("cell {cell:?} lies outside a grid of {dims:?}")]
  CellOutOfRange { cell: [usize; 3], dims: [usize; 3] },
}
