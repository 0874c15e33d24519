//! Dense grid geometry and the output volume.

use glam::Vec3;

use crate::constants::{coord_to_index, index_to_coord};
use crate::error::SdfError;
use crate::types::BoundingBox;

/// Cell count of `dims`, `None` if it overflows or a debug strip of that
/// many texels would exceed `isize::MAX` bytes.
pub fn checked_voxel_count(dims: [usize; 3]) -> Option<usize> {
  let count = dims.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))?;
  let bytes = count.checked_mul(std::mem::size_of::<[f32; 4]>())?;
  (bytes <= isize::MAX as usize).then_some(count)
}

/// Outer bounds split into `dims` cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
  pub bounds: BoundingBox,
  pub dims: [usize; 3],
}

impl GridSpec {
  /// Grid over `bounds`, checking the bounds and resolution.
  pub fn new(bounds: BoundingBox, dims: [usize; 3]) -> Result<Self, SdfError> {
    bounds.validate()?;
    if dims.contains(&0) {
      return Err(SdfError::ZeroResolution { dims });
    }
    checked_voxel_count(dims).ok_or(SdfError::ResolutionOverflow { dims })?;
    Ok(Self { bounds, dims })
  }

  #[inline]
  pub fn cell_size(&self) -> Vec3 {
    let [nx, ny, nz] = self.dims;
    (self.bounds.outer_max - self.bounds.outer_min) / Vec3::new(nx as f32, ny as f32, nz as f32)
  }

  /// Sample point of cell `(i, j, k)`.
  #[inline]
  pub fn cell_center(&self, i: usize, j: usize, k: usize) -> Vec3 {
    let cell = self.cell_size();
    self.bounds.outer_min + cell * Vec3::new(i as f32, j as f32, k as f32) + cell * 0.5
  }

  pub fn voxel_count(&self) -> usize {
    self.dims.iter().product()
  }

  /// Cells in one x-slab (fixed `i`).
  pub fn slab_len(&self) -> usize {
    self.dims[1] * self.dims[2]
  }

  #[inline]
  pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
    coord_to_index(i, j, k, self.dims)
  }

  #[inline]
  pub fn coord(&self, index: usize) -> [usize; 3] {
    let (i, j, k) = index_to_coord(index, self.dims);
    [i, j, k]
  }

  pub fn contains(&self, cell: [usize; 3]) -> bool {
    cell.iter().zip(self.dims.iter()).all(|(c, n)| c < n)
  }
}

/// Dense scalar volume, row-major in `(x, y, z)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
  dims: [usize; 3],
  data: Vec<f32>,
}

impl Volume {
  /// Zero-filled volume.
  ///
  /// # Panics
  /// If the cell count overflows; [`GridSpec::new`] rejects such dims first.
  pub fn new(dims: [usize; 3]) -> Self {
    Self {
      dims,
      data: vec![0.0; dims.iter().product()],
    }
  }

  /// Wrap existing cell data.
  pub fn from_data(dims: [usize; 3], data: Vec<f32>) -> Result<Self, SdfError> {
    let expected = checked_voxel_count(dims).ok_or(SdfError::ResolutionOverflow { dims })?;
    if data.len() != expected {
      return Err(SdfError::VolumeSizeMismatch {
        expected,
        actual: data.len(),
      });
    }
    Ok(Self { dims, data })
  }

  pub fn dims(&self) -> [usize; 3] {
    self.dims
  }

  pub fn data(&self) -> &[f32] {
    &self.data
  }

  pub fn data_mut(&mut self) -> &mut [f32] {
    &mut self.data
  }

  pub fn into_data(self) -> Vec<f32> {
    self.data
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  #[inline]
  pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
    coord_to_index(i, j, k, self.dims)
  }

  /// Cell value, `None` outside the grid.
  pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f32> {
    let [nx, ny, nz] = self.dims;
    if i >= nx || j >= ny || k >= nz {
      return None;
    }
    self.data.get(self.index(i, j, k)).copied()
  }

  /// Smallest and largest cell values.
  pub fn range(&self) -> Option<(f32, f32)> {
    self.data.iter().fold(None, |acc, &v| match acc {
      None => Some((v, v)),
      Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unit_grid(dims: [usize; 3]) -> GridSpec {
    GridSpec::new(BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)), dims).unwrap()
  }

  #[test]
  fn cell_centers_are_offset_by_half_a_cell() {
    let grid = unit_grid([2, 2, 2]);
    assert_eq!(grid.cell_size(), Vec3::ONE);
    assert_eq!(grid.cell_center(0, 0, 0), Vec3::splat(-0.5));
    assert_eq!(grid.cell_center(1, 0, 1), Vec3::new(0.5, -0.5, 0.5));
  }

  #[test]
  fn anisotropic_cells() {
    let grid = unit_grid([4, 2, 1]);
    assert_eq!(grid.cell_size(), Vec3::new(0.5, 1.0, 2.0));
    assert_eq!(grid.cell_center(3, 1, 0), Vec3::new(0.75, 0.5, 0.0));
    assert_eq!(grid.voxel_count(), 8);
    assert_eq!(grid.slab_len(), 2);
  }

  #[test]
  fn index_and_coord_agree() {
    let grid = unit_grid([3, 4, 5]);
    assert_eq!(grid.index(1, 2, 3), 33);
    assert_eq!(grid.coord(grid.index(2, 3, 4)), [2, 3, 4]);
  }

  #[test]
  fn rejects_bad_grids() {
    let bounds = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
    assert_eq!(
      GridSpec::new(bounds, [2, 0, 2]).unwrap_err(),
      SdfError::ZeroResolution { dims: [2, 0, 2] }
    );

    let flat = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
    assert!(matches!(
      GridSpec::new(flat, [2, 2, 2]),
      Err(SdfError::InvalidBounds { .. })
    ));
  }

  #[test]
  fn volume_access() {
    let mut volume = Volume::new([2, 3, 4]);
    assert_eq!(volume.len(), 24);
    let index = volume.index(1, 2, 3);
    volume.data_mut()[index] = -2.0;

    assert_eq!(index, 23);
    assert_eq!(volume.get(1, 2, 3), Some(-2.0));
    assert_eq!(volume.get(2, 0, 0), None);
    assert_eq!(volume.range(), Some((-2.0, 0.0)));
  }

  #[test]
  fn from_data_checks_length() {
    assert_eq!(
      Volume::from_data([2, 2, 2], vec![0.0; 7]).unwrap_err(),
      SdfError::VolumeSizeMismatch { expected: 8, actual: 7 }
    );
    assert!(Volume::from_data([2, 2, 2], vec![0.0; 8]).is_ok());
  }

  #[test]
  fn oversized_resolution_is_rejected() {
    let bounds = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    for dims in [[1 << 30; 3], [usize::MAX, 2, 1], [i32::MAX as usize; 3]] {
      assert_eq!(GridSpec::new(bounds, dims), Err(SdfError::ResolutionOverflow { dims }));
    }
    assert_eq!(
      Volume::from_data([usize::MAX, 2, 1], Vec::new()).unwrap_err(),
      SdfError::ResolutionOverflow { dims: [usize::MAX, 2, 1] }
    );
    assert_eq!(checked_voxel_count([2, 3, 4]), Some(24));
  }
}
