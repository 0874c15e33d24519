//! Bake driver: mesh + bounds + resolution → signed distance volume.
//!
//! ```text
//!   MeshView ──validate──► TriangleSet ──(Bvh?)──► query backend
//!                              │                        │
//!                              │ degenerate count       ▼
//!                              │          ┌─── x-slab 0 ───┐
//!   GridSpec ──────────────────┼────────► │ cell → nearest  │  rayon over
//!                              │          │      → classify │  x-slabs
//!                              │          │      → ±d       │
//!                              │          └─── x-slab n ───┘
//!                              ▼                   │
//!                           BakeStats ◄── reduce ──┘
//! ```
//!
//! Every input check happens before the first cell is written. Each cell is
//! written exactly once, by the task that owns its slab, so the output does
//! not depend on the thread count.

use glam::Vec3;
use rayon::prelude::*;

use crate::bvh::TriangleBvh;
use crate::classify::classify;
use crate::config::{Acceleration, BakeConfig, ParallelMode};
use crate::debug::{debug_texel, DebugStrip};
use crate::distance::closest_point_on_triangle;
use crate::error::SdfError;
use crate::grid::{GridSpec, Volume};
use crate::mesh::{MeshView, VertexPosition};
use crate::query::{Nearest, TriangleQuery, TriangleSet};
use crate::reduce::ParallelScan;
use crate::types::BoundingBox;

/// Counters for one bake pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BakeStats {
  pub voxels: usize,
  /// Triangles in the source mesh.
  pub triangles: usize,
  pub degenerate_triangles: usize,
  /// Voxels where a classification ray hit the intersection cap.
  pub truncated_voxels: usize,
  pub inside_voxels: usize,
  /// Wall time of the pass in microseconds.
  pub elapsed_us: u64,
}

impl BakeStats {
  fn merge(self, other: Self) -> Self {
    Self {
      voxels: self.voxels + other.voxels,
      truncated_voxels: self.truncated_voxels + other.truncated_voxels,
      inside_voxels: self.inside_voxels + other.inside_voxels,
      ..self
    }
  }
}

/// Volume, optional debug strip, and stats of a pass.
#[derive(Clone, Debug)]
pub struct BakeOutput {
  pub volume: Volume,
  pub grid: GridSpec,
  /// Present when `BakeConfig::debug_output` was set.
  pub debug: Option<DebugStrip>,
  pub stats: BakeStats,
}

/// Everything known about one evaluated cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellProbe {
  pub cell: [usize; 3],
  /// Sample point (cell center).
  pub point: Vec3,
  pub signed_distance: f32,
  pub unsigned_distance: f32,
  pub inside: bool,
  /// Distinct crossings along the primary classification ray.
  pub crossings: usize,
  pub truncated: bool,
  /// Source index of the nearest triangle.
  pub nearest_triangle: Option<usize>,
  /// Nearest surface point.
  pub closest_point: Option<Vec3>,
}

#[derive(Clone, Copy, Debug)]
struct CellSample {
  signed: f32,
  crossings: usize,
  truncated: bool,
  inside: bool,
  nearest: Option<Nearest>,
}

#[inline]
fn evaluate<Q: TriangleQuery + ?Sized>(point: Vec3, triangles: &Q, config: &BakeConfig) -> CellSample {
  let nearest = triangles.nearest(point);
  let unsigned = nearest.map_or(config.empty_distance, |n| n.distance_squared.sqrt());
  let class = classify(point, triangles, config);

  CellSample {
    signed: if class.inside { -unsigned } else { unsigned },
    crossings: class.crossings,
    truncated: class.truncated,
    inside: class.inside,
    nearest,
  }
}

/// Triangle set plus the acceleration structure chosen by the config.
struct Prepared {
  set: TriangleSet,
  bvh: Option<TriangleBvh>,
}

impl Prepared {
  fn new<V: VertexPosition>(mesh: MeshView<'_, V>, config: &BakeConfig) -> Self {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("prepare_triangles").entered();

    let set = TriangleSet::from_mesh(mesh, config.degenerate_epsilon);

    #[cfg(feature = "tracing")]
    if set.degenerate_triangles() > 0 {
      tracing::warn!(
        degenerate = set.degenerate_triangles(),
        total = set.source_triangles(),
        "skipping degenerate triangles"
      );
    }

    let bvh = match (config.acceleration, config.parallel_mode) {
      (_, ParallelMode::PerTriangle) => None,
      (Acceleration::BruteForce, _) => None,
      (Acceleration::Bvh { max_triangles_per_leaf }, _) => {
        Some(TriangleBvh::build(set.triangles().to_vec(), max_triangles_per_leaf))
      }
    };

    Self { set, bvh }
  }

  fn base_stats(&self) -> BakeStats {
    BakeStats {
      triangles: self.set.source_triangles(),
      degenerate_triangles: self.set.degenerate_triangles(),
      ..BakeStats::default()
    }
  }
}

/// Fill one x-slab. `texels`, when given, is the matching slab of the
/// debug buffer in volume order.
fn fill_slab<Q: TriangleQuery + ?Sized>(
  grid: &GridSpec,
  i: usize,
  slab: &mut [f32],
  mut texels: Option<&mut [[f32; 4]]>,
  triangles: &Q,
  config: &BakeConfig,
) -> BakeStats {
  let nz = grid.dims[2];
  let mut stats = BakeStats::default();

  for (offset, cell) in slab.iter_mut().enumerate() {
    let (j, k) = (offset / nz, offset % nz);
    let sample = evaluate(grid.cell_center(i, j, k), triangles, config);
    *cell = sample.signed;

    if let Some(texels) = texels.as_deref_mut() {
      texels[offset] = debug_texel(sample.signed, sample.crossings, sample.nearest.is_some());
    }

    stats.voxels += 1;
    stats.inside_voxels += sample.inside as usize;
    stats.truncated_voxels += sample.truncated as usize;
  }

  stats
}

fn fill_volume<Q: TriangleQuery + ?Sized>(
  grid: &GridSpec,
  data: &mut [f32],
  texels: Option<&mut [[f32; 4]]>,
  triangles: &Q,
  config: &BakeConfig,
  parallel: bool,
) -> BakeStats {
  let slab_len = grid.slab_len();

  match (texels, parallel) {
    (Some(texels), true) => data
      .par_chunks_mut(slab_len)
      .zip(texels.par_chunks_mut(slab_len))
      .enumerate()
      .map(|(i, (slab, tex))| fill_slab(grid, i, slab, Some(tex), triangles, config))
      .reduce(BakeStats::default, BakeStats::merge),
    (None, true) => data
      .par_chunks_mut(slab_len)
      .enumerate()
      .map(|(i, slab)| fill_slab(grid, i, slab, None, triangles, config))
      .reduce(BakeStats::default, BakeStats::merge),
    (Some(texels), false) => data
      .chunks_mut(slab_len)
      .zip(texels.chunks_mut(slab_len))
      .enumerate()
      .map(|(i, (slab, tex))| fill_slab(grid, i, slab, Some(tex), triangles, config))
      .fold(BakeStats::default(), BakeStats::merge),
    (None, false) => data
      .chunks_mut(slab_len)
      .enumerate()
      .map(|(i, slab)| fill_slab(grid, i, slab, None, triangles, config))
      .fold(BakeStats::default(), BakeStats::merge),
  }
}

/// Validated pass over `data`. Nothing is written if validation fails.
fn run_pass<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  grid: &GridSpec,
  data: &mut [f32],
  texels: Option<&mut [[f32; 4]]>,
  config: &BakeConfig,
) -> Result<BakeStats, SdfError> {
  use web_time::Instant;

  mesh.validate()?;
  let expected = grid.voxel_count();
  if data.len() != expected {
    return Err(SdfError::VolumeSizeMismatch {
      expected,
      actual: data.len(),
    });
  }

  #[cfg(feature = "tracing")]
  if config.debug_output && texels.is_none() {
    tracing::debug!("debug_output set on a volume-only entry point; no strip is produced");
  }

  let start = Instant::now();
  let prepared = Prepared::new(mesh, config);

  let stats = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("fill_voxels", voxels = expected).entered();

    match (&prepared.bvh, config.parallel_mode) {
      (_, ParallelMode::PerTriangle) => fill_volume(
        grid,
        data,
        texels,
        &ParallelScan::new(prepared.set.triangles()),
        config,
        false,
      ),
      (Some(bvh), mode) => fill_volume(grid, data, texels, bvh, config, mode == ParallelMode::PerVoxel),
      (None, mode) => fill_volume(grid, data, texels, &prepared.set, config, mode == ParallelMode::PerVoxel),
    }
  };

  #[cfg(feature = "tracing")]
  if stats.truncated_voxels > 0 {
    tracing::debug!(
      voxels = stats.truncated_voxels,
      cap = config.intersection_cap,
      "intersection cap reached"
    );
  }

  Ok(BakeStats {
    elapsed_us: start.elapsed().as_micros() as u64,
    ..prepared.base_stats().merge(stats)
  })
}

/// Bake `mesh` over `bounds` into a new volume of `dims` cells.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "bake::generate"))]
pub fn generate<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  bounds: &BoundingBox,
  dims: [usize; 3],
  config: &BakeConfig,
) -> Result<Volume, SdfError> {
  let grid = GridSpec::new(*bounds, dims)?;
  let mut volume = Volume::new(dims);
  run_pass(mesh, &grid, volume.data_mut(), None, config)?;
  Ok(volume)
}

/// Bake into a caller-allocated volume; resolution comes from its dims.
///
/// The debug strip is not produced here; use [`generate_timed`].
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "bake::generate_into"))]
pub fn generate_into<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  bounds: &BoundingBox,
  volume: &mut Volume,
  config: &BakeConfig,
) -> Result<BakeStats, SdfError> {
  let grid = GridSpec::new(*bounds, volume.dims())?;
  run_pass(mesh, &grid, volume.data_mut(), None, config)
}

/// Bake into a raw cell buffer laid out as `(i * ny + j) * nz + k`.
pub fn generate_into_slice<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  bounds: &BoundingBox,
  dims: [usize; 3],
  data: &mut [f32],
  config: &BakeConfig,
) -> Result<BakeStats, SdfError> {
  let grid = GridSpec::new(*bounds, dims)?;
  run_pass(mesh, &grid, data, None, config)
}

/// Bake into a new volume and return it with stats and, if enabled, the
/// debug strip.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "bake::generate_timed"))]
pub fn generate_timed<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  bounds: &BoundingBox,
  dims: [usize; 3],
  config: &BakeConfig,
) -> Result<BakeOutput, SdfError> {
  let grid = GridSpec::new(*bounds, dims)?;
  let mut volume = Volume::new(dims);

  let (stats, debug) = if config.debug_output {
    let mut texels = vec![[0.0f32; 4]; grid.voxel_count()];
    let stats = run_pass(mesh, &grid, volume.data_mut(), Some(texels.as_mut_slice()), config)?;
    (stats, Some(DebugStrip::from_volume_order(dims, &texels)))
  } else {
    (run_pass(mesh, &grid, volume.data_mut(), None, config)?, None)
  };

  Ok(BakeOutput {
    volume,
    grid,
    debug,
    stats,
  })
}

/// Evaluate a single cell with full detail.
pub fn sample_cell<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  grid: &GridSpec,
  cell: [usize; 3],
  config: &BakeConfig,
) -> Result<CellProbe, SdfError> {
  mesh.validate()?;
  grid.bounds.validate()?;
  if !grid.contains(cell) {
    return Err(SdfError::CellOutOfRange { cell, dims: grid.dims });
  }

  let set = TriangleSet::from_mesh(mesh, config.degenerate_epsilon);
  let [i, j, k] = cell;
  let point = grid.cell_center(i, j, k);

  let sample = match config.parallel_mode {
    ParallelMode::PerTriangle => evaluate(point, &ParallelScan::new(set.triangles()), config),
    _ => evaluate(point, &set, config),
  };

  let closest_point = sample.nearest.map(|n| {
    let [a, b, c] = mesh.triangle(n.triangle);
    closest_point_on_triangle(point, a, b, c)
  });

  Ok(CellProbe {
    cell,
    point,
    signed_distance: sample.signed,
    unsigned_distance: sample.signed.abs(),
    inside: sample.inside,
    crossings: sample.crossings,
    truncated: sample.truncated,
    nearest_triangle: sample.nearest.map(|n| n.triangle),
    closest_point,
  })
}

/// Bake a cubic `resolution³` volume over the mesh's own bounds scaled by
/// [`OUTER_BOUNDS_SCALE`](crate::constants::OUTER_BOUNDS_SCALE).
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "bake::bake_mesh"))]
pub fn bake_mesh<V: VertexPosition>(
  mesh: MeshView<'_, V>,
  resolution: usize,
  config: &BakeConfig,
) -> Result<BakeOutput, SdfError> {
  mesh.validate()?;
  let bounds = BoundingBox::around_mesh_default(mesh.bounds());
  generate_timed(mesh, &bounds, [resolution; 3], config)
}

/// One volume per mesh of a model, in input order.
///
/// Stops at the first mesh that fails validation.
pub fn bake_meshes<V: VertexPosition>(
  meshes: &[MeshView<'_, V>],
  resolution: usize,
  config: &BakeConfig,
) -> Result<Vec<BakeOutput>, SdfError> {
  meshes
    .iter()
    .map(|mesh| bake_mesh(*mesh, resolution, config))
    .collect()
}

#[cfg(test)]
#[path = "bake_test.rs"]
mod bake_test;
