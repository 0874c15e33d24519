//! C ABI bridge for sdf_bake.
//!
//! The host owns every buffer: it passes vertex and index arrays, a bounds
//! block, and a destination `f32` array sized for the grid; Rust fills it
//! and returns a status code. Nothing is retained between calls.
//!
//! # Architecture
//!
//! ```text
//! Host (C / C# / C++)                  Rust (sdf_bake_ffi)
//! ┌──────────────────────┐             ┌──────────────────────────┐
//! │ vertex buffer        │  pointers   │ MeshView<Vertex>         │
//! │ index buffer   ──────┼───────────► │  validate()              │
//! │ FfiBoundingBox       │             │ GridSpec from buffer_size│
//! │ float[nx*ny*nz] ◄────┼──────────── │ generate_into_slice()    │
//! │                      │   status    │                          │
//! └──────────────────────┘             └──────────────────────────┘
//! ```
//!
//! # Status codes
//!
//! | code | meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | success                                   |
//! | -1   | required pointer is null                  |
//! | -2   | malformed index buffer                    |
//! | -3   | invalid bounds, resolution, or cell       |
//! |      | (including cell counts that overflow)     |
//! | -4   | output buffer too small                   |

use glam::Vec3;

use sdf_bake::{
    generate_into_slice, generate_timed, sample_cell, Acceleration, BakeConfig, BakeStats,
    BoundingBox, GridSpec, MeshView, ParallelMode, SdfError, SignMode, Vertex,
};

pub const STATUS_OK: i32 = 0;
pub const STATUS_NULL_POINTER: i32 = -1;
pub const STATUS_INVALID_MESH: i32 = -2;
pub const STATUS_INVALID_GRID: i32 = -3;
pub const STATUS_BUFFER_TOO_SMALL: i32 = -4;

// =============================================================================
// FFI Types
// =============================================================================

/// Bounds block, laid out like the std140 uniform block hosts already
/// upload for their shaders.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FfiBoundingBox {
    /// Grid resolution in `xyz`; `w` is ignored.
    pub buffer_size: [i32; 4],
    pub inner_bb_min: [f32; 4],
    pub inner_bb_max: [f32; 4],
    pub outer_bb_min: [f32; 4],
    pub outer_bb_max: [f32; 4],
}

impl FfiBoundingBox {
    /// Grid resolution, `None` if any axis is not positive.
    pub fn dims(&self) -> Option<[usize; 3]> {
        let [x, y, z, _] = self.buffer_size;
        if x <= 0 || y <= 0 || z <= 0 {
            return None;
        }
        Some([x as usize, y as usize, z as usize])
    }
}

impl From<&FfiBoundingBox> for BoundingBox {
    fn from(ffi: &FfiBoundingBox) -> Self {
        let xyz = |v: [f32; 4]| Vec3::new(v[0], v[1], v[2]);
        BoundingBox::new(xyz(ffi.outer_bb_min), xyz(ffi.outer_bb_max))
            .with_inner(xyz(ffi.inner_bb_min), xyz(ffi.inner_bb_max))
    }
}

/// Bake options. `sdf_bake_default_config` fills the defaults.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FfiBakeConfig {
    pub ray_epsilon: f32,
    pub dedup_epsilon: f32,
    pub intersection_cap: u32,
    /// 0 = single ray, 1 = majority vote
    pub sign_mode: u32,
    /// 0 = brute force, otherwise BVH leaf size
    pub bvh_leaf_size: u32,
    /// 0 = per voxel, 1 = per triangle, 2 = sequential
    pub parallel_mode: u32,
    pub empty_distance: f32,
    pub degenerate_epsilon: f32,
    /// Classification direction in `xyz`; `w` is ignored.
    pub ray_direction: [f32; 4],
}

impl From<&BakeConfig> for FfiBakeConfig {
    fn from(config: &BakeConfig) -> Self {
        let d = config.ray_direction;
        Self {
            ray_epsilon: config.ray_epsilon,
            dedup_epsilon: config.dedup_epsilon,
            intersection_cap: config.intersection_cap.min(u32::MAX as usize) as u32,
            sign_mode: match config.sign_mode {
                SignMode::SingleRay => 0,
                SignMode::MajorityVote => 1,
            },
            bvh_leaf_size: match config.acceleration {
                Acceleration::BruteForce => 0,
                Acceleration::Bvh {
                    max_triangles_per_leaf,
                } => max_triangles_per_leaf as u32,
            },
            parallel_mode: match config.parallel_mode {
                ParallelMode::PerVoxel => 0,
                ParallelMode::PerTriangle => 1,
                ParallelMode::Sequential => 2,
            },
            empty_distance: config.empty_distance,
            degenerate_epsilon: config.degenerate_epsilon,
            ray_direction: [d.x, d.y, d.z, 0.0],
        }
    }
}

impl From<&FfiBakeConfig> for BakeConfig {
    fn from(ffi: &FfiBakeConfig) -> Self {
        let sign_mode = if ffi.sign_mode == 1 {
            SignMode::MajorityVote
        } else {
            SignMode::SingleRay
        };
        let acceleration = match ffi.bvh_leaf_size {
            0 => Acceleration::BruteForce,
            leaf => Acceleration::Bvh {
                max_triangles_per_leaf: leaf as usize,
            },
        };
        let parallel_mode = match ffi.parallel_mode {
            1 => ParallelMode::PerTriangle,
            2 => ParallelMode::Sequential,
            _ => ParallelMode::PerVoxel,
        };
        let [x, y, z, _] = ffi.ray_direction;

        BakeConfig::new()
            .with_ray_epsilon(ffi.ray_epsilon)
            .with_dedup_epsilon(ffi.dedup_epsilon)
            .with_intersection_cap(ffi.intersection_cap as usize)
            .with_sign_mode(sign_mode)
            .with_acceleration(acceleration)
            .with_parallel_mode(parallel_mode)
            .with_empty_distance(ffi.empty_distance)
            .with_degenerate_epsilon(ffi.degenerate_epsilon)
            .with_ray_direction(Vec3::new(x, y, z))
    }
}

/// Pass counters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FfiBakeStats {
    pub voxels: u64,
    pub triangles: u64,
    pub degenerate_triangles: u64,
    pub truncated_voxels: u64,
    pub inside_voxels: u64,
    pub elapsed_us: u64,
}

impl From<BakeStats> for FfiBakeStats {
    fn from(stats: BakeStats) -> Self {
        Self {
            voxels: stats.voxels as u64,
            triangles: stats.triangles as u64,
            degenerate_triangles: stats.degenerate_triangles as u64,
            truncated_voxels: stats.truncated_voxels as u64,
            inside_voxels: stats.inside_voxels as u64,
            elapsed_us: stats.elapsed_us,
        }
    }
}

/// Single-cell evaluation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FfiCellProbe {
    pub signed_distance: f32,
    pub unsigned_distance: f32,
    pub crossings: u32,
    /// u32::MAX when the mesh has no usable triangle.
    pub nearest_triangle: u32,
    pub inside: u8,
    pub truncated: u8,
    pub _pad: [u8; 2],
    /// Cell center in `xyz`, `w` = 1.
    pub sample_point: [f32; 4],
    /// Nearest surface point in `xyz`, `w` = 1 if present, else 0.
    pub closest_point: [f32; 4],
}

// =============================================================================
// Helpers
// =============================================================================

fn status_for(error: &SdfError) -> i32 {
    match error {
        SdfError::IndexCountNotMultipleOfThree { .. }
        | SdfError::IndexOutOfRange { .. }
        | SdfError::VertexIndexOverflow { .. } => STATUS_INVALID_MESH,
        SdfError::InvalidBounds { .. }
        | SdfError::ZeroResolution { .. }
        | SdfError::ResolutionOverflow { .. }
        | SdfError::CellOutOfRange { .. } => STATUS_INVALID_GRID,
        SdfError::VolumeSizeMismatch { .. } => STATUS_BUFFER_TOO_SMALL,
    }
}

/// Slice from a host pointer; a null pointer is only accepted for `len == 0`.
unsafe fn host_slice<'a, T>(ptr: *const T, len: u32) -> Option<&'a [T]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(ptr, len as usize))
}

unsafe fn resolve_config(config: *const FfiBakeConfig) -> BakeConfig {
    if config.is_null() {
        BakeConfig::default()
    } else {
        BakeConfig::from(&*config)
    }
}

// =============================================================================
// FFI Functions
// =============================================================================

/// Returns the library version as a packed u32: 0xMMmmpp (major.minor.patch).
#[no_mangle]
pub extern "C" fn sdf_bake_version() -> u32 {
    0x000100 // v0.1.0
}

/// Fill `out` with the default bake options.
///
/// # Safety
/// - `out` must point to a writable FfiBakeConfig.
///
/// # Returns
/// - 0 on success
/// - -1 if out is null
#[no_mangle]
pub unsafe extern "C" fn sdf_bake_default_config(out: *mut FfiBakeConfig) -> i32 {
    if out.is_null() {
        return STATUS_NULL_POINTER;
    }
    *out = FfiBakeConfig::from(&BakeConfig::default());
    STATUS_OK
}

/// Bake a signed distance volume into `out`.
///
/// Cell `(i, j, k)` lands at `out[(i * ny + j) * nz + k]`, with the
/// resolution taken from `bounds.buffer_size`. On any error `out` is left
/// untouched.
///
/// # Safety
/// - `vertices` must point to `vertex_count` Vertex records (may be null if 0).
/// - `indices` must point to `index_count` u32 values (may be null if 0).
/// - `bounds` must point to a valid FfiBoundingBox.
/// - `config` may be null (defaults are used).
/// - `out` must point to `out_len` writable floats.
/// - `stats` may be null.
///
/// # Returns
/// - 0 on success, negative status code otherwise (see module docs)
#[no_mangle]
pub unsafe extern "C" fn sdf_bake_generate(
    vertices: *const Vertex,
    vertex_count: u32,
    indices: *const u32,
    index_count: u32,
    bounds: *const FfiBoundingBox,
    config: *const FfiBakeConfig,
    out: *mut f32,
    out_len: u32,
    stats: *mut FfiBakeStats,
) -> i32 {
    if bounds.is_null() || out.is_null() {
        return STATUS_NULL_POINTER;
    }
    let (Some(vertices), Some(indices)) =
        (host_slice(vertices, vertex_count), host_slice(indices, index_count))
    else {
        return STATUS_NULL_POINTER;
    };

    let Some(dims) = (*bounds).dims() else {
        return STATUS_INVALID_GRID;
    };
    let grid = match GridSpec::new(BoundingBox::from(&*bounds), dims) {
        Ok(grid) => grid,
        Err(error) => return status_for(&error),
    };
    let voxels = grid.voxel_count();
    if (out_len as usize) < voxels {
        return STATUS_BUFFER_TOO_SMALL;
    }

    let mesh = MeshView::new(vertices, indices);
    let output = std::slice::from_raw_parts_mut(out, voxels);
    let config = resolve_config(config);

    match generate_into_slice(mesh, &grid.bounds, dims, output, &config) {
        Ok(result) => {
            if !stats.is_null() {
                *stats = FfiBakeStats::from(result);
            }
            STATUS_OK
        }
        Err(error) => status_for(&error),
    }
}

/// Bake and also fill the per-voxel debug strip.
///
/// `debug_out` receives `nx * ny * nz` RGBA texels keyed by
/// `x + y * nx + z * nx * ny`, each `(signed_distance, crossings,
/// has_nearest, 1)`. The debug flag in `config` is ignored.
///
/// # Safety
/// Same as [`sdf_bake_generate`], plus `debug_out` must point to
/// `debug_len` writable `[f32; 4]` texels.
///
/// # Returns
/// - 0 on success, negative status code otherwise (see module docs)
#[no_mangle]
pub unsafe extern "C" fn sdf_bake_generate_debug(
    vertices: *const Vertex,
    vertex_count: u32,
    indices: *const u32,
    index_count: u32,
    bounds: *const FfiBoundingBox,
    config: *const FfiBakeConfig,
    out: *mut f32,
    out_len: u32,
    debug_out: *mut [f32; 4],
    debug_len: u32,
) -> i32 {
    if bounds.is_null() || out.is_null() || debug_out.is_null() {
        return STATUS_NULL_POINTER;
    }
    let (Some(vertices), Some(indices)) =
        (host_slice(vertices, vertex_count), host_slice(indices, index_count))
    else {
        return STATUS_NULL_POINTER;
    };

    let Some(dims) = (*bounds).dims() else {
        return STATUS_INVALID_GRID;
    };
    let grid = match GridSpec::new(BoundingBox::from(&*bounds), dims) {
        Ok(grid) => grid,
        Err(error) => return status_for(&error),
    };
    let voxels = grid.voxel_count();
    if (out_len as usize) < voxels || (debug_len as usize) < voxels {
        return STATUS_BUFFER_TOO_SMALL;
    }

    let mesh = MeshView::new(vertices, indices);
    let config = resolve_config(config).with_debug_output(true);

    match generate_timed(mesh, &grid.bounds, dims, &config) {
        Ok(result) => {
            std::slice::from_raw_parts_mut(out, voxels).copy_from_slice(result.volume.data());
            if let Some(strip) = result.debug {
                std::slice::from_raw_parts_mut(debug_out, voxels).copy_from_slice(strip.texels());
            }
            STATUS_OK
        }
        Err(error) => status_for(&error),
    }
}

/// Evaluate one cell of the grid described by `bounds`.
///
/// # Safety
/// - Mesh, bounds and config pointers as for [`sdf_bake_generate`].
/// - `out` must point to a writable FfiCellProbe.
///
/// # Returns
/// - 0 on success, negative status code otherwise (see module docs)
#[no_mangle]
pub unsafe extern "C" fn sdf_bake_probe(
    vertices: *const Vertex,
    vertex_count: u32,
    indices: *const u32,
    index_count: u32,
    bounds: *const FfiBoundingBox,
    config: *const FfiBakeConfig,
    x: u32,
    y: u32,
    z: u32,
    out: *mut FfiCellProbe,
) -> i32 {
    if bounds.is_null() || out.is_null() {
        return STATUS_NULL_POINTER;
    }
    let (Some(vertices), Some(indices)) =
        (host_slice(vertices, vertex_count), host_slice(indices, index_count))
    else {
        return STATUS_NULL_POINTER;
    };

    let bounds = &*bounds;
    let Some(dims) = bounds.dims() else {
        return STATUS_INVALID_GRID;
    };
    let grid = match GridSpec::new(BoundingBox::from(bounds), dims) {
        Ok(grid) => grid,
        Err(error) => return status_for(&error),
    };

    let mesh = MeshView::new(vertices, indices);
    let config = resolve_config(config);
    let cell = [x as usize, y as usize, z as usize];

    match sample_cell(mesh, &grid, cell, &config) {
        Ok(probe) => {
            let p = probe.point;
            *out = FfiCellProbe {
                signed_distance: probe.signed_distance,
                unsigned_distance: probe.unsigned_distance,
                crossings: probe.crossings as u32,
                nearest_triangle: probe.nearest_triangle.map_or(u32::MAX, |t| t as u32),
                inside: probe.inside as u8,
                truncated: probe.truncated as u8,
                _pad: [0; 2],
                sample_point: [p.x, p.y, p.z, 1.0],
                closest_point: probe
                    .closest_point
                    .map_or([0.0; 4], |c| [c.x, c.y, c.z, 1.0]),
            };
            STATUS_OK
        }
        Err(error) => status_for(&error),
    }
}
