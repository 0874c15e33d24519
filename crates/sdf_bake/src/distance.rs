//! Unsigned point-to-triangle distance.
//!
//! # Closest Region Test
//!
//! ```text
//!                 ╲ edge region ba  ╱
//!                  ╲               ╱
//!          vertex   a ───────────── b   vertex
//!                   ╲             ╱
//!    edge region ac  ╲   face    ╱  edge region cb
//!                     ╲ region  ╱
//!                      ╲       ╱
//!                       ╲     ╱
//!                         c
//!                       vertex
//!
//! For each edge, sign(dot(edge × nor, p - start)) tells which side of the
//! edge's inward plane p is on. All three positive (sum >= 2 tolerates one
//! edge plane passing exactly through p) means p projects into the face;
//! otherwise the answer is the nearest of the three clamped edge segments.
//! ```
//!
//! Everything is computed on squared distances; callers take one square root
//! at the very end.

use glam::Vec3;

/// Three-valued sign: exact zero maps to `0.0`.
///
/// `f32::signum` returns `1.0` for `+0.0`, which would misclassify points
/// lying on an edge plane.
#[inline(always)]
pub fn sign(x: f32) -> f32 {
  if x > 0.0 {
    1.0
  } else if x < 0.0 {
    -1.0
  } else {
    0.0
  }
}

/// Squared distance from `p` to the segment `start..start + edge`, where
/// `offset = p - start`.
#[inline(always)]
fn segment_distance_squared(edge: Vec3, offset: Vec3) -> f32 {
  let len_sq = edge.length_squared();
  if len_sq == 0.0 {
    return offset.length_squared();
  }
  let t = (edge.dot(offset) / len_sq).clamp(0.0, 1.0);
  (edge * t - offset).length_squared()
}

/// Whether `p` projects into the interior (or boundary) of the face.
#[inline(always)]
fn in_face_region(nor: Vec3, edges: [Vec3; 3], offsets: [Vec3; 3]) -> bool {
  let side = sign(edges[0].cross(nor).dot(offsets[0]))
    + sign(edges[1].cross(nor).dot(offsets[1]))
    + sign(edges[2].cross(nor).dot(offsets[2]));
  side >= 2.0
}

/// Squared unsigned distance from `p` to triangle `(a, b, c)`.
///
/// Finite for any finite input, including collapsed triangles (they fall
/// through to the segment path).
#[inline]
pub fn distance_squared_to_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> f32 {
  let ba = b - a;
  let cb = c - b;
  let ac = a - c;
  let pa = p - a;
  let pb = p - b;
  let pc = p - c;
  let nor = ba.cross(ac);

  if in_face_region(nor, [ba, cb, ac], [pa, pb, pc]) {
    let plane = nor.dot(pa);
    plane * plane / nor.length_squared()
  } else {
    segment_distance_squared(ba, pa)
      .min(segment_distance_squared(cb, pb))
      .min(segment_distance_squared(ac, pc))
  }
}

/// Near-zero-area test.
///
/// `|ba × ac|² <= epsilon * |ba|² * |ac|²` compares the squared sine of the
/// corner angle at `a` against `epsilon`, so the test does not depend on the
/// mesh's scale. Coincident or collinear corners always qualify.
#[inline]
pub fn is_degenerate(a: Vec3, b: Vec3, c: Vec3, epsilon: f32) -> bool {
  let ba = b - a;
  let ac = a - c;
  let nor = ba.cross(ac);
  nor.length_squared() <= epsilon * ba.length_squared() * ac.length_squared()
}

/// Unsigned distance from `p` to triangle `(a, b, c)`, or `None` when the
/// triangle is degenerate under [`DEFAULT_DEGENERATE_EPSILON`].
///
/// [`DEFAULT_DEGENERATE_EPSILON`]: crate::constants::DEFAULT_DEGENERATE_EPSILON
pub fn distance_to_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
  if is_degenerate(a, b, c, crate::constants::DEFAULT_DEGENERATE_EPSILON) {
    return None;
  }
  Some(distance_squared_to_triangle(p, a, b, c).sqrt())
}

/// Nearest point to `p` on the segment `start..end`.
#[inline]
pub fn closest_point_on_segment(p: Vec3, start: Vec3, end: Vec3) -> Vec3 {
  let edge = end - start;
  let len_sq = edge.length_squared();
  if len_sq == 0.0 {
    return start;
  }
  let t = (edge.dot(p - start) / len_sq).clamp(0.0, 1.0);
  start + edge * t
}

/// Nearest point to `p` on triangle `(a, b, c)`.
///
/// Uses the same region split as [`distance_squared_to_triangle`], so
/// `p.distance_squared(closest_point_on_triangle(..))` agrees with it up to
/// rounding.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  let ba = b - a;
  let cb = c - b;
  let ac = a - c;
  let pa = p - a;
  let nor = ba.cross(ac);

  if in_face_region(nor, [ba, cb, ac], [pa, p - b, p - c]) {
    return p - nor * (nor.dot(pa) / nor.length_squared());
  }

  [
    closest_point_on_segment(p, a, b),
    closest_point_on_segment(p, b, c),
    closest_point_on_segment(p, c, a),
  ]
  .into_iter()
  .min_by(|x, y| p.distance_squared(*x).total_cmp(&p.distance_squared(*y)))
  .unwrap_or(a)
}

#[cfg(test)]
#[path = "distance_test.rs"]
mod distance_test;
