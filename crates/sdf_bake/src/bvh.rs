//! Bounding volume hierarchy over prepared triangles.
//!
//! Median split on the longest axis of the centroid bounds, built once per
//! pass. Nodes live in one flat array; leaves reference a contiguous run of
//! the reordered triangle list.
//!
//! ```text
//!                    [0] root
//!                  ┌───┴───┐
//!                [1]      [4]
//!               ┌─┴─┐    ┌─┴─┐
//!             [2] [3]  [5] [6]     leaves: triangles[start..start + count]
//! ```
//!
//! Queries return exactly what the flat scan returns: nearest pruning only
//! skips boxes strictly farther than the best candidate, and ray traversal
//! only skips boxes the ray cannot touch.

use glam::Vec3;
use smallvec::SmallVec;

use crate::intersect::Ray;
use crate::query::{HitList, Nearest, Triangle, TriangleQuery};
use crate::types::Aabb;

/// Node boxes are grown by this fraction of the root extent so hits on a box
/// face are never lost to rounding in the slab test.
const BOX_PADDING: f32 = 1e-5;

/// Traversal stack entries kept inline.
const TRAVERSAL_STACK: usize = 64;

#[derive(Clone, Copy, Debug)]
enum NodeKind {
  Leaf { start: u32, count: u32 },
  Internal { left: u32, right: u32 },
}

#[derive(Clone, Copy, Debug)]
struct BvhNode {
  bounds: Aabb,
  kind: NodeKind,
}

/// Triangle BVH answering nearest and ray-hit queries.
#[derive(Clone, Debug, Default)]
pub struct TriangleBvh {
  nodes: Vec<BvhNode>,
  triangles: Vec<Triangle>,
}

impl TriangleBvh {
  /// Build over `triangles`, splitting until a leaf holds at most
  /// `max_triangles_per_leaf` (minimum 1).
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "bvh::build"))]
  pub fn build(mut triangles: Vec<Triangle>, max_triangles_per_leaf: usize) -> Self {
    if triangles.is_empty() {
      return Self::default();
    }

    let mut root_bounds = Aabb::empty();
    for triangle in &triangles {
      root_bounds.encapsulate_aabb(&triangle.bounds());
    }
    let padding = BOX_PADDING * root_bounds.size().max_element().max(f32::MIN_POSITIVE);

    let mut nodes = Vec::with_capacity(2 * triangles.len() / max_triangles_per_leaf.max(1) + 1);
    let len = triangles.len();
    build_recursive(&mut nodes, &mut triangles, 0, len, max_triangles_per_leaf.max(1), padding);

    Self { nodes, triangles }
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Leaf-ordered triangles.
  pub fn triangles(&self) -> &[Triangle] {
    &self.triangles
  }

  /// Depth of the deepest leaf (root = 1, empty tree = 0).
  pub fn depth(&self) -> usize {
    fn walk(nodes: &[BvhNode], index: usize) -> usize {
      match nodes[index].kind {
        NodeKind::Leaf { .. } => 1,
        NodeKind::Internal { left, right } => 1 + walk(nodes, left as usize).max(walk(nodes, right as usize)),
      }
    }
    if self.nodes.is_empty() {
      0
    } else {
      walk(&self.nodes, 0)
    }
  }

  fn leaf_triangles(&self, start: u32, count: u32) -> &[Triangle] {
    &self.triangles[start as usize..(start + count) as usize]
  }
}

/// Sort `triangles[start..end]` along the longest centroid axis and split
/// at the median. Returns the node index.
fn build_recursive(
  nodes: &mut Vec<BvhNode>,
  triangles: &mut [Triangle],
  start: usize,
  end: usize,
  max_leaf: usize,
  padding: f32,
) -> u32 {
  let slice = &mut triangles[start..end];

  let mut bounds = Aabb::empty();
  let mut centroids = Aabb::empty();
  for triangle in slice.iter() {
    bounds.encapsulate_aabb(&triangle.bounds());
    centroids.encapsulate(triangle.centroid());
  }
  let bounds = bounds.padded(padding);

  let node_index = nodes.len() as u32;
  nodes.push(BvhNode {
    bounds,
    kind: NodeKind::Leaf {
      start: start as u32,
      count: slice.len() as u32,
    },
  });

  if slice.len() <= max_leaf {
    return node_index;
  }

  let axis = centroids.longest_axis();
  slice.sort_unstable_by(|a, b| {
    a.centroid()[axis]
      .total_cmp(&b.centroid()[axis])
      .then(a.index.cmp(&b.index))
  });

  let mid = start + slice.len() / 2;
  let left = build_recursive(nodes, triangles, start, mid, max_leaf, padding);
  let right = build_recursive(nodes, triangles, mid, end, max_leaf, padding);
  nodes[node_index as usize].kind = NodeKind::Internal { left, right };

  node_index
}

impl TriangleQuery for TriangleBvh {
  fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  fn nearest(&self, point: Vec3) -> Option<Nearest> {
    if self.nodes.is_empty() {
      return None;
    }

    let mut best: Option<Nearest> = None;
    let mut stack: SmallVec<[u32; TRAVERSAL_STACK]> = SmallVec::new();
    stack.push(0);

    while let Some(index) = stack.pop() {
      let node = &self.nodes[index as usize];
      if let Some(current) = best {
        if node.bounds.distance_squared(point) > current.distance_squared {
          continue;
        }
      }

      match node.kind {
        NodeKind::Leaf { start, count } => {
          for triangle in self.leaf_triangles(start, count) {
            best = Nearest::closer(
              best,
              Some(Nearest {
                distance_squared: triangle.distance_squared(point),
                triangle: triangle.index,
              }),
            );
          }
        }
        NodeKind::Internal { left, right } => {
          // Closest child is popped first.
          let dl = self.nodes[left as usize].bounds.distance_squared(point);
          let dr = self.nodes[right as usize].bounds.distance_squared(point);
          if dl <= dr {
            stack.push(right);
            stack.push(left);
          } else {
            stack.push(left);
            stack.push(right);
          }
        }
      }
    }

    best
  }

  fn ray_hits(&self, ray: &Ray, epsilon: f32, hits: &mut HitList) {
    if self.nodes.is_empty() {
      return;
    }

    let mut stack: SmallVec<[u32; TRAVERSAL_STACK]> = SmallVec::new();
    stack.push(0);

    while let Some(index) = stack.pop() {
      let node = &self.nodes[index as usize];
      if !node.bounds.intersects_ray(ray.origin, ray.direction) {
        continue;
      }

      match node.kind {
        NodeKind::Leaf { start, count } => {
          hits.extend(
            self
              .leaf_triangles(start, count)
              .iter()
              .filter_map(|triangle| triangle.ray_hit(ray, epsilon)),
          );
        }
        NodeKind::Internal { left, right } => {
          stack.push(right);
          stack.push(left);
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "bvh_test.rs"]
mod bvh_test;
