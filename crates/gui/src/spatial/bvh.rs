//! Bounding volume hierarchy over the triangulated faces of one mesh.
//!
//! Built top-down: bound all triangles, split on the longest axis at the
//! centroid median, recurse until a leaf holds at most
//! `MAX_TRIANGLES_PER_LEAF`. Nodes live in a flat array, root at index 0.
//! Ray queries walk the tree front-to-back with an explicit stack and
//! shrink the cutoff on every hit.

use glam::Vec3;

use crate::viewport::picking::{ray_aabb, ray_triangle_intersect, Aabb, Ray};

const MAX_TRIANGLES_PER_LEAF: usize = 4;

/// One world-space triangle and the mesh face it was cut from
#[derive(Debug, Clone)]
pub struct BvhTriangle {
    pub vertices: [Vec3; 3],
    pub face: u32,
}

impl BvhTriangle {
    fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// Unnormalized geometric normal
    pub fn normal(&self) -> Vec3 {
        (self.vertices[1] - self.vertices[0]).cross(self.vertices[2] - self.vertices[0])
    }
}

#[derive(Debug, Clone)]
enum BvhNode {
    Internal {
        aabb: Aabb,
        left: usize,
        right: usize,
    },
    Leaf {
        aabb: Aabb,
        first: usize,
        count: usize,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            Self::Internal { aabb, .. } | Self::Leaf { aabb, .. } => aabb,
        }
    }
}

/// Closest ray hit against the hierarchy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index into `Bvh::triangles`
    pub triangle: usize,
    /// Source face of the hit triangle
    pub face: u32,
    pub distance: f32,
    pub point: Vec3,
    /// Unit normal of the hit triangle
    pub normal: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    /// Triangles, reordered during construction so leaves are contiguous
    triangles: Vec<BvhTriangle>,
}

impl Bvh {
    /// Empty hierarchy; every query misses
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(mut triangles: Vec<BvhTriangle>) -> Self {
        if triangles.is_empty() {
            return Self::empty();
        }

        let mut bvh = Self {
            nodes: Vec::with_capacity(triangles.len() * 2),
            triangles: Vec::new(),
        };
        let len = triangles.len();
        bvh.build_recursive(&mut triangles, 0, len);
        bvh.triangles = triangles;
        bvh
    }

    fn build_recursive(&mut self, triangles: &mut [BvhTriangle], start: usize, end: usize) -> usize {
        let mut aabb = Aabb::empty();
        for tri in &triangles[start..end] {
            aabb.expand(&tri.aabb());
        }

        let count = end - start;
        if count <= MAX_TRIANGLES_PER_LEAF {
            let idx = self.nodes.len();
            self.nodes.push(BvhNode::Leaf {
                aabb,
                first: start,
                count,
            });
            return idx;
        }

        let extent = aabb.extent();
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        triangles[start..end].sort_by(|a, b| {
            a.centroid()[axis]
                .partial_cmp(&b.centroid()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = start + count / 2;

        // Placeholder children, patched after recursion
        let idx = self.nodes.len();
        self.nodes.push(BvhNode::Internal {
            aabb,
            left: 0,
            right: 0,
        });

        let left_idx = self.build_recursive(triangles, start, mid);
        let right_idx = self.build_recursive(triangles, mid, end);

        if let BvhNode::Internal { left, right, .. } = &mut self.nodes[idx] {
            *left = left_idx;
            *right = right_idx;
        }

        idx
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn triangles(&self) -> &[BvhTriangle] {
        &self.triangles
    }

    pub fn bounds(&self) -> Option<&Aabb> {
        self.nodes.first().map(BvhNode::aabb)
    }

    /// Closest triangle hit along the ray within `max_distance`.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        if self.nodes.is_empty() {
            return None;
        }

        let inv_dir = ray.direction.recip();
        let mut cutoff = max_distance;
        let mut closest: Option<(usize, f32)> = None;

        let mut stack = Vec::with_capacity(64);
        stack.push(0usize);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            let Some(tmin) = ray_aabb(ray.origin, inv_dir, node.aabb(), cutoff) else {
                continue;
            };
            if tmin > cutoff {
                continue;
            }

            match node {
                BvhNode::Internal { left, right, .. } => {
                    let lt = ray_aabb(ray.origin, inv_dir, self.nodes[*left].aabb(), cutoff);
                    let rt = ray_aabb(ray.origin, inv_dir, self.nodes[*right].aabb(), cutoff);
                    // Push farther child first so the nearer one pops first
                    match (lt, rt) {
                        (Some(l), Some(r)) => {
                            if l < r {
                                stack.push(*right);
                                stack.push(*left);
                            } else {
                                stack.push(*left);
                                stack.push(*right);
                            }
                        }
                        (Some(_), None) => stack.push(*left),
                        (None, Some(_)) => stack.push(*right),
                        (None, None) => {}
                    }
                }
                BvhNode::Leaf { first, count, .. } => {
                    for i in *first..*first + *count {
                        let [v0, v1, v2] = self.triangles[i].vertices;
                        if let Some(t) = ray_triangle_intersect(ray, v0, v1, v2) {
                            if t < cutoff {
                                cutoff = t;
                                closest = Some((i, t));
                            }
                        }
                    }
                }
            }
        }

        closest.map(|(i, t)| {
            let tri = &self.triangles[i];
            RayHit {
                triangle: i,
                face: tri.face,
                distance: t,
                point: ray.at(t),
                normal: tri.normal().normalize_or_zero(),
            }
        })
    }
}
