use glam::{Mat4, Vec3};

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point on the ray closest to `point` (never behind the origin)
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let len_sq = self.direction.length_squared();
        if len_sq < 1e-12 {
            return self.origin;
        }
        let t = ((point - self.origin).dot(self.direction) / len_sq).max(0.0);
        self.at(t)
    }

    /// Intersect with the plane through `point` with normal `normal`.
    /// Returns None if the ray is parallel to the plane or the hit is behind the origin.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<Vec3> {
        let denom = self.direction.dot(normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Inverted box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_point(*p);
        }
        aabb
    }

    pub fn expand_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}

/// Ray-AABB intersection using the slab method with a precomputed inverse direction.
/// Returns the entry distance along the ray (0 if the origin is inside), or None.
pub fn ray_aabb(origin: Vec3, inv_dir: Vec3, aabb: &Aabb, max_distance: f32) -> Option<f32> {
    let t1 = (aabb.min - origin) * inv_dir;
    let t2 = (aabb.max - origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    // 0 * inf on a slab boundary
    if tmin.is_nan() || tmax.is_nan() {
        return None;
    }

    if tmax >= tmin && tmin < max_distance && tmax >= 0.0 {
        Some(tmin.max(0.0))
    } else {
        None
    }
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Parameter of the point on segment `a..b` closest to `point`, clamped to [0, 1].
/// Degenerate (zero-length) segments return 0.
pub fn segment_parameter(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return 0.0;
    }
    ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
}

/// Parameter of the point on segment `a..b` closest to the ray, clamped to [0, 1].
pub fn ray_segment_parameter(ray: &Ray, a: Vec3, b: Vec3) -> f32 {
    let d1 = ray.direction;
    let d2 = b - a;
    let r = ray.origin - a;
    let aa = d1.dot(d1);
    let ee = d2.dot(d2);
    if ee < 1e-12 {
        return 0.0;
    }
    let bb = d1.dot(d2);
    let cc = d1.dot(r);
    let ff = d2.dot(r);
    let denom = aa * ee - bb * bb;
    if denom.abs() < 1e-12 {
        // Parallel: any point works, take the one nearest the ray origin
        return segment_parameter(ray.origin, a, b);
    }
    ((aa * ff - bb * cc) / denom).clamp(0.0, 1.0)
}

/// Transform a local-space triangle to world space
pub fn transform_triangle(m: &Mat4, tri: &[Vec3; 3]) -> [Vec3; 3] {
    [
        m.transform_point3(tri[0]),
        m.transform_point3(tri[1]),
        m.transform_point3(tri[2]),
    ]
}
