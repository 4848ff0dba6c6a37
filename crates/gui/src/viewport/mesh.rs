use std::collections::HashMap;

use glam::Vec3;

/// A polygon of an evaluated mesh: its vertex loop and the edges bounding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Vertex indices in loop order
    pub vertices: Vec<u32>,
    /// Edge indices (into `MeshData::edges`), one per loop side
    pub edges: Vec<u32>,
}

/// Evaluated (post-deformation) mesh in object-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    /// Edge-to-vertex index pairs
    pub edges: Vec<[u32; 2]>,
    pub faces: Vec<Face>,
}

impl MeshData {
    /// Build a mesh from polygon loops, deriving the deduplicated edge list
    /// and the face-to-edge adjacency.
    pub fn from_polygons(positions: Vec<Vec3>, polygons: Vec<Vec<u32>>) -> Self {
        let mut edges: Vec<[u32; 2]> = Vec::new();
        let mut edge_lookup: HashMap<(u32, u32), u32> = HashMap::new();
        let mut faces = Vec::with_capacity(polygons.len());

        for loop_verts in polygons {
            let n = loop_verts.len();
            let mut face_edges = Vec::with_capacity(n);
            if n >= 2 {
                for i in 0..n {
                    let a = loop_verts[i];
                    let b = loop_verts[(i + 1) % n];
                    if a == b {
                        continue;
                    }
                    let key = (a.min(b), a.max(b));
                    let idx = *edge_lookup.entry(key).or_insert_with(|| {
                        edges.push([a, b]);
                        (edges.len() - 1) as u32
                    });
                    if !face_edges.contains(&idx) {
                        face_edges.push(idx);
                    }
                }
            }
            faces.push(Face {
                vertices: loop_verts,
                edges: face_edges,
            });
        }

        Self {
            positions,
            edges,
            faces,
        }
    }

    /// Mesh made only of vertices (no edges, no faces)
    pub fn point_cloud(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Add an edge that belongs to no face
    pub fn with_loose_edge(mut self, a: u32, b: u32) -> Self {
        self.edges.push([a, b]);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Local position of a vertex, `None` when the index is stale
    pub fn position(&self, index: u32) -> Option<Vec3> {
        self.positions.get(index as usize).copied()
    }

    /// Local endpoints of an edge, `None` when either index is stale
    pub fn edge_endpoints(&self, edge: u32) -> Option<(Vec3, Vec3)> {
        let [a, b] = *self.edges.get(edge as usize)?;
        Some((self.position(a)?, self.position(b)?))
    }

    /// Fan-triangulate every face with at least three in-range vertices.
    /// Each triangle is returned with the index of its source face.
    pub fn triangles(&self) -> Vec<([Vec3; 3], u32)> {
        let mut out = Vec::new();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                continue;
            }
            let Some(p0) = self.position(face.vertices[0]) else {
                continue;
            };
            for pair in face.vertices[1..].windows(2) {
                let (Some(p1), Some(p2)) = (self.position(pair[0]), self.position(pair[1])) else {
                    continue;
                };
                out.push(([p0, p1, p2], face_idx as u32));
            }
        }
        out
    }

    /// Vertices not referenced by any face
    pub fn loose_vertices(&self) -> Vec<u32> {
        let mut used = vec![false; self.positions.len()];
        for face in &self.faces {
            for &v in &face.vertices {
                if let Some(slot) = used.get_mut(v as usize) {
                    *slot = true;
                }
            }
        }
        used.iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Edges not referenced by any face
    pub fn loose_edges(&self) -> Vec<u32> {
        let mut used = vec![false; self.edges.len()];
        for face in &self.faces {
            for &e in &face.edges {
                if let Some(slot) = used.get_mut(e as usize) {
                    *slot = true;
                }
            }
        }
        used.iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| i as u32)
            .collect()
    }
}

// ── Primitive generation (demo scene and tests) ──

/// Axis-aligned box centred at the origin: 8 vertices, 12 edges, 6 quads.
pub fn cube(w: f32, h: f32, d: f32) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let positions = vec![
        Vec3::new(-hw, -hh, -hd),
        Vec3::new(hw, -hh, -hd),
        Vec3::new(hw, hh, -hd),
        Vec3::new(-hw, hh, -hd),
        Vec3::new(-hw, -hh, hd),
        Vec3::new(hw, -hh, hd),
        Vec3::new(hw, hh, hd),
        Vec3::new(-hw, hh, hd),
    ];

    let quads = vec![
        vec![4, 5, 6, 7], // Front (+Z)
        vec![1, 0, 3, 2], // Back (-Z)
        vec![5, 1, 2, 6], // Right (+X)
        vec![0, 4, 7, 3], // Left (-X)
        vec![7, 6, 2, 3], // Top (+Y)
        vec![0, 1, 5, 4], // Bottom (-Y)
    ];

    MeshData::from_polygons(positions, quads)
}

/// Flat grid in the XY plane (z = 0), `cells` quads per side, centred at the origin.
pub fn grid(size: f32, cells: u32) -> MeshData {
    let cells = cells.max(1);
    let n = cells + 1;
    let step = size / cells as f32;
    let half = size * 0.5;

    let mut positions = Vec::with_capacity((n * n) as usize);
    for j in 0..n {
        for i in 0..n {
            positions.push(Vec3::new(
                -half + i as f32 * step,
                -half + j as f32 * step,
                0.0,
            ));
        }
    }

    let mut quads = Vec::with_capacity((cells * cells) as usize);
    for j in 0..cells {
        for i in 0..cells {
            let a = j * n + i;
            quads.push(vec![a, a + 1, a + n + 1, a + n]);
        }
    }

    MeshData::from_polygons(positions, quads)
}
