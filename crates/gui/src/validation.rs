//! Mesh validation utilities.
//!
//! `MeshValidator` checks evaluated mesh integrity before it enters the
//! scene: finite positions, in-range edge and face indices, consistent
//! face-to-edge adjacency.

use crate::error::{MeasureError, MeasureResult};
use crate::viewport::mesh::MeshData;
use crate::viewport::picking::Aabb;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    /// Check that every position is finite (no NaN / inf).
    pub fn are_positions_finite(&self) -> bool {
        self.mesh.positions.iter().all(|p| p.is_finite())
    }

    /// Check that both endpoints of every edge are valid vertices.
    pub fn are_edges_in_range(&self) -> bool {
        let n = self.mesh.vertex_count() as u32;
        self.mesh.edges.iter().all(|[a, b]| *a < n && *b < n)
    }

    /// Check that every face loop references valid vertices.
    pub fn are_faces_in_range(&self) -> bool {
        let n = self.mesh.vertex_count() as u32;
        self.mesh
            .faces
            .iter()
            .all(|f| f.vertices.iter().all(|&v| v < n))
    }

    /// Check that face edge lists point into the edge table.
    pub fn is_adjacency_in_range(&self) -> bool {
        let n = self.mesh.edge_count() as u32;
        self.mesh.faces.iter().all(|f| f.edges.iter().all(|&e| e < n))
    }

    /// Edges whose two endpoints are the same vertex.
    pub fn degenerate_edges(&self) -> Vec<usize> {
        self.mesh
            .edges
            .iter()
            .enumerate()
            .filter(|(_, [a, b])| a == b)
            .map(|(i, _)| i)
            .collect()
    }

    /// Faces with fewer than three vertices (never hit by a ray).
    pub fn degenerate_faces(&self) -> Vec<usize> {
        self.mesh
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.vertices.len() < 3)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.mesh.positions)
    }

    /// Compute the dimensions (width, depth, height) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        let aabb = self.aabb();
        if !aabb.is_valid() {
            return [0.0; 3];
        }
        aabb.extent().to_array()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.are_positions_finite() {
            let bad: Vec<_> = self
                .mesh
                .positions
                .iter()
                .enumerate()
                .filter(|(_, p)| !p.is_finite())
                .map(|(i, _)| i)
                .take(5)
                .collect();
            errors.push(format!("Non-finite vertex positions: {bad:?}"));
        }

        if !self.are_edges_in_range() {
            let n = self.mesh.vertex_count() as u32;
            let bad: Vec<_> = self
                .mesh
                .edges
                .iter()
                .enumerate()
                .filter(|(_, [a, b])| *a >= n || *b >= n)
                .map(|(i, _)| i)
                .take(5)
                .collect();
            errors.push(format!("Edges out of range (vertex_count={n}): {bad:?}"));
        }

        if !self.are_faces_in_range() {
            errors.push(format!(
                "Face loops reference vertices >= {}",
                self.mesh.vertex_count()
            ));
        }

        if !self.is_adjacency_in_range() {
            errors.push(format!(
                "Face edges reference edges >= {}",
                self.mesh.edge_count()
            ));
        }

        errors
    }

    /// `validate_all` folded into one error
    pub fn validate(&self) -> MeasureResult<()> {
        let errors = self.validate_all();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MeasureError::invalid_mesh(errors.join("; ")))
        }
    }
}
