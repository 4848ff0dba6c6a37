//! Conversions between wire types and engine types

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{MeshDescription, Transform};

use crate::viewport::mesh::MeshData;

/// World matrix for a transform (rotation in degrees, XYZ order)
pub fn transform_matrix(t: &Transform) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        t.rotation[0].to_radians(),
        t.rotation[1].to_radians(),
        t.rotation[2].to_radians(),
    );
    Mat4::from_scale_rotation_translation(
        Vec3::from_array(t.scale),
        rotation,
        Vec3::from_array(t.position),
    )
}

/// Build evaluated mesh data from a scene description entry
pub fn mesh_from_description(desc: &MeshDescription) -> MeshData {
    let positions = desc.vertices.iter().copied().map(Vec3::from_array).collect();
    let mut mesh = MeshData::from_polygons(positions, desc.faces.clone());
    for &[a, b] in &desc.loose_edges {
        mesh = mesh.with_loose_edge(a, b);
    }
    mesh
}

/// Inverse of [`mesh_from_description`] for saving scenes
pub fn mesh_to_description(id: &str, name: &str, mesh: &MeshData, transform: &Transform) -> MeshDescription {
    let loose = mesh.loose_edges();
    MeshDescription {
        id: id.to_string(),
        name: name.to_string(),
        visible: true,
        transform: transform.clone(),
        vertices: mesh.positions.iter().map(|p| p.to_array()).collect(),
        faces: mesh.faces.iter().map(|f| f.vertices.clone()).collect(),
        loose_edges: loose.iter().map(|&e| mesh.edges[e as usize]).collect(),
    }
}

/// Human-readable length, e.g. `"1.50 m"`; the unit is omitted when empty
pub fn format_length(length: f32, precision: usize, unit: &str) -> String {
    if unit.is_empty() {
        format!("{length:.precision$}")
    } else {
        format!("{length:.precision$} {unit}")
    }
}
