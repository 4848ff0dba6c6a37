//! Factory functions for creating test and demo scenes.
//!
//! Provides `MeshDescription` / `SceneDescription` builders used by the
//! headless harness, integration tests and the GUI's start-up scene.

use shared::*;

use crate::helpers::mesh_to_description;
use crate::viewport::mesh::grid;

// ── Mesh factories ──────────────────────────────────────────────

/// Axis-aligned box centred at `position`: 8 vertices, 6 quads.
pub fn box_mesh(id: &str, size: [f32; 3], position: [f32; 3]) -> MeshDescription {
    let [hx, hy, hz] = size.map(|s| s * 0.5);
    MeshDescription {
        id: id.to_string(),
        name: "Box".to_string(),
        visible: true,
        transform: Transform::at(position),
        vertices: vec![
            [-hx, -hy, -hz],
            [hx, -hy, -hz],
            [hx, hy, -hz],
            [-hx, hy, -hz],
            [-hx, -hy, hz],
            [hx, -hy, hz],
            [hx, hy, hz],
            [-hx, hy, hz],
        ],
        faces: vec![
            vec![4, 5, 6, 7],
            vec![1, 0, 3, 2],
            vec![5, 1, 2, 6],
            vec![0, 4, 7, 3],
            vec![7, 6, 2, 3],
            vec![0, 1, 5, 4],
        ],
        loose_edges: Vec::new(),
    }
}

/// Cube with equal sides.
pub fn cube_mesh(id: &str, size: f32, position: [f32; 3]) -> MeshDescription {
    box_mesh(id, [size; 3], position)
}

/// Mesh made of one loose vertex.
pub fn point_mesh(id: &str, position: [f32; 3]) -> MeshDescription {
    MeshDescription {
        id: id.to_string(),
        name: "Point".to_string(),
        visible: true,
        transform: Transform::new(),
        vertices: vec![position],
        faces: Vec::new(),
        loose_edges: Vec::new(),
    }
}

/// Two vertices joined by a loose edge.
pub fn wire_mesh(id: &str, a: [f32; 3], b: [f32; 3]) -> MeshDescription {
    MeshDescription {
        id: id.to_string(),
        name: "Wire".to_string(),
        visible: true,
        transform: Transform::new(),
        vertices: vec![a, b],
        faces: Vec::new(),
        loose_edges: vec![[0, 1]],
    }
}

/// Flat grid in the XY plane, `cells` quads per side, centred at `position`.
pub fn grid_mesh(id: &str, size: f32, cells: u32, position: [f32; 3]) -> MeshDescription {
    mesh_to_description(id, "Grid", &grid(size, cells), &Transform::at(position))
}

// ── SceneDescription factories ──────────────────────────────────

/// Wrap meshes into a SceneDescription.
pub fn scene(meshes: Vec<MeshDescription>) -> SceneDescription {
    SceneDescription { meshes }
}

/// Empty scene.
pub fn empty_scene() -> SceneDescription {
    SceneDescription::default()
}

/// Scene with a single 2x2x2 cube at the origin.
pub fn scene_single_cube() -> SceneDescription {
    scene(vec![cube_mesh("cube", 2.0, [0.0; 3])])
}

/// Start-up scene of the GUI: a cube, a deformable grid and a wire.
pub fn demo_scene() -> SceneDescription {
    let mut grid = grid_mesh("grid", 6.0, 12, [0.0, 0.0, -1.0]);
    grid.name = "Wave".to_string();
    scene(vec![
        cube_mesh("cube", 2.0, [0.0, 0.0, 0.0]),
        grid,
        wire_mesh("wire", [-3.0, 3.0, 0.0], [3.0, 3.0, 1.5]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let g = grid_mesh("g", 2.0, 2, [0.0; 3]);
        assert_eq!(g.vertices.len(), 9);
        assert_eq!(g.faces.len(), 4);
    }

    #[test]
    fn test_demo_scene_ids() {
        let ids: Vec<_> = demo_scene().meshes.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["cube", "grid", "wire"]);
    }
}
