//! Per-object BVH cache, rebuilt lazily after geometry changes

use std::collections::{HashMap, HashSet};

use glam::Mat4;
use shared::ObjectId;

use super::bvh::{Bvh, BvhTriangle};
use crate::host::SceneQuery;
use crate::viewport::picking::transform_triangle;

/// Cached acceleration data for one mesh object
#[derive(Debug, Clone)]
pub struct SpatialIndexEntry {
    /// World-space triangles of the evaluated mesh
    pub bvh: Bvh,
    /// World transform the BVH was built with
    pub transform: Mat4,
    /// Vertices outside every face; the BVH never reaches them
    pub loose_vertices: Vec<u32>,
    /// Edges outside every face
    pub loose_edges: Vec<u32>,
    dirty: bool,
}

impl SpatialIndexEntry {
    fn build(mesh: &crate::viewport::mesh::MeshData, transform: Mat4) -> Self {
        let triangles: Vec<BvhTriangle> = mesh
            .triangles()
            .into_iter()
            .map(|(tri, face)| BvhTriangle {
                vertices: transform_triangle(&transform, &tri),
                face,
            })
            .filter(|t| t.vertices.iter().all(|v| v.is_finite()))
            .collect();

        Self {
            bvh: Bvh::build(triangles),
            transform,
            loose_vertices: mesh.loose_vertices(),
            loose_edges: mesh.loose_edges(),
            dirty: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Cached BVHs keyed by object id.
///
/// Entries are built on first access and after `mark_dirty`; a moved
/// object (transform differs from the snapshot) is rebuilt as well, so a
/// query never sees a stale structure.
#[derive(Debug, Default)]
pub struct SpatialIndexCache {
    entries: HashMap<ObjectId, SpatialIndexEntry>,
    rebuild_count: u64,
}

impl SpatialIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `id`, building it first when missing or dirty.
    /// None only when the scene has no mesh under that id.
    pub fn get(&mut self, id: &str, scene: &dyn SceneQuery) -> Option<&SpatialIndexEntry> {
        let Some(evaluated) = scene.evaluated_mesh(id) else {
            self.entries.remove(id);
            return None;
        };

        let stale = match self.entries.get(id) {
            Some(entry) => entry.dirty || entry.transform != evaluated.transform,
            None => true,
        };

        if stale {
            let entry = SpatialIndexEntry::build(evaluated.mesh, evaluated.transform);
            tracing::debug!(
                object = id,
                triangles = entry.bvh.triangle_count(),
                "spatial index rebuilt"
            );
            self.rebuild_count += 1;
            self.entries.insert(id.to_string(), entry);
        }

        self.entries.get(id)
    }

    /// Flag an object's index as out of date. Cheap; the rebuild happens on the next `get`.
    pub fn mark_dirty(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.dirty = true;
        }
    }

    pub fn mark_all_dirty(&mut self) {
        for entry in self.entries.values_mut() {
            entry.dirty = true;
        }
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.entries.get(id).is_some_and(|e| e.dirty)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn evict(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Drop entries for objects that are no longer in `alive`
    pub fn retain(&mut self, alive: &HashSet<ObjectId>) {
        self.entries.retain(|id, _| alive.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of BVH builds since creation
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EvaluatedMesh;
    use crate::viewport::mesh::{cube, MeshData};
    use crate::viewport::picking::Ray;
    use glam::Vec3;

    struct OneMesh {
        mesh: MeshData,
        transform: Mat4,
    }

    impl SceneQuery for OneMesh {
        fn visible_objects(&self) -> Vec<ObjectId> {
            vec!["m".into()]
        }

        fn evaluated_mesh(&self, id: &str) -> Option<EvaluatedMesh<'_>> {
            (id == "m").then_some(EvaluatedMesh {
                mesh: &self.mesh,
                transform: self.transform,
            })
        }
    }

    fn scene() -> OneMesh {
        OneMesh {
            mesh: cube(2.0, 2.0, 2.0),
            transform: Mat4::IDENTITY,
        }
    }

    #[test]
    fn test_built_once_per_dirty_cycle() {
        let scene = scene();
        let mut cache = SpatialIndexCache::new();

        for _ in 0..5 {
            assert!(cache.get("m", &scene).is_some());
        }
        assert_eq!(cache.rebuild_count(), 1);

        cache.mark_dirty("m");
        assert!(cache.is_dirty("m"));
        cache.get("m", &scene);
        cache.get("m", &scene);
        assert_eq!(cache.rebuild_count(), 2);
        assert!(!cache.is_dirty("m"));
    }

    #[test]
    fn test_transform_change_forces_rebuild() {
        let mut scene = scene();
        let mut cache = SpatialIndexCache::new();
        cache.get("m", &scene);

        scene.transform = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let entry = cache.get("m", &scene).unwrap();
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        let hit = entry.bvh.raycast(&ray, f32::INFINITY).unwrap();
        assert!((hit.point.z - 1.0).abs() < 1e-5);
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn test_empty_mesh_gives_empty_index() {
        let scene = OneMesh {
            mesh: MeshData::default(),
            transform: Mat4::IDENTITY,
        };
        let mut cache = SpatialIndexCache::new();
        let entry = cache.get("m", &scene).unwrap();
        assert!(entry.bvh.is_empty());
        assert!(entry.loose_vertices.is_empty());
    }

    #[test]
    fn test_unknown_object_is_evicted() {
        let scene = scene();
        let mut cache = SpatialIndexCache::new();
        cache.get("m", &scene);
        assert!(cache.get("other", &scene).is_none());
        assert!(cache.contains("m"));
        assert!(cache.evict("m"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_mark_dirty_on_missing_entry_is_noop() {
        let mut cache = SpatialIndexCache::new();
        cache.mark_dirty("ghost");
        assert!(!cache.is_dirty("ghost"));
        assert_eq!(cache.len(), 0);
    }
}
