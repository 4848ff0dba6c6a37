//! In-memory host scene: ordered mesh objects with world transforms.
//!
//! Every mutation returns the ids it changed; the host forwards them to
//! `MeasureEngine::on_geometry_changed`.

use glam::{Mat4, Vec3};
use shared::{ObjectId, SceneDescription, Transform};

use crate::error::{MeasureError, MeasureResult};
use crate::helpers::{mesh_from_description, mesh_to_description, transform_matrix};
use crate::host::{EvaluatedMesh, SceneQuery};
use crate::validation::MeshValidator;
use crate::viewport::mesh::MeshData;

pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub visible: bool,
    pub mesh: MeshData,
    transform: Transform,
    matrix: Mat4,
}

impl SceneObject {
    pub fn new(id: impl Into<ObjectId>, mesh: MeshData, transform: Transform) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            visible: true,
            mesh,
            matrix: transform_matrix(&transform),
            transform,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// World position of a vertex
    pub fn world_vertex(&self, index: u32) -> Option<Vec3> {
        self.mesh.position(index).map(|p| self.matrix.transform_point3(p))
    }
}

/// Scene with a version counter bumped on every mutation
#[derive(Default)]
pub struct SceneState {
    objects: Vec<SceneObject>,
    version: u64,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a scene, skipping meshes that fail validation
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut scene = Self::new();
        for mesh_desc in &desc.meshes {
            let mesh = mesh_from_description(mesh_desc);
            if let Err(e) = MeshValidator::new(&mesh).validate() {
                tracing::warn!(object = %mesh_desc.id, "skipping mesh: {e}");
                continue;
            }
            let mut object = SceneObject::new(mesh_desc.id.clone(), mesh, mesh_desc.transform.clone());
            if !mesh_desc.name.is_empty() {
                object.name = mesh_desc.name.clone();
            }
            object.visible = mesh_desc.visible;
            scene.objects.push(object);
        }
        tracing::info!("scene loaded ({} meshes)", scene.objects.len());
        scene
    }

    pub fn from_json(json: &str) -> MeasureResult<Self> {
        let desc = SceneDescription::from_json(json)?;
        Ok(Self::from_description(&desc))
    }

    pub fn to_description(&self) -> SceneDescription {
        SceneDescription {
            meshes: self
                .objects
                .iter()
                .map(|o| {
                    let mut desc = mesh_to_description(&o.id, &o.name, &o.mesh, &o.transform);
                    desc.visible = o.visible;
                    desc
                })
                .collect(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: &str) -> MeasureResult<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| MeasureError::unknown_object(id))
    }

    fn changed(&mut self, id: &str) -> Vec<ObjectId> {
        self.version += 1;
        vec![id.to_string()]
    }

    /// Add an object, replacing any object with the same id
    pub fn add(&mut self, object: SceneObject) -> MeasureResult<Vec<ObjectId>> {
        MeshValidator::new(&object.mesh).validate()?;
        let id = object.id.clone();
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(slot) => *slot = object,
            None => self.objects.push(object),
        }
        Ok(self.changed(&id))
    }

    pub fn add_mesh(&mut self, id: &str, mesh: MeshData, transform: Transform) -> MeasureResult<Vec<ObjectId>> {
        self.add(SceneObject::new(id, mesh, transform))
    }

    pub fn set_transform(&mut self, id: &str, transform: Transform) -> MeasureResult<Vec<ObjectId>> {
        let object = self.get_mut(id)?;
        object.matrix = transform_matrix(&transform);
        object.transform = transform;
        Ok(self.changed(id))
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> MeasureResult<Vec<ObjectId>> {
        self.get_mut(id)?.visible = visible;
        Ok(self.changed(id))
    }

    /// Move one vertex (local coordinates)
    pub fn move_vertex(&mut self, id: &str, index: u32, position: Vec3) -> MeasureResult<Vec<ObjectId>> {
        let object = self.get_mut(id)?;
        let count = object.mesh.vertex_count();
        let slot = object.mesh.positions.get_mut(index as usize).ok_or_else(|| {
            MeasureError::invalid_mesh(format!("vertex {index} out of range ({count} vertices)"))
        })?;
        *slot = position;
        Ok(self.changed(id))
    }

    /// Overwrite all vertex positions at once (deformation), keeping topology
    pub fn set_positions(&mut self, id: &str, positions: Vec<Vec3>) -> MeasureResult<Vec<ObjectId>> {
        let object = self.get_mut(id)?;
        if positions.len() != object.mesh.vertex_count() {
            return Err(MeasureError::invalid_mesh(format!(
                "expected {} positions, got {}",
                object.mesh.vertex_count(),
                positions.len()
            )));
        }
        object.mesh.positions = positions;
        Ok(self.changed(id))
    }

    pub fn replace_mesh(&mut self, id: &str, mesh: MeshData) -> MeasureResult<Vec<ObjectId>> {
        MeshValidator::new(&mesh).validate()?;
        self.get_mut(id)?.mesh = mesh;
        Ok(self.changed(id))
    }

    /// Keep only the first `count` vertices, dropping every face and edge
    /// that used a removed one
    pub fn truncate_vertices(&mut self, id: &str, count: usize) -> MeasureResult<Vec<ObjectId>> {
        let object = self.get_mut(id)?;
        let limit = count as u32;
        let mesh = &object.mesh;

        let positions: Vec<Vec3> = mesh.positions.iter().take(count).copied().collect();
        let polygons: Vec<Vec<u32>> = mesh
            .faces
            .iter()
            .filter(|f| f.vertices.iter().all(|&v| v < limit))
            .map(|f| f.vertices.clone())
            .collect();
        let loose: Vec<[u32; 2]> = mesh
            .loose_edges()
            .into_iter()
            .map(|e| mesh.edges[e as usize])
            .filter(|[a, b]| *a < limit && *b < limit)
            .collect();

        let mut truncated = MeshData::from_polygons(positions, polygons);
        for [a, b] in loose {
            truncated = truncated.with_loose_edge(a, b);
        }
        object.mesh = truncated;
        Ok(self.changed(id))
    }

    pub fn remove(&mut self, id: &str) -> MeasureResult<Vec<ObjectId>> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| MeasureError::unknown_object(id))?;
        self.objects.remove(index);
        Ok(self.changed(id))
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id.clone()).collect()
    }
}

impl SceneQuery for SceneState {
    fn visible_objects(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.visible)
            .map(|o| o.id.clone())
            .collect()
    }

    fn evaluated_mesh(&self, id: &str) -> Option<EvaluatedMesh<'_>> {
        self.get(id).map(|o| EvaluatedMesh {
            mesh: &o.mesh,
            transform: o.matrix,
        })
    }
}
