//! Interfaces the engine consumes from the host application.
//!
//! The host owns the scene and the window; the engine only reads evaluated
//! geometry through [`SceneQuery`] and reports user-facing problems as
//! [`Notice`]s.

use glam::Mat4;
use shared::ObjectId;

use crate::viewport::mesh::MeshData;

/// Evaluated mesh of one scene object plus its world transform
#[derive(Clone, Copy)]
pub struct EvaluatedMesh<'a> {
    pub mesh: &'a MeshData,
    pub transform: Mat4,
}

/// Read access to the host scene.
pub trait SceneQuery {
    /// Ids of visible mesh objects, in a stable order
    fn visible_objects(&self) -> Vec<ObjectId>;

    /// Post-deformation mesh data for an object (visible or not)
    fn evaluated_mesh(&self, id: &str) -> Option<EvaluatedMesh<'_>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Message for the host's notification surface (status bar, report area)
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}
