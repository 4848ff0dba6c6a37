//! Animated sine deformation of one scene object.
//!
//! Displaces each vertex along local Z by a travelling wave over its rest
//! position, so bound endpoints on the object move every frame.

use glam::Vec3;
use shared::ObjectId;

use crate::error::{MeasureError, MeasureResult};
use crate::state::scene::SceneState;

#[derive(Debug, Clone)]
pub struct WaveAnimation {
    pub target: ObjectId,
    pub enabled: bool,
    pub amplitude: f32,
    pub wavelength: f32,
    /// Radians per second
    pub speed: f32,
    rest: Vec<Vec3>,
}

impl WaveAnimation {
    pub fn new(target: impl Into<ObjectId>) -> Self {
        Self {
            target: target.into(),
            enabled: false,
            amplitude: 0.4,
            wavelength: 3.0,
            speed: 1.5,
            rest: Vec::new(),
        }
    }

    /// Displaced position of a rest vertex at `time` seconds
    pub fn displace(&self, rest: Vec3, time: f64) -> Vec3 {
        let k = std::f32::consts::TAU / self.wavelength.max(1e-3);
        let phase = k * (rest.x + rest.y) - self.speed * time as f32;
        rest + Vec3::Z * self.amplitude * phase.sin()
    }

    /// Deform the target for `time`. Captures the rest pose on first use
    /// or after the vertex count changed. Returns the changed ids.
    pub fn apply(&mut self, scene: &mut SceneState, time: f64) -> MeasureResult<Vec<ObjectId>> {
        if !self.enabled {
            return Ok(Vec::new());
        }
        let object = scene
            .get(&self.target)
            .ok_or_else(|| MeasureError::unknown_object(self.target.as_str()))?;
        if self.rest.len() != object.mesh.vertex_count() {
            self.rest = object.mesh.positions.clone();
        }
        let positions = self.rest.iter().map(|&p| self.displace(p, time)).collect();
        scene.set_positions(&self.target, positions)
    }

    /// Put the target back into its rest pose and stop animating
    pub fn stop(&mut self, scene: &mut SceneState) -> MeasureResult<Vec<ObjectId>> {
        self.enabled = false;
        if self.rest.is_empty() {
            return Ok(Vec::new());
        }
        let rest = std::mem::take(&mut self.rest);
        scene.set_positions(&self.target, rest)
    }
}
