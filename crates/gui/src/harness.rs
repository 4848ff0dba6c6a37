//! Headless test harness for driving the measuring tool programmatically.
//!
//! Wraps a `SceneState`, a top-down `OrthoView` (world origin at pixel
//! (100, 100), 50 pixels per unit) and a `MeasureEngine`. Every emitted
//! event advances a private clock past the hover throttle, so each move
//! re-runs the hit test.

use glam::{Vec2, Vec3};
use shared::{MeshDescription, ObjectId, SceneDescription, Transform};

use crate::engine::MeasureEngine;
use crate::error::MeasureResult;
use crate::helpers::mesh_from_description;
use crate::input::{EventResponse, InputEvent, InputKind, Key, PointerButton, Region};
use crate::overlay::DrawList;
use crate::resolver::ResolveReport;
use crate::state::scene::{SceneObject, SceneState};
use crate::state::settings::MeasureSettings;
use crate::viewport::camera::{OrthoView, ScreenProjection};
use crate::viewport::mesh::MeshData;

/// Seconds added to the clock per event; above the default hover interval
const TICK: f64 = 0.05;

pub struct TestHarness {
    pub scene: SceneState,
    pub view: OrthoView,
    pub engine: MeasureEngine,
    clock: f64,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(MeasureSettings::default())
    }

    pub fn with_settings(settings: MeasureSettings) -> Self {
        Self {
            scene: SceneState::new(),
            view: OrthoView::new(Vec2::new(100.0, 100.0), 50.0),
            engine: MeasureEngine::new(settings),
            clock: 0.0,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Load a scene (replaces current) and rebind every endpoint
    pub fn load_scene(&mut self, desc: &SceneDescription) -> ResolveReport {
        let mut changed = self.scene.ids();
        self.scene = SceneState::from_description(desc);
        changed.extend(self.scene.ids());
        self.engine.on_geometry_changed(&changed, &self.scene)
    }

    pub fn load_scene_json(&mut self, json: &str) -> MeasureResult<ResolveReport> {
        let desc = SceneDescription::from_json(json)?;
        Ok(self.load_scene(&desc))
    }

    pub fn export_scene_json(&self) -> MeasureResult<String> {
        Ok(self.scene.to_description().to_json()?)
    }

    /// Add a mesh from its description; returns the object id
    pub fn add(&mut self, desc: &MeshDescription) -> MeasureResult<ObjectId> {
        let mut object = SceneObject::new(desc.id.clone(), mesh_from_description(desc), desc.transform.clone());
        object.name = desc.name.clone();
        object.visible = desc.visible;
        let changed = self.scene.add(object)?;
        self.engine.on_geometry_changed(&changed, &self.scene);
        Ok(desc.id.clone())
    }

    pub fn add_mesh(&mut self, id: &str, mesh: MeshData, transform: Transform) -> MeasureResult<ObjectId> {
        let changed = self.scene.add_mesh(id, mesh, transform)?;
        self.engine.on_geometry_changed(&changed, &self.scene);
        Ok(id.to_string())
    }

    pub fn set_transform(&mut self, id: &str, transform: Transform) -> MeasureResult<ResolveReport> {
        let changed = self.scene.set_transform(id, transform)?;
        Ok(self.engine.on_geometry_changed(&changed, &self.scene))
    }

    pub fn move_object(&mut self, id: &str, position: [f32; 3]) -> MeasureResult<ResolveReport> {
        let mut transform = self
            .scene
            .get(id)
            .map(|o| o.transform().clone())
            .unwrap_or_default();
        transform.position = position;
        self.set_transform(id, transform)
    }

    pub fn move_vertex(&mut self, id: &str, index: u32, position: Vec3) -> MeasureResult<ResolveReport> {
        let changed = self.scene.move_vertex(id, index, position)?;
        Ok(self.engine.on_geometry_changed(&changed, &self.scene))
    }

    pub fn truncate_vertices(&mut self, id: &str, count: usize) -> MeasureResult<ResolveReport> {
        let changed = self.scene.truncate_vertices(id, count)?;
        Ok(self.engine.on_geometry_changed(&changed, &self.scene))
    }

    pub fn replace_mesh(&mut self, id: &str, mesh: MeshData) -> MeasureResult<ResolveReport> {
        let changed = self.scene.replace_mesh(id, mesh)?;
        Ok(self.engine.on_geometry_changed(&changed, &self.scene))
    }

    pub fn remove(&mut self, id: &str) -> MeasureResult<ResolveReport> {
        let changed = self.scene.remove(id)?;
        Ok(self.engine.on_geometry_changed(&changed, &self.scene))
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> MeasureResult<ResolveReport> {
        let changed = self.scene.set_visible(id, visible)?;
        Ok(self.engine.on_geometry_changed(&changed, &self.scene))
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Emit one event at `pixel` in `region`
    pub fn event_in(&mut self, kind: InputKind, pixel: Vec2, region: Region) -> EventResponse {
        self.clock += TICK;
        let event = InputEvent::new(kind, pixel, region, self.clock);
        self.engine.handle_event(&event, &self.scene, &self.view)
    }

    pub fn event(&mut self, kind: InputKind, pixel: Vec2) -> EventResponse {
        self.event_in(kind, pixel, Region::Viewport)
    }

    pub fn move_to(&mut self, pixel: Vec2) -> EventResponse {
        self.event(InputKind::PointerMoved, pixel)
    }

    pub fn press(&mut self, pixel: Vec2) -> EventResponse {
        self.event(InputKind::PointerPressed(PointerButton::Primary), pixel)
    }

    pub fn release(&mut self, pixel: Vec2) -> EventResponse {
        self.event(InputKind::PointerReleased(PointerButton::Primary), pixel)
    }

    pub fn key_down(&mut self, key: Key) -> EventResponse {
        self.event(InputKind::KeyPressed(key), Vec2::ZERO)
    }

    pub fn key_up(&mut self, key: Key) -> EventResponse {
        self.event(InputKind::KeyReleased(key), Vec2::ZERO)
    }

    /// Move, press, move, release. Returns the release response.
    pub fn drag(&mut self, from: Vec2, to: Vec2) -> EventResponse {
        self.move_to(from);
        self.press(from);
        self.move_to(to);
        self.release(to)
    }

    /// Draw one segment between two pixels, starting a session if needed.
    /// Returns the new segment's index, or None if nothing was committed.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2) -> Option<usize> {
        if !self.engine.is_drawing() {
            self.engine.toggle_drawing();
        }
        let before = self.engine.lines().len();
        self.drag(from, to);
        (self.engine.lines().len() > before).then(|| self.engine.lines().len() - 1)
    }

    // ── Inspection ────────────────────────────────────────────

    /// Pixel a world point projects to
    pub fn pixel_of(&self, world: Vec3) -> Option<Vec2> {
        self.view.world_to_screen(world)
    }

    /// Current endpoint positions of segment `index`
    pub fn line_positions(&self, index: usize) -> Option<(Vec3, Vec3)> {
        let seg = self.engine.lines().get(index)?;
        Some((seg.start.position(), seg.end.position()))
    }

    pub fn line_count(&self) -> usize {
        self.engine.lines().len()
    }

    pub fn draw(&self) -> DrawList {
        self.engine.draw(&self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cube_mesh;

    #[test]
    fn test_draw_line_commits() {
        let mut h = TestHarness::new();
        h.add(&cube_mesh("cube", 2.0, [0.0; 3])).unwrap();
        let index = h.draw_line(Vec2::new(50.0, 150.0), Vec2::new(150.0, 50.0)).unwrap();
        assert_eq!(index, 0);
        let (a, b) = h.line_positions(0).unwrap();
        assert!(a.abs_diff_eq(Vec3::new(-1.0, -1.0, 1.0), 1e-5));
        assert!(b.abs_diff_eq(Vec3::new(1.0, 1.0, 1.0), 1e-5));
    }

    #[test]
    fn test_clock_advances() {
        let mut h = TestHarness::new();
        let t0 = h.now();
        h.move_to(Vec2::ZERO);
        h.move_to(Vec2::ZERO);
        assert!(h.now() - t0 >= 2.0 * TICK - 1e-9);
    }
}
