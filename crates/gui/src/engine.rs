//! The measuring tool: one owned object holding the line model, hover,
//! spatial cache and the optional drawing session.
//!
//! Input is dispatched on event kind into the session state machine:
//!
//! ```text
//! Idle --toggle--> Drawing --press--> Dragging --release--> Drawing
//!   ^                 |                  |
//!   +--toggle/Enter/Esc/RMB--------------+
//! ```

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use shared::{ObjectId, Rgba};

use crate::error::MeasureResult;
use crate::hit_test::HitTester;
use crate::host::{Notice, SceneQuery};
use crate::input::{EventResponse, InputEvent, InputKind, Key, PointerButton, Region};
use crate::overlay::{self, DrawList, OverlayLayer, OverlayRegistry};
use crate::resolver::{resolve_endpoints, ResolveReport};
use crate::spatial::SpatialIndexCache;
use crate::state::hover::HoverState;
use crate::state::lines::{LineModel, Segment};
use crate::state::session::{
    apply_axis_lock, classify_endpoint, AxisLock, DrawSession, PendingSegment, ToolPhase,
};
use crate::state::settings::MeasureSettings;
use crate::viewport::camera::ScreenProjection;

pub struct MeasureEngine {
    lines: LineModel,
    hover: HoverState,
    cache: SpatialIndexCache,
    overlays: OverlayRegistry,
    settings: MeasureSettings,
    session: Option<DrawSession>,
    lines_visible: bool,
    redraw_requested: bool,
    notices: Vec<Notice>,
}

impl Default for MeasureEngine {
    fn default() -> Self {
        Self::new(MeasureSettings::default())
    }
}

impl MeasureEngine {
    pub fn new(settings: MeasureSettings) -> Self {
        Self {
            lines: LineModel::new(),
            hover: HoverState::default(),
            cache: SpatialIndexCache::new(),
            overlays: OverlayRegistry::default(),
            settings,
            session: None,
            lines_visible: true,
            redraw_requested: false,
            notices: Vec::new(),
        }
    }

    // ── Session ──────────────────────────────────────────────

    /// Start a session when idle, end it when active.
    /// Returns whether a session is active afterwards.
    pub fn toggle_drawing(&mut self) -> bool {
        if self.session.is_some() {
            self.end_session("toggled off");
        } else {
            self.start_session();
        }
        self.session.is_some()
    }

    fn start_session(&mut self) {
        self.overlays.register(OverlayLayer::Segments);
        self.overlays.register(OverlayLayer::Labels);
        self.overlays.register(OverlayLayer::Hover);
        self.hover.reset();
        self.session = Some(DrawSession::new());
        self.lines_visible = true;
        self.redraw_requested = true;
        tracing::info!("measurement session started");
    }

    /// Drop the session and any uncommitted segment. Committed segments
    /// and their overlays stay.
    fn end_session(&mut self, reason: &str) {
        let Some(session) = self.session.take() else {
            return;
        };
        if session.pending.is_some() {
            tracing::debug!("discarding uncommitted segment");
        }
        self.hover.reset();
        self.overlays.detach(OverlayLayer::Hover);
        self.redraw_requested = true;
        tracing::info!(reason, "measurement session ended");
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> ToolPhase {
        self.session.as_ref().map_or(ToolPhase::Idle, DrawSession::phase)
    }

    pub fn axis_lock(&self) -> AxisLock {
        self.session.as_ref().map(|s| s.axis_lock).unwrap_or_default()
    }

    // ── Input ────────────────────────────────────────────────

    /// Feed one input event. Never fails; projection misses simply
    /// produce no snap for that event.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        scene: &dyn SceneQuery,
        projection: &dyn ScreenProjection,
    ) -> EventResponse {
        if self.session.is_none() {
            return EventResponse::PassThrough;
        }

        // Axis locks track key state wherever the pointer is
        if let InputKind::KeyPressed(key) | InputKind::KeyReleased(key) = event.kind {
            if let Some(axis) = key.axis() {
                let locked = matches!(event.kind, InputKind::KeyPressed(_));
                if let Some(session) = self.session.as_mut() {
                    session.axis_lock.set(axis, locked);
                }
                return if event.in_viewport() {
                    EventResponse::Consumed
                } else {
                    EventResponse::PassThrough
                };
            }
        }

        match event.region {
            Region::Viewport => {}
            Region::SidePanel | Region::OtherArea => return EventResponse::PassThrough,
            Region::Unknown => {
                if let InputKind::PointerPressed(_) = event.kind {
                    self.end_session("press outside known regions");
                }
                return EventResponse::PassThrough;
            }
        }

        match event.kind {
            InputKind::Wheel { .. }
            | InputKind::PointerPressed(PointerButton::Middle)
            | InputKind::PointerReleased(PointerButton::Middle) => EventResponse::PassThrough,

            InputKind::PointerMoved => {
                self.on_pointer_moved(event, scene, projection);
                EventResponse::Consumed
            }
            InputKind::PointerPressed(PointerButton::Primary) => {
                self.on_press(event, scene, projection);
                EventResponse::Consumed
            }
            InputKind::PointerReleased(PointerButton::Primary) => {
                self.on_release(event, scene, projection);
                EventResponse::Consumed
            }
            InputKind::PointerPressed(PointerButton::Secondary) | InputKind::KeyPressed(Key::Escape) => {
                self.end_session("cancelled");
                EventResponse::Cancelled
            }
            InputKind::KeyPressed(Key::Enter) => {
                self.end_session("confirmed");
                EventResponse::Finished
            }
            InputKind::PointerReleased(PointerButton::Secondary)
            | InputKind::KeyPressed(_)
            | InputKind::KeyReleased(_) => EventResponse::PassThrough,
        }
    }

    fn refresh_hover(&mut self, cursor: Vec2, time: f64, scene: &dyn SceneQuery, projection: &dyn ScreenProjection) {
        let tester = HitTester::new(
            self.settings.snap.vertex_threshold_px,
            self.settings.snap.edge_threshold_px,
        );
        let result = tester.find_nearest(cursor, scene, projection, &mut self.cache);
        self.hover.update(result, time);
        self.redraw_requested = true;
    }

    fn on_pointer_moved(&mut self, event: &InputEvent, scene: &dyn SceneQuery, projection: &dyn ScreenProjection) {
        if self.hover.is_due(event.time, self.settings.snap.hover_interval_ms) {
            self.refresh_hover(event.position, event.time, scene, projection);
        }
        self.update_drag(event.position, projection);
    }

    /// Move the pending end to the cursor, honoring snap and axis locks
    fn update_drag(&mut self, cursor: Vec2, projection: &dyn ScreenProjection) {
        let snap = self.hover.current().map(|h| h.position);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let lock = session.axis_lock;
        let Some(pending) = session.pending.as_mut() else {
            return;
        };
        let start = pending.start.position();
        let Some(raw) = projection.screen_to_world(cursor, start) else {
            return;
        };
        pending.end = apply_axis_lock(lock, start, raw, snap);
        self.redraw_requested = true;
    }

    fn on_press(&mut self, event: &InputEvent, scene: &dyn SceneQuery, projection: &dyn ScreenProjection) {
        if self.session.as_ref().map_or(true, DrawSession::is_dragging) {
            return;
        }
        self.refresh_hover(event.position, event.time, scene, projection);

        let start_point = match self.hover.current() {
            Some(hit) => hit.position,
            None => {
                let depth = Vec3::from_array(self.settings.snap.default_depth);
                match projection.screen_to_world(event.position, depth) {
                    Some(p) => p,
                    None => {
                        tracing::debug!("press did not project; ignored");
                        return;
                    }
                }
            }
        };
        let start = classify_endpoint(start_point, self.hover.current(), self.settings.snap.bind_tolerance);
        tracing::debug!(bound = start.is_bound(), ?start_point, "segment started");

        if let Some(session) = self.session.as_mut() {
            session.pending = Some(PendingSegment::new(start));
        }
        self.redraw_requested = true;
    }

    fn on_release(&mut self, event: &InputEvent, scene: &dyn SceneQuery, projection: &dyn ScreenProjection) {
        if !self.session.as_ref().is_some_and(DrawSession::is_dragging) {
            return;
        }
        // Classify against what is under the cursor now, not the last throttled test
        self.refresh_hover(event.position, event.time, scene, projection);
        self.update_drag(event.position, projection);
        let Some(pending) = self.session.as_mut().and_then(|s| s.pending.take()) else {
            return;
        };

        let mut end = classify_endpoint(pending.end, self.hover.current(), self.settings.snap.bind_tolerance);
        resolve_endpoints([&mut end], scene);
        self.hover.clear();

        let segment = pending.into_segment(end);
        tracing::info!(
            length = segment.length(),
            start_bound = segment.start.is_bound(),
            end_bound = segment.end.is_bound(),
            "segment committed"
        );
        self.lines.append(segment);
        self.redraw_requested = true;
    }

    // ── Geometry updates ─────────────────────────────────────

    /// Geometry-change notification: invalidate the spatial index for the
    /// changed objects and re-resolve every bound endpoint.
    pub fn on_geometry_changed(&mut self, changed: &[ObjectId], scene: &dyn SceneQuery) -> ResolveReport {
        for id in changed {
            if scene.evaluated_mesh(id).is_some() {
                self.cache.mark_dirty(id);
            } else {
                self.cache.evict(id);
            }
        }

        // Hovered positions were computed against the old geometry
        self.hover.reset();

        let mut report = resolve_endpoints(
            self.lines.iter_mut().flat_map(Segment::endpoints_mut),
            scene,
        );
        if let Some(pending) = self.session.as_mut().and_then(|s| s.pending.as_mut()) {
            report.merge(resolve_endpoints([&mut pending.start], scene));
        }

        if report.frozen > 0 {
            tracing::warn!(frozen = report.frozen, "bound endpoints kept at last known position");
        }
        self.redraw_requested = true;
        report
    }

    /// Drop cache entries for objects the scene no longer has
    pub fn prune_cache(&mut self, alive: &HashSet<ObjectId>) {
        self.cache.retain(alive);
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ── Line operations ──────────────────────────────────────

    /// Delete the segment at `index`; out-of-range requests leave the
    /// model unchanged and queue a warning.
    pub fn delete_line(&mut self, index: usize) -> MeasureResult<Segment> {
        match self.lines.remove_at(index) {
            Ok(segment) => {
                tracing::info!(index, "segment deleted");
                self.redraw_requested = true;
                Ok(segment)
            }
            Err(e) => {
                self.warn("Index out of bounds or list is empty", &e);
                Err(e)
            }
        }
    }

    pub fn set_line_color(&mut self, index: usize, color: Rgba) -> MeasureResult<()> {
        match self.lines.set_color(index, color) {
            Ok(()) => {
                self.redraw_requested = true;
                Ok(())
            }
            Err(e) => {
                self.warn("Cannot recolor line", &e);
                Err(e)
            }
        }
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
        self.redraw_requested = true;
    }

    /// Show or hide segments and labels. Hiding ends an active session.
    pub fn toggle_visibility(&mut self) -> bool {
        self.lines_visible = !self.lines_visible;
        if !self.lines_visible {
            self.end_session("lines hidden");
        }
        self.redraw_requested = true;
        self.lines_visible
    }

    pub fn lines_visible(&self) -> bool {
        self.lines_visible
    }

    pub fn lines(&self) -> &LineModel {
        &self.lines
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Segment being dragged, with its current end
    pub fn pending_segment(&self) -> Option<Segment> {
        self.session.as_ref()?.pending.as_ref().map(PendingSegment::preview)
    }

    pub fn settings(&self) -> &MeasureSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut MeasureSettings {
        self.redraw_requested = true;
        &mut self.settings
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn cache(&self) -> &SpatialIndexCache {
        &self.cache
    }

    // ── Notices ──────────────────────────────────────────────

    fn warn(&mut self, message: &str, err: &dyn std::fmt::Display) {
        tracing::warn!("{message}: {err}");
        self.notices.push(Notice::warning(message));
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ── Drawing ──────────────────────────────────────────────

    /// Draw commands for the current frame
    pub fn draw(&self, projection: &dyn ScreenProjection) -> DrawList {
        let mut list = DrawList::new();
        let display = &self.settings.display;
        let pending = self.pending_segment();

        if self.lines_visible {
            let segments = self.lines.iter().chain(pending.as_ref());
            if self.overlays.is_registered(OverlayLayer::Segments) {
                overlay::draw_segments(&mut list, segments.clone(), display);
            }
            if self.overlays.is_registered(OverlayLayer::Labels) {
                overlay::draw_labels(&mut list, segments, display, projection);
            }
        }

        if self.overlays.is_registered(OverlayLayer::Hover) {
            overlay::draw_hover(&mut list, &self.hover, projection);
        }
        list
    }
}
