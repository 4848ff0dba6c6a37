//! Drawing session state: axis locks and the segment being dragged

use glam::Vec3;
use shared::Rgba;

use crate::hit_test::SnapHit;
use crate::state::lines::{Endpoint, Segment};

/// Coarse tool state reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolPhase {
    #[default]
    Idle,
    /// Session active, no button held
    Drawing,
    /// Primary button held, segment follows the cursor
    Dragging,
}

/// Held axis-lock keys, any combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisLock([bool; 3]);

impl AxisLock {
    pub fn new(x: bool, y: bool, z: bool) -> Self {
        Self([x, y, z])
    }

    pub fn set(&mut self, axis: usize, locked: bool) {
        if let Some(slot) = self.0.get_mut(axis) {
            *slot = locked;
        }
    }

    pub fn is_locked(&self, axis: usize) -> bool {
        self.0.get(axis).copied().unwrap_or(false)
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|l| *l)
    }

    pub fn clear(&mut self) {
        self.0 = [false; 3];
    }

    pub fn label(&self) -> String {
        ["X", "Y", "Z"]
            .iter()
            .zip(self.0)
            .filter(|(_, locked)| *locked)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// End position for a drag.
///
/// Without locks a hovered feature wins outright. With locks, each locked
/// coordinate comes from the snap target (or the start point when nothing
/// is hovered) and the free coordinates follow the cursor.
pub fn apply_axis_lock(lock: AxisLock, start: Vec3, raw: Vec3, snap: Option<Vec3>) -> Vec3 {
    if !lock.any() {
        return snap.unwrap_or(raw);
    }
    let reference = snap.unwrap_or(start);
    let mut out = raw;
    for axis in 0..3 {
        if lock.is_locked(axis) {
            out[axis] = reference[axis];
        }
    }
    out
}

/// Bind `point` to the hovered feature when it sits on it, else keep it static
pub fn classify_endpoint(point: Vec3, hovered: Option<&SnapHit>, tolerance: f32) -> Endpoint {
    match hovered {
        Some(hit) if hit.position.distance(point) <= tolerance => {
            Endpoint::bound(hit.feature.clone(), point)
        }
        _ => Endpoint::Static(point),
    }
}

/// Segment under construction; lives outside the line model until release
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSegment {
    pub start: Endpoint,
    pub end: Vec3,
    pub color: Option<Rgba>,
}

impl PendingSegment {
    pub fn new(start: Endpoint) -> Self {
        let end = start.position();
        Self {
            start,
            end,
            color: None,
        }
    }

    pub fn into_segment(self, end: Endpoint) -> Segment {
        let mut segment = Segment::new(self.start, end);
        segment.color = self.color;
        segment
    }

    /// Preview as a segment with a static end
    pub fn preview(&self) -> Segment {
        let mut segment = Segment::new(self.start.clone(), Endpoint::Static(self.end));
        segment.color = self.color;
        segment
    }
}

/// One modal drawing session
#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    pub axis_lock: AxisLock,
    pub pending: Option<PendingSegment>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ToolPhase {
        if self.pending.is_some() {
            ToolPhase::Dragging
        } else {
            ToolPhase::Drawing
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.pending.is_some()
    }
}
