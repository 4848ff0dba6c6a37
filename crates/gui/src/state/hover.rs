//! Snap candidate under the cursor, refreshed by the throttled hit-test

use crate::hit_test::{HitResult, SnapHit};

/// Feature currently under the cursor.
/// At most one of `vertex` / `edge` is set; vertex wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverState {
    vertex: Option<SnapHit>,
    edge: Option<SnapHit>,
    /// Host time of the last hit-test, for throttling
    last_update: Option<f64>,
}

impl HoverState {
    /// Replace the hover with a fresh hit-test result
    pub fn update(&mut self, result: HitResult, time: f64) {
        self.clear();
        self.vertex = result.vertex;
        if self.vertex.is_none() {
            self.edge = result.edge;
        }
        self.last_update = Some(time);
    }

    /// True when at least `interval_ms` passed since the last hit-test
    pub fn is_due(&self, time: f64, interval_ms: f64) -> bool {
        self.last_update
            .map_or(true, |last| (time - last) * 1000.0 >= interval_ms || time < last)
    }

    pub fn clear(&mut self) {
        self.vertex = None;
        self.edge = None;
    }

    /// Forget the throttle clock too, so the next move re-tests immediately
    pub fn reset(&mut self) {
        self.clear();
        self.last_update = None;
    }

    pub fn vertex(&self) -> Option<&SnapHit> {
        self.vertex.as_ref()
    }

    pub fn edge(&self) -> Option<&SnapHit> {
        self.edge.as_ref()
    }

    /// Hovered vertex, else hovered edge point
    pub fn current(&self) -> Option<&SnapHit> {
        self.vertex.as_ref().or(self.edge.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_none()
    }
}
