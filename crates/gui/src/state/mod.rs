pub mod hover;
pub mod lines;
pub mod scene;
pub mod session;
pub mod settings;
pub mod wave;

use shared::SceneDescription;

use crate::engine::MeasureEngine;
use crate::error::MeasureResult;
use crate::host::Notice;
use crate::resolver::ResolveReport;

pub use hover::HoverState;
pub use lines::{Endpoint, FeatureKind, FeatureRef, LineModel, Segment};
pub use scene::{SceneObject, SceneState};
pub use session::{AxisLock, DrawSession, PendingSegment, ToolPhase};
pub use settings::{DisplaySettings, MeasureSettings, SnapSettings};
pub use wave::WaveAnimation;

/// Panel visibility flags
pub struct PanelVisibility {
    pub lines_panel: bool,
    pub status_bar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            lines_panel: true,
            status_bar: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub scene: SceneState,
    pub engine: MeasureEngine,
    pub wave: WaveAnimation,
    pub panels: PanelVisibility,
    /// Most recent notices, newest last
    pub notices: Vec<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            scene: SceneState::default(),
            engine: MeasureEngine::new(MeasureSettings::load()),
            wave: WaveAnimation::new("grid"),
            panels: PanelVisibility::default(),
            notices: Vec::new(),
        }
    }
}

impl AppState {
    const MAX_NOTICES: usize = 5;

    pub fn load_scene(&mut self, desc: &SceneDescription) -> ResolveReport {
        let mut changed = self.scene.ids();
        self.scene = SceneState::from_description(desc);
        changed.extend(self.scene.ids());
        self.engine.on_geometry_changed(&changed, &self.scene)
    }

    /// Per-frame update: run the wave and rebind endpoints it moved
    pub fn advance(&mut self, time: f64) -> MeasureResult<()> {
        let changed = self.wave.apply(&mut self.scene, time)?;
        if !changed.is_empty() {
            self.engine.on_geometry_changed(&changed, &self.scene);
        }
        Ok(())
    }

    pub fn stop_wave(&mut self) -> MeasureResult<()> {
        let changed = self.wave.stop(&mut self.scene)?;
        if !changed.is_empty() {
            self.engine.on_geometry_changed(&changed, &self.scene);
        }
        Ok(())
    }

    /// Move engine notices into the rolling notice list
    pub fn collect_notices(&mut self) {
        self.notices.extend(self.engine.take_notices());
        let excess = self.notices.len().saturating_sub(Self::MAX_NOTICES);
        self.notices.drain(..excess);
    }
}
