//! Measuring tool settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{LengthUnit, Rgba};

use crate::error::{MeasureError, MeasureResult};

pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 10.0..=50.0;
pub const MAX_PRECISION: usize = 6;

/// Label and line appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Font size for length labels
    pub font_size: f32,
    /// Number of decimal places for length labels
    pub precision: usize,
    /// Unit suffix for length labels
    pub unit: LengthUnit,
    /// Multiplier from world units to displayed length
    pub scale_length: f32,
    /// Color of segments without their own color
    pub line_color: Rgba,
    /// Line thickness in pixels
    pub line_width: f32,
    /// Dash length in world units; gaps are the same length
    pub dash_length: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            precision: 2,
            unit: LengthUnit::Meters,
            scale_length: 1.0,
            line_color: [1.0, 1.0, 0.0, 1.0],
            line_width: 3.0,
            dash_length: 0.5,
        }
    }
}

/// Snapping and binding behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Vertex highlight radius in pixels
    pub vertex_threshold_px: f32,
    /// Edge highlight radius in pixels
    pub edge_threshold_px: f32,
    /// Minimum time between hover updates
    pub hover_interval_ms: f64,
    /// Max distance between a click and a hovered feature for the endpoint to bind
    pub bind_tolerance: f32,
    /// Depth reference for clicks that hit nothing
    pub default_depth: [f32; 3],
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            vertex_threshold_px: 20.0,
            edge_threshold_px: 20.0,
            hover_interval_ms: 20.0,
            bind_tolerance: 1e-6,
            default_depth: [0.0, 0.0, 0.0],
        }
    }
}

/// All measuring tool settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureSettings {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub snap: SnapSettings,
}

impl MeasureSettings {
    /// Default location: `<config dir>/settings.json`
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dimline", "dimline")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or return defaults if missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(MeasureError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "settings ignored: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to the config dir
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("no config directory, settings not saved");
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::warn!(path = %path.display(), "failed to save settings: {e}");
        }
    }

    pub fn load_from(path: &Path) -> MeasureResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> MeasureResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| MeasureError::Settings(format!("no parent dir for {}", path.display())))?;
        std::fs::create_dir_all(dir)?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.display.font_size = size.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
    }

    pub fn set_precision(&mut self, digits: usize) {
        self.display.precision = digits.min(MAX_PRECISION);
    }

    /// Pull hand-edited values back into range
    pub fn sanitize(&mut self) {
        self.set_font_size(self.display.font_size);
        self.set_precision(self.display.precision);
        if !(self.display.dash_length > 0.0) {
            self.display.dash_length = DisplaySettings::default().dash_length;
        }
        if !(self.snap.bind_tolerance >= 0.0) {
            self.snap.bind_tolerance = SnapSettings::default().bind_tolerance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("dimline-settings-{}-{name}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let s = MeasureSettings::default();
        assert_eq!(s.display.font_size, 20.0);
        assert_eq!(s.display.precision, 2);
        assert_eq!(s.display.line_color, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(s.snap.vertex_threshold_px, 20.0);
        assert_eq!(s.snap.bind_tolerance, 1e-6);
    }

    #[test]
    fn test_font_size_clamped() {
        let mut s = MeasureSettings::default();
        s.set_font_size(5.0);
        assert_eq!(s.display.font_size, 10.0);
        s.set_font_size(80.0);
        assert_eq!(s.display.font_size, 50.0);
        s.set_precision(12);
        assert_eq!(s.display.precision, 6);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut s = MeasureSettings::default();
        s.display.unit = LengthUnit::Feet;
        s.set_precision(4);
        s.save_to(&path).unwrap();

        let loaded = MeasureSettings::load_from(&path).unwrap();
        assert_eq!(loaded, s);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: MeasureSettings =
            serde_json::from_str(r#"{"display": {"font_size": 30.0}}"#).unwrap();
        assert_eq!(s.display.font_size, 30.0);
        assert_eq!(s.display.precision, 2);
        assert_eq!(s.snap, SnapSettings::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(MeasureSettings::load_from(&path), Err(MeasureError::Json(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
