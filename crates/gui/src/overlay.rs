//! Backend-independent draw output for the measuring tool.
//!
//! The engine fills a [`DrawList`] each frame; the host paints it with
//! whatever renderer it has. Three layers exist: committed segments,
//! their length labels, and the hover highlight. Segments and labels stay
//! registered once the first session started; the hover layer lives only
//! as long as a session.

use glam::{Vec2, Vec3};
use shared::Rgba;

use crate::helpers::format_length;
use crate::state::hover::HoverState;
use crate::state::lines::Segment;
use crate::state::settings::DisplaySettings;
use crate::viewport::camera::ScreenProjection;

pub const HOVER_HALF_SIZE: f32 = 8.0;
pub const HOVER_LINE_WIDTH: f32 = 1.4;
pub const VERTEX_HOVER_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const EDGE_HOVER_COLOR: Rgba = [0.0, 1.0, 0.0, 1.0];
pub const LABEL_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// World-space line
    Line {
        from: Vec3,
        to: Vec3,
        color: Rgba,
        width: f32,
    },
    /// Screen-space square outline
    ScreenQuad {
        center: Vec2,
        half_size: f32,
        color: Rgba,
        width: f32,
    },
    /// Screen-space text anchored at its left baseline
    Text {
        position: Vec2,
        text: String,
        size: f32,
        color: Rgba,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn quads(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ScreenQuad { .. }))
    }

    /// Text of every label, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLayer {
    Segments,
    Labels,
    Hover,
}

/// Which draw layers are currently attached to the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayRegistry {
    segments: bool,
    labels: bool,
    hover: bool,
}

impl OverlayRegistry {
    fn slot(&mut self, layer: OverlayLayer) -> &mut bool {
        match layer {
            OverlayLayer::Segments => &mut self.segments,
            OverlayLayer::Labels => &mut self.labels,
            OverlayLayer::Hover => &mut self.hover,
        }
    }

    /// Attach a layer. Returns false when it was already attached.
    pub fn register(&mut self, layer: OverlayLayer) -> bool {
        let slot = self.slot(layer);
        let added = !*slot;
        *slot = true;
        added
    }

    /// Detach a layer. Returns false when it was not attached.
    pub fn detach(&mut self, layer: OverlayLayer) -> bool {
        std::mem::replace(self.slot(layer), false)
    }

    pub fn is_registered(&self, layer: OverlayLayer) -> bool {
        match layer {
            OverlayLayer::Segments => self.segments,
            OverlayLayer::Labels => self.labels,
            OverlayLayer::Hover => self.hover,
        }
    }
}

/// Dashes of `dash` length separated by equal gaps; the last piece is
/// shortened so the line ends exactly at `to`.
pub fn dashed_line(list: &mut DrawList, from: Vec3, to: Vec3, dash: f32, color: Rgba, width: f32) {
    let length = from.distance(to);
    if length <= f32::EPSILON {
        return;
    }
    if !(dash > 0.0) {
        list.push(DrawCommand::Line { from, to, color, width });
        return;
    }

    let direction = (to - from) / length;
    let period = dash * 2.0;
    let full = (length / period).floor() as usize;

    for i in 0..full {
        let start = from + direction * (i as f32 * period);
        list.push(DrawCommand::Line {
            from: start,
            to: start + direction * dash,
            color,
            width,
        });
    }

    let tail_start = from + direction * (full as f32 * period);
    if tail_start.distance(to) > f32::EPSILON {
        list.push(DrawCommand::Line {
            from: tail_start,
            to,
            color,
            width,
        });
    }
}

pub fn draw_segments<'a>(
    list: &mut DrawList,
    segments: impl IntoIterator<Item = &'a Segment>,
    display: &DisplaySettings,
) {
    for segment in segments {
        dashed_line(
            list,
            segment.start.position(),
            segment.end.position(),
            display.dash_length,
            segment.color.unwrap_or(display.line_color),
            display.line_width,
        );
    }
}

/// Label text for a segment
pub fn length_label(segment: &Segment, display: &DisplaySettings) -> String {
    format_length(
        segment.length() * display.scale_length,
        display.precision,
        display.unit.abbrev(),
    )
}

pub fn draw_labels<'a>(
    list: &mut DrawList,
    segments: impl IntoIterator<Item = &'a Segment>,
    display: &DisplaySettings,
    projection: &dyn ScreenProjection,
) {
    for segment in segments {
        let Some(position) = projection.world_to_screen(segment.midpoint()) else {
            continue;
        };
        list.push(DrawCommand::Text {
            position,
            text: length_label(segment, display),
            size: display.font_size,
            color: LABEL_COLOR,
        });
    }
}

/// Square around the hovered vertex (white) or edge point (green)
pub fn draw_hover(list: &mut DrawList, hover: &HoverState, projection: &dyn ScreenProjection) {
    let (hit, color) = match (hover.vertex(), hover.edge()) {
        (Some(v), _) => (v, VERTEX_HOVER_COLOR),
        (None, Some(e)) => (e, EDGE_HOVER_COLOR),
        (None, None) => return,
    };
    if let Some(center) = projection.world_to_screen(hit.position) {
        list.push(DrawCommand::ScreenQuad {
            center,
            half_size: HOVER_HALF_SIZE,
            color,
            width: HOVER_LINE_WIDTH,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit_test::{HitResult, SnapHit};
    use crate::state::lines::{Endpoint, FeatureRef};
    use crate::viewport::camera::OrthoView;
    use shared::LengthUnit;

    fn line_ends(list: &DrawList) -> Vec<(Vec3, Vec3)> {
        list.lines()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_dashes_with_partial_tail() {
        let mut list = DrawList::new();
        dashed_line(&mut list, Vec3::ZERO, Vec3::new(2.3, 0.0, 0.0), 0.5, [1.0; 4], 3.0);
        let ends = line_ends(&list);
        // Two full periods (0..0.5, 1..1.5) then the tail from 2.0 to 2.3
        assert_eq!(ends.len(), 3);
        assert!(ends[1].0.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
        assert!(ends[1].1.abs_diff_eq(Vec3::new(1.5, 0.0, 0.0), 1e-5));
        assert!(ends[2].0.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        assert_eq!(ends[2].1, Vec3::new(2.3, 0.0, 0.0));
    }

    #[test]
    fn test_zero_length_line_draws_nothing() {
        let mut list = DrawList::new();
        dashed_line(&mut list, Vec3::ONE, Vec3::ONE, 0.5, [1.0; 4], 3.0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_label_format() {
        let seg = Segment::new(
            Endpoint::Static(Vec3::ZERO),
            Endpoint::Static(Vec3::new(1.23456, 0.0, 0.0)),
        );
        let mut display = DisplaySettings::default();
        assert_eq!(length_label(&seg, &display), "1.23 m");

        display.unit = LengthUnit::None;
        display.precision = 3;
        assert_eq!(length_label(&seg, &display), "1.235");

        display.unit = LengthUnit::Centimeters;
        display.precision = 0;
        display.scale_length = 100.0;
        assert_eq!(length_label(&seg, &display), "123 cm");
    }

    #[test]
    fn test_label_at_projected_midpoint() {
        let seg = Segment::new(
            Endpoint::Static(Vec3::ZERO),
            Endpoint::Static(Vec3::new(2.0, 0.0, 0.0)),
        );
        let view = OrthoView::new(Vec2::new(100.0, 100.0), 50.0);
        let mut list = DrawList::new();
        draw_labels(&mut list, [&seg], &DisplaySettings::default(), &view);
        match &list.commands()[0] {
            DrawCommand::Text { position, text, size, .. } => {
                assert_eq!(*position, Vec2::new(150.0, 100.0));
                assert_eq!(text, "2.00 m");
                assert_eq!(*size, 20.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_hover_colors() {
        let view = OrthoView::new(Vec2::new(100.0, 100.0), 50.0);
        let hit = SnapHit {
            feature: FeatureRef::edge_point("m", 0, 0.5),
            position: Vec3::ZERO,
            screen_distance: 1.0,
        };
        let mut hover = HoverState::default();
        hover.update(HitResult { vertex: None, edge: Some(hit) }, 0.0);

        let mut list = DrawList::new();
        draw_hover(&mut list, &hover, &view);
        assert_eq!(
            list.commands(),
            &[DrawCommand::ScreenQuad {
                center: Vec2::new(100.0, 100.0),
                half_size: HOVER_HALF_SIZE,
                color: EDGE_HOVER_COLOR,
                width: HOVER_LINE_WIDTH,
            }]
        );
    }

    #[test]
    fn test_registry() {
        let mut reg = OverlayRegistry::default();
        assert!(reg.register(OverlayLayer::Hover));
        assert!(!reg.register(OverlayLayer::Hover));
        assert!(reg.is_registered(OverlayLayer::Hover));
        assert!(reg.detach(OverlayLayer::Hover));
        assert!(!reg.detach(OverlayLayer::Hover));
        assert!(!reg.is_registered(OverlayLayer::Segments));
    }
}
