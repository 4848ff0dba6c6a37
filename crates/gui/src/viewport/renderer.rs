//! Wireframe and measurement overlay painting with egui's painter

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};
use glam::Vec3;
use shared::Rgba;

use super::camera::{PerspectiveView, ScreenProjection};
use crate::overlay::{DrawCommand, DrawList};
use crate::state::SceneState;

const WIRE_COLOR: Color32 = Color32::from_rgb(150, 150, 160);

fn to_color(c: Rgba) -> Color32 {
    let [r, g, b, a] = c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn project(view: &PerspectiveView, p: Vec3) -> Option<Pos2> {
    view.world_to_screen(p).map(|s| Pos2::new(s.x, s.y))
}

/// Background plus a wireframe of every visible object
pub fn paint_scene(painter: &Painter, rect: Rect, view: &PerspectiveView, scene: &SceneState) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(40, 40, 44));

    let stroke = Stroke::new(1.0, WIRE_COLOR);
    for object in scene.objects().iter().filter(|o| o.visible) {
        let matrix = object.matrix();
        for &[a, b] in &object.mesh.edges {
            let (Some(pa), Some(pb)) = (object.mesh.position(a), object.mesh.position(b)) else {
                continue;
            };
            if let (Some(sa), Some(sb)) = (
                project(view, matrix.transform_point3(pa)),
                project(view, matrix.transform_point3(pb)),
            ) {
                if rect.contains(sa) || rect.contains(sb) {
                    painter.line_segment([sa, sb], stroke);
                }
            }
        }
        for v in object.mesh.loose_vertices() {
            if let Some(s) = object.world_vertex(v).and_then(|p| project(view, p)) {
                painter.circle_filled(s, 2.5, WIRE_COLOR);
            }
        }
    }
}

/// Paint the engine's draw commands
pub fn paint_draw_list(painter: &Painter, view: &PerspectiveView, list: &DrawList) {
    for command in list.commands() {
        match command {
            DrawCommand::Line { from, to, color, width } => {
                if let (Some(a), Some(b)) = (project(view, *from), project(view, *to)) {
                    painter.line_segment([a, b], Stroke::new(*width, to_color(*color)));
                }
            }
            DrawCommand::ScreenQuad {
                center,
                half_size,
                color,
                width,
            } => {
                let c = Pos2::new(center.x, center.y);
                let h = *half_size;
                let corners = vec![
                    c + egui::vec2(-h, -h),
                    c + egui::vec2(h, -h),
                    c + egui::vec2(h, h),
                    c + egui::vec2(-h, h),
                ];
                painter.add(Shape::closed_line(corners, Stroke::new(*width, to_color(*color))));
            }
            DrawCommand::Text {
                position,
                text,
                size,
                color,
            } => {
                painter.text(
                    Pos2::new(position.x, position.y),
                    egui::Align2::LEFT_BOTTOM,
                    text,
                    egui::FontId::proportional(*size),
                    to_color(*color),
                );
            }
        }
    }
}
