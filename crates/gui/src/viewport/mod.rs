//! 3D viewport panel: camera controls, input routing and painting

pub use dimline_lib::viewport::camera;
mod renderer;

use egui::Ui;
use glam::Vec2;

use crate::input::{EventResponse, InputEvent, InputKind, Key, PointerButton, Region};
use crate::state::AppState;
use camera::{ArcBallCamera, ViewportRect};

/// 3D viewport panel painted with egui shapes
pub struct ViewportPanel {
    camera: ArcBallCamera,
    /// Last pointer position, used to place key events
    last_pointer: Option<egui::Pos2>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            last_pointer: None,
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState, side_panel: Option<egui::Rect>) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );
        let view_rect = ViewportRect::new(
            Vec2::new(rect.min.x, rect.min.y),
            Vec2::new(rect.width(), rect.height()),
        );
        let Some(view) = self.camera.view(view_rect) else {
            return;
        };

        // ── Measurement input ───────────────────────────────
        let screen = ui.ctx().screen_rect();
        let (events, time) = ui.input(|i| (i.events.clone(), i.time));
        let mut consumed_any = false;
        for event in &events {
            let Some((kind, pos)) = self.translate(event) else {
                continue;
            };
            let region = classify_region(pos, rect, side_panel, screen);
            let input = InputEvent::new(kind, Vec2::new(pos.x, pos.y), region, time);
            let response = state.engine.handle_event(&input, &state.scene, &view);
            match response {
                EventResponse::Consumed => consumed_any = true,
                EventResponse::Finished | EventResponse::Cancelled => {
                    tracing::debug!(?response, "measurement session closed from viewport");
                }
                EventResponse::PassThrough => {}
            }
        }

        // ── Camera controls (pass-through input) ────────────
        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if response.hovered() && scroll.abs() > 0.1 {
            self.camera.zoom(scroll * 0.01);
        }
        if consumed_any {
            ui.ctx().request_repaint();
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // Camera may have moved this frame; paint with the fresh view
        let Some(view) = self.camera.view(view_rect) else {
            return;
        };
        let painter = ui.painter_at(rect);
        renderer::paint_scene(&painter, rect, &view, &state.scene);
        renderer::paint_draw_list(&painter, &view, &state.engine.draw(&view));
        self.draw_camera_info(&painter, rect);
    }

    /// egui event → engine input kind plus the pixel it happened at
    fn translate(&mut self, event: &egui::Event) -> Option<(InputKind, egui::Pos2)> {
        match event {
            egui::Event::PointerMoved(pos) => {
                self.last_pointer = Some(*pos);
                Some((InputKind::PointerMoved, *pos))
            }
            egui::Event::PointerButton {
                pos, button, pressed, ..
            } => {
                self.last_pointer = Some(*pos);
                let button = match button {
                    egui::PointerButton::Primary => PointerButton::Primary,
                    egui::PointerButton::Secondary => PointerButton::Secondary,
                    egui::PointerButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                let kind = if *pressed {
                    InputKind::PointerPressed(button)
                } else {
                    InputKind::PointerReleased(button)
                };
                Some((kind, *pos))
            }
            egui::Event::Key {
                key, pressed, repeat, ..
            } => {
                if *repeat {
                    return None;
                }
                let key = match key {
                    egui::Key::X => Key::X,
                    egui::Key::Y => Key::Y,
                    egui::Key::Z => Key::Z,
                    egui::Key::Escape => Key::Escape,
                    egui::Key::Enter => Key::Enter,
                    _ => Key::Other,
                };
                let kind = if *pressed {
                    InputKind::KeyPressed(key)
                } else {
                    InputKind::KeyReleased(key)
                };
                Some((kind, self.last_pointer?))
            }
            egui::Event::MouseWheel { delta, .. } => {
                Some((InputKind::Wheel { delta: delta.y }, self.last_pointer?))
            }
            egui::Event::PointerGone => {
                self.last_pointer = None;
                None
            }
            _ => None,
        }
    }

    fn draw_camera_info(&self, painter: &egui::Painter, rect: egui::Rect) {
        let overlay_rect = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
            egui::vec2(136.0, 44.0),
        );
        painter.rect_filled(
            overlay_rect,
            4.0,
            egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
        );
        painter.text(
            overlay_rect.min + egui::vec2(6.0, 4.0),
            egui::Align2::LEFT_TOP,
            format!(
                "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
                self.camera.distance,
                self.camera.yaw.to_degrees(),
                self.camera.pitch.to_degrees(),
            ),
            egui::FontId::monospace(10.0),
            egui::Color32::from_rgb(160, 160, 170),
        );
    }
}

fn classify_region(
    pos: egui::Pos2,
    viewport: egui::Rect,
    side_panel: Option<egui::Rect>,
    screen: egui::Rect,
) -> Region {
    if viewport.contains(pos) {
        Region::Viewport
    } else if side_panel.is_some_and(|r| r.contains(pos)) {
        Region::SidePanel
    } else if screen.contains(pos) {
        Region::OtherArea
    } else {
        Region::Unknown
    }
}
