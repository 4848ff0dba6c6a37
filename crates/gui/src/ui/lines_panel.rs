//! Side panel: session toggle, display settings and the segment list

use egui::{Color32, RichText, Ui};
use shared::{LengthUnit, Rgba};

use crate::overlay::length_label;
use crate::state::settings::{FONT_SIZE_RANGE, MAX_PRECISION};
use crate::state::AppState;

fn fmt_point(p: glam::Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z)
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Measure");
    ui.add_space(4.0);

    let caption = if state.engine.is_drawing() {
        "Drawing Line... (Click to Stop)"
    } else {
        "Draw Measurement Line"
    };
    if ui
        .add_sized([ui.available_width(), 28.0], egui::Button::new(caption))
        .clicked()
    {
        state.engine.toggle_drawing();
    }

    let visibility = if state.engine.lines_visible() {
        "Hide Lines"
    } else {
        "Show Lines"
    };
    if ui.button(visibility).clicked() {
        state.engine.toggle_visibility();
    }

    ui.separator();
    show_display_settings(ui, state);

    ui.separator();
    show_wave(ui, state);

    ui.separator();
    show_segments(ui, state);
}

fn show_display_settings(ui: &mut Ui, state: &mut AppState) {
    let mut display = state.engine.settings().display.clone();

    egui::Grid::new("display_settings")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Font size");
            ui.add(egui::Slider::new(&mut display.font_size, FONT_SIZE_RANGE));
            ui.end_row();

            ui.label("Precision");
            ui.add(egui::Slider::new(&mut display.precision, 0..=MAX_PRECISION));
            ui.end_row();

            ui.label("Unit");
            egui::ComboBox::from_id_salt("length_unit")
                .selected_text(display.unit.display_name())
                .show_ui(ui, |ui| {
                    for unit in LengthUnit::all() {
                        ui.selectable_value(&mut display.unit, *unit, unit.display_name());
                    }
                });
            ui.end_row();

            ui.label("Scale");
            ui.add(
                egui::DragValue::new(&mut display.scale_length)
                    .speed(0.01)
                    .range(0.0001..=10000.0),
            );
            ui.end_row();
        });

    if display != state.engine.settings().display {
        let settings = state.engine.settings_mut();
        settings.display = display;
        settings.sanitize();
    }
}

fn show_wave(ui: &mut Ui, state: &mut AppState) {
    let mut enabled = state.wave.enabled;
    if ui.checkbox(&mut enabled, "Animate wave").changed() {
        if enabled {
            state.wave.enabled = true;
        } else if let Err(e) = state.stop_wave() {
            tracing::warn!("failed to stop wave: {e}");
        }
    }
    if state.wave.enabled {
        ui.add(egui::Slider::new(&mut state.wave.amplitude, 0.0..=1.5).text("Amplitude"));
    }
}

fn show_segments(ui: &mut Ui, state: &mut AppState) {
    let count = state.engine.lines().len();
    ui.label(RichText::new(format!("Lines ({count})")).strong());

    let display = state.engine.settings().display.clone();
    let mut delete = None;
    let mut recolor: Option<(usize, Rgba)> = None;

    for (i, segment) in state.engine.lines().iter().enumerate() {
        ui.push_id(segment.id, |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("#{i}")).monospace());
                    ui.label(length_label(segment, &display));

                    let mut color = segment.color.unwrap_or(display.line_color);
                    if ui.color_edit_button_rgba_unmultiplied(&mut color).changed() {
                        recolor = Some((i, color));
                    }
                    if ui.button("Delete").clicked() {
                        delete = Some(i);
                    }
                });
                for (name, endpoint) in [("Start", &segment.start), ("End", &segment.end)] {
                    let text = format!("{name}: {}", fmt_point(endpoint.position()));
                    if endpoint.is_bound() {
                        ui.colored_label(Color32::from_rgb(120, 200, 120), text);
                    } else {
                        ui.weak(text);
                    }
                }
            });
        });
    }

    if let Some((i, color)) = recolor {
        let _ = state.engine.set_line_color(i, color);
    }
    if let Some(i) = delete {
        let _ = state.engine.delete_line(i);
    }
    if count > 0 && ui.button("Clear all").clicked() {
        state.engine.clear_lines();
    }
}
