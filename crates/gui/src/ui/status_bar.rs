use egui::Ui;

use crate::host::NoticeLevel;
use crate::state::{AppState, ToolPhase};

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.weak(format!("Objects: {}", state.scene.objects().len()));
        ui.separator();
        ui.weak(format!("Lines: {}", state.engine.lines().len()));
        ui.separator();

        match state.engine.phase() {
            ToolPhase::Idle => {
                ui.weak("Ready");
            }
            phase => {
                let hint = if phase == ToolPhase::Dragging {
                    "Release to place the end point"
                } else {
                    "Press and drag to measure; X/Y/Z lock axes, Enter finishes, Esc cancels"
                };
                ui.colored_label(egui::Color32::YELLOW, hint);
                let lock = state.engine.axis_lock();
                if lock.any() {
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::from_rgb(255, 200, 100),
                        format!("Lock: {}", lock.label()),
                    );
                }
            }
        }

        if let Some(notice) = state.notices.last() {
            ui.separator();
            let color = match notice.level {
                NoticeLevel::Warning => egui::Color32::from_rgb(255, 140, 90),
                NoticeLevel::Info => egui::Color32::from_rgb(160, 160, 170),
            };
            ui.colored_label(color, &notice.message);
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak("dimline v0.1");
        });
    });
}
