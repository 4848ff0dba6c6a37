//! Main application module

mod styles;

use eframe::egui;

use crate::state::{AppState, MeasureSettings};
use crate::ui::{lines_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct MeasureApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last saved settings (to detect changes)
    last_saved_settings: MeasureSettings,
}

impl MeasureApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        initial_scene: Option<shared::SceneDescription>,
    ) -> Self {
        let mut state = AppState::default();

        // CLI argument takes priority over the demo scene
        let scene = initial_scene.unwrap_or_else(crate::fixtures::demo_scene);
        state.load_scene(&scene);

        styles::configure_styles(&cc.egui_ctx);

        let last_saved_settings = state.engine.settings().clone();
        Self {
            state,
            viewport: ViewportPanel::new(),
            last_saved_settings,
        }
    }
}

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Persist settings if changed
        if *self.state.engine.settings() != self.last_saved_settings {
            self.state.engine.settings().save();
            self.last_saved_settings = self.state.engine.settings().clone();
        }

        let time = ctx.input(|i| i.time);
        if let Err(e) = self.state.advance(time) {
            tracing::warn!("wave animation stopped: {e}");
            self.state.wave.enabled = false;
        }
        if self.state.wave.enabled {
            ctx.request_repaint();
        }
        self.state.collect_notices();

        // ── Status bar ───────────────────────────────────────
        if self.state.panels.status_bar {
            egui::TopBottomPanel::bottom("status_bar")
                .exact_height(22.0)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
                )
                .show(ctx, |ui| {
                    status_bar::show(ui, &self.state);
                });
        }

        // ── Left panel: measurement lines ────────────────────
        let side_rect = self.state.panels.lines_panel.then(|| {
            egui::SidePanel::left("lines_panel")
                .default_width(300.0)
                .width_range(220.0..=480.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("lines_scroll")
                        .show(ui, |ui| {
                            lines_panel::show(ui, &mut self.state);
                        });
                })
                .response
                .rect
        });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state, side_rect);
            });

        if self.state.engine.take_redraw_request() {
            ctx.request_repaint();
        }
    }
}
