mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::engine`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use dimline_lib::fixtures;
pub use dimline_lib::host;
pub use dimline_lib::input;
pub use dimline_lib::overlay;
pub use dimline_lib::state;

use app::MeasureApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dimline_gui=info,dimline_lib=info".into()),
        )
        .init();

    // Parse --scene <path> argument
    let initial_scene = parse_scene_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Dimline: 3D Measurement Lines")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "dimline-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(MeasureApp::new(cc, initial_scene)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_scene_arg() -> Option<shared::SceneDescription> {
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .iter()
        .position(|a| a == "--scene")
        .and_then(|i| args.get(i + 1))?;

    match std::fs::read_to_string(path) {
        Ok(json) => match shared::SceneDescription::from_json(&json) {
            Ok(scene) => {
                tracing::info!("Loaded scene from {path} ({} meshes)", scene.meshes.len());
                Some(scene)
            }
            Err(e) => {
                tracing::error!("Failed to parse scene JSON from {path}: {e}");
                None
            }
        },
        Err(e) => {
            tracing::error!("Failed to read scene file {path}: {e}");
            None
        }
    }
}
