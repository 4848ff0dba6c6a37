// Library crate: the measuring engine plus the headless harness and JSON
// command interface. GUI-specific modules (app, ui, painting) stay in the
// binary crate.

pub mod command;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod helpers;
pub mod host;
pub mod input;
pub mod overlay;
pub mod resolver;
pub mod spatial;
pub mod state;
pub mod validation;

/// Geometry and projection types shared by the engine and the viewport.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
}

pub use engine::MeasureEngine;
pub use error::{MeasureError, MeasureResult};
pub use harness::TestHarness;
