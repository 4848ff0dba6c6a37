//! JSON command protocol for scripted measurement sessions.
//!
//! Each command maps onto one `TestHarness` / `MeasureEngine` call. Pixel
//! coordinates refer to the harness's top-down view.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::{ObjectId, Rgba};

use crate::harness::TestHarness;
use crate::state::lines::Segment;

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MeasureCommand {
    /// Start or stop a drawing session
    ToggleDraw,
    /// Drag from one pixel to another inside the viewport
    DrawLine { from: [f32; 2], to: [f32; 2] },
    DeleteLine { index: usize },
    SetColor { index: usize, color: Rgba },
    ToggleVisibility,
    SetFontSize { size: f32 },
    SetPrecision { digits: usize },
    /// Move one vertex of a scene object (object space)
    MoveVertex {
        object: ObjectId,
        index: u32,
        position: [f32; 3],
    },
    /// List all segments with their current endpoints.
    ListLines,
    /// Remove every segment.
    Clear,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn segment_json(index: usize, segment: &Segment) -> serde_json::Value {
    serde_json::json!({
        "index": index,
        "id": segment.id.to_string(),
        "start": segment.start.position().to_array(),
        "end": segment.end.position().to_array(),
        "start_bound": segment.start.is_bound(),
        "end_bound": segment.end.is_bound(),
        "length": segment.length(),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: MeasureCommand) -> CommandResponse {
    match cmd {
        MeasureCommand::ToggleDraw => {
            let drawing = harness.engine.toggle_drawing();
            CommandResponse::ok_with_data(serde_json::json!({ "drawing": drawing }))
        }

        MeasureCommand::DrawLine { from, to } => {
            match harness.draw_line(Vec2::from_array(from), Vec2::from_array(to)) {
                Some(index) => CommandResponse::ok_with_data(serde_json::json!({ "index": index })),
                None => CommandResponse::err("No segment committed"),
            }
        }

        MeasureCommand::DeleteLine { index } => match harness.engine.delete_line(index) {
            Ok(segment) => CommandResponse::ok_with_data(
                serde_json::json!({ "removed": segment.id.to_string() }),
            ),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        MeasureCommand::SetColor { index, color } => match harness.engine.set_line_color(index, color) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        MeasureCommand::ToggleVisibility => {
            let visible = harness.engine.toggle_visibility();
            CommandResponse::ok_with_data(serde_json::json!({ "visible": visible }))
        }

        MeasureCommand::SetFontSize { size } => {
            let settings = harness.engine.settings_mut();
            settings.set_font_size(size);
            let applied = settings.display.font_size;
            CommandResponse::ok_with_data(serde_json::json!({ "font_size": applied }))
        }

        MeasureCommand::SetPrecision { digits } => {
            let settings = harness.engine.settings_mut();
            settings.set_precision(digits);
            let applied = settings.display.precision;
            CommandResponse::ok_with_data(serde_json::json!({ "precision": applied }))
        }

        MeasureCommand::MoveVertex {
            object,
            index,
            position,
        } => match harness.move_vertex(&object, index, Vec3::from_array(position)) {
            Ok(report) => CommandResponse::ok_with_data(serde_json::json!({
                "resolved": report.resolved,
                "frozen": report.frozen,
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        MeasureCommand::ListLines => {
            let lines: Vec<serde_json::Value> = harness
                .engine
                .lines()
                .iter()
                .enumerate()
                .map(|(i, s)| segment_json(i, s))
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "line_count": lines.len(),
                "lines": lines,
            }))
        }

        MeasureCommand::Clear => {
            harness.engine.clear_lines();
            CommandResponse::ok()
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: MeasureCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<MeasureCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
