//! Integration tests for the JSON command protocol.

use dimline_lib::command::{execute_json, execute_json_batch};
use dimline_lib::fixtures::cube_mesh;
use dimline_lib::harness::TestHarness;

fn cube_harness() -> TestHarness {
    let mut h = TestHarness::new();
    h.add(&cube_mesh("cube", 2.0, [0.0; 3])).unwrap();
    h
}

#[test]
fn test_draw_and_list_lines() {
    let mut h = cube_harness();
    let resp = execute_json(
        &mut h,
        r#"{"command": "draw_line", "from": [50, 150], "to": [150, 50]}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["index"], 0);

    let list = execute_json(&mut h, r#"{"command": "list_lines"}"#).unwrap();
    let data = list.data.unwrap();
    assert_eq!(data["line_count"], 1);
    assert_eq!(data["lines"][0]["start_bound"], true);
    assert_eq!(data["lines"][0]["end_bound"], true);
}

#[test]
fn test_batch_session() {
    let mut h = cube_harness();
    let batch = r#"[
        {"command": "toggle_draw"},
        {"command": "draw_line", "from": [50, 150], "to": [150, 50]},
        {"command": "draw_line", "from": [300, 300], "to": [350, 300]},
        {"command": "set_color", "index": 1, "color": [1, 0, 0, 1]},
        {"command": "delete_line", "index": 0},
        {"command": "toggle_draw"},
        {"command": "list_lines"}
    ]"#;
    let responses = execute_json_batch(&mut h, batch).unwrap();
    assert_eq!(responses.len(), 7);
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[5].data.as_ref().unwrap()["drawing"], false);

    let data = responses[6].data.as_ref().unwrap();
    assert_eq!(data["line_count"], 1);
    assert_eq!(data["lines"][0]["start_bound"], false);
    assert_eq!(h.engine.lines().get(0).unwrap().color, Some([1.0, 0.0, 0.0, 1.0]));
}

#[test]
fn test_out_of_range_requests_fail_without_change() {
    let mut h = cube_harness();
    execute_json(&mut h, r#"{"command": "draw_line", "from": [300, 300], "to": [350, 300]}"#).unwrap();

    let del = execute_json(&mut h, r#"{"command": "delete_line", "index": 3}"#).unwrap();
    assert!(!del.success);
    let color = execute_json(&mut h, r#"{"command": "set_color", "index": 3, "color": [0, 0, 0, 1]}"#).unwrap();
    assert!(!color.success);
    assert_eq!(h.line_count(), 1);
}

#[test]
fn test_move_vertex_reports_resolution() {
    let mut h = cube_harness();
    execute_json(&mut h, r#"{"command": "draw_line", "from": [50, 150], "to": [300, 300]}"#).unwrap();

    let resp = execute_json(
        &mut h,
        r#"{"command": "move_vertex", "object": "cube", "index": 4, "position": [-2, -2, 2]}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["resolved"], 1);

    let unknown = execute_json(
        &mut h,
        r#"{"command": "move_vertex", "object": "nope", "index": 0, "position": [0, 0, 0]}"#,
    )
    .unwrap();
    assert!(!unknown.success);
    assert!(unknown.error.unwrap().contains("nope"));
}

#[test]
fn test_display_settings_are_clamped() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "set_font_size", "size": 99}"#).unwrap();
    assert_eq!(resp.data.unwrap()["font_size"], 50.0);
    let resp = execute_json(&mut h, r#"{"command": "set_precision", "digits": 12}"#).unwrap();
    assert_eq!(resp.data.unwrap()["precision"], 6);
}

#[test]
fn test_visibility_and_clear() {
    let mut h = TestHarness::new();
    execute_json(&mut h, r#"{"command": "draw_line", "from": [10, 10], "to": [60, 10]}"#).unwrap();

    let hide = execute_json(&mut h, r#"{"command": "toggle_visibility"}"#).unwrap();
    assert_eq!(hide.data.unwrap()["visible"], false);
    assert!(!h.engine.is_drawing());

    execute_json(&mut h, r#"{"command": "clear"}"#).unwrap();
    assert_eq!(h.line_count(), 0);
}

#[test]
fn test_zero_length_line_is_committed() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "draw_line", "from": [10, 10], "to": [10, 10]}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.line_count(), 1);
}

#[test]
fn test_batch_invalid_json() {
    let mut h = TestHarness::new();
    assert!(execute_json_batch(&mut h, r#"[{"command": "toggle_draw"}, {"oops": 1}]"#).is_err());
    assert!(!h.engine.is_drawing());
}
