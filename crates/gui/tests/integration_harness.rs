//! Integration tests for TestHarness: hit testing, the drawing session and
//! the line model, driven through pixel-level input.

use dimline_lib::fixtures::{cube_mesh, point_mesh, wire_mesh};
use dimline_lib::harness::TestHarness;
use dimline_lib::hit_test::HitTester;
use dimline_lib::host::NoticeLevel;
use dimline_lib::input::{EventResponse, InputKind, Key, PointerButton, Region};
use dimline_lib::overlay::{DrawCommand, OverlayLayer};
use dimline_lib::spatial::SpatialIndexCache;
use dimline_lib::state::settings::MeasureSettings;
use dimline_lib::state::ToolPhase;
use glam::{Vec2, Vec3};

fn px(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn cube_harness() -> TestHarness {
    let mut h = TestHarness::new();
    h.add(&cube_mesh("cube", 2.0, [0.0; 3])).unwrap();
    h
}

// ── Hit testing ─────────────────────────────────────────────────

#[test]
fn test_single_vertex_scenario() {
    let mut settings = MeasureSettings::default();
    settings.snap.vertex_threshold_px = 10.0;
    settings.snap.edge_threshold_px = 10.0;
    let mut h = TestHarness::with_settings(settings);
    h.add(&point_mesh("v", [0.0, 0.0, 0.0])).unwrap();
    assert_eq!(h.pixel_of(Vec3::ZERO), Some(px(100.0, 100.0)));

    let tester = HitTester::new(10.0, 10.0);
    let mut cache = SpatialIndexCache::new();

    let hit = tester.find_nearest(px(102.0, 101.0), &h.scene, &h.view, &mut cache);
    let vertex = hit.vertex.expect("vertex within threshold");
    assert_eq!(vertex.position, Vec3::ZERO);
    assert!(vertex.feature.is_vertex());

    let miss = tester.find_nearest(px(200.0, 200.0), &h.scene, &h.view, &mut cache);
    assert!(miss.is_empty());
}

#[test]
fn test_hit_test_idempotent() {
    let h = cube_harness();
    let tester = HitTester::default();
    let mut cache = SpatialIndexCache::new();

    let first = tester.find_nearest(px(53.0, 147.0), &h.scene, &h.view, &mut cache);
    for _ in 0..5 {
        let again = tester.find_nearest(px(53.0, 147.0), &h.scene, &h.view, &mut cache);
        assert_eq!(again, first);
    }
    assert_eq!(cache.rebuild_count(), 1);
}

#[test]
fn test_vertex_beats_edge() {
    let h = cube_harness();
    let tester = HitTester::default();
    let mut cache = SpatialIndexCache::new();

    // Near the (-1, -1, 1) corner: both the corner and its edges are in range
    let hit = tester.find_nearest(px(52.0, 148.0), &h.scene, &h.view, &mut cache);
    let vertex = hit.vertex.as_ref().expect("corner hit");
    assert!(vertex.position.abs_diff_eq(Vec3::new(-1.0, -1.0, 1.0), 1e-5));
    assert!(hit.edge.is_none());
}

#[test]
fn test_edge_point_hover_is_green_square() {
    let mut h = cube_harness();
    h.engine.toggle_drawing();
    h.move_to(px(100.0, 148.0));

    let hover = h.engine.hover();
    assert!(hover.vertex().is_none());
    let edge = hover.edge().expect("edge hit");
    assert!(edge.position.abs_diff_eq(Vec3::new(0.0, -1.0, 1.0), 1e-4));

    let list = h.draw();
    let quads: Vec<_> = list.quads().collect();
    assert_eq!(quads.len(), 1);
    match quads[0] {
        DrawCommand::ScreenQuad { color, .. } => assert_eq!(*color, [0.0, 1.0, 0.0, 1.0]),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_hidden_object_not_snapped() {
    let mut h = cube_harness();
    h.set_visible("cube", false).unwrap();
    h.engine.toggle_drawing();
    h.move_to(px(50.0, 150.0));
    assert!(h.engine.hover().is_empty());
}

// ── Drawing session ─────────────────────────────────────────────

#[test]
fn test_snapped_line_binds_both_ends() {
    let mut h = cube_harness();
    let index = h.draw_line(px(50.0, 150.0), px(150.0, 50.0)).unwrap();

    let seg = h.engine.lines().get(index).unwrap();
    assert!(seg.start.is_bound());
    assert!(seg.end.is_bound());
    assert!((seg.length() - 8.0_f32.sqrt()).abs() < 1e-5);
    assert!(h.engine.hover().is_empty());
    assert_eq!(h.engine.phase(), ToolPhase::Drawing);
}

#[test]
fn test_unsnapped_line_is_static_at_default_depth() {
    let mut h = TestHarness::new();
    h.draw_line(px(20.0, 20.0), px(70.0, 20.0)).unwrap();
    let (a, b) = h.line_positions(0).unwrap();
    assert!(a.abs_diff_eq(Vec3::new(-1.6, 1.6, 0.0), 1e-5));
    assert!(b.abs_diff_eq(Vec3::new(-0.6, 1.6, 0.0), 1e-5));
    assert!(h.engine.lines().get(0).unwrap().is_static());
}

#[test]
fn test_axis_lock_keeps_start_coordinate() {
    let mut settings = MeasureSettings::default();
    settings.snap.default_depth = [0.0, 0.0, 3.0];
    let mut h = TestHarness::with_settings(settings);
    h.engine.toggle_drawing();

    // (1, 2) projects to pixel (150, 0)
    h.press(px(150.0, 0.0));
    assert_eq!(h.key_down(Key::X), EventResponse::Consumed);
    assert_eq!(h.engine.axis_lock().label(), "X");
    h.move_to(px(350.0, -350.0));
    h.release(px(350.0, -350.0));

    let (start, end) = h.line_positions(0).unwrap();
    assert!(start.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
    assert!(end.abs_diff_eq(Vec3::new(1.0, 9.0, 3.0), 1e-4));

    h.key_up(Key::X);
    assert!(!h.engine.axis_lock().any());
}

#[test]
fn test_pending_segment_previewed_while_dragging() {
    let mut h = TestHarness::new();
    h.engine.toggle_drawing();
    h.press(px(100.0, 100.0));
    h.move_to(px(200.0, 100.0));

    assert_eq!(h.engine.phase(), ToolPhase::Dragging);
    assert!(h.engine.lines().is_empty());
    let preview = h.engine.pending_segment().unwrap();
    assert!(preview.end.position().abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    assert_eq!(h.draw().texts(), vec!["2.00 m"]);
}

#[test]
fn test_escape_cancels_and_discards_pending() {
    let mut h = TestHarness::new();
    h.engine.toggle_drawing();
    h.press(px(100.0, 100.0));
    h.move_to(px(150.0, 100.0));

    assert_eq!(h.key_down(Key::Escape), EventResponse::Cancelled);
    assert_eq!(h.engine.phase(), ToolPhase::Idle);
    assert!(h.engine.lines().is_empty());
    assert!(!h.engine.overlays().is_registered(OverlayLayer::Hover));
    assert!(h.engine.overlays().is_registered(OverlayLayer::Segments));
}

#[test]
fn test_right_click_cancels_and_enter_finishes() {
    let mut h = TestHarness::new();
    h.engine.toggle_drawing();
    let r = h.event(InputKind::PointerPressed(PointerButton::Secondary), px(10.0, 10.0));
    assert_eq!(r, EventResponse::Cancelled);
    assert!(!h.engine.is_drawing());

    h.draw_line(px(10.0, 10.0), px(60.0, 10.0)).unwrap();
    assert_eq!(h.key_down(Key::Enter), EventResponse::Finished);
    assert!(!h.engine.is_drawing());
    assert_eq!(h.line_count(), 1);
}

#[test]
fn test_pass_through_regions_and_keys() {
    let mut h = TestHarness::new();
    assert_eq!(h.move_to(px(10.0, 10.0)), EventResponse::PassThrough);

    h.engine.toggle_drawing();
    let side = h.event_in(InputKind::PointerPressed(PointerButton::Primary), px(5.0, 5.0), Region::SidePanel);
    assert_eq!(side, EventResponse::PassThrough);
    assert_eq!(h.engine.phase(), ToolPhase::Drawing);

    assert_eq!(h.event(InputKind::Wheel { delta: 1.0 }, px(10.0, 10.0)), EventResponse::PassThrough);
    assert_eq!(
        h.event(InputKind::PointerPressed(PointerButton::Middle), px(10.0, 10.0)),
        EventResponse::PassThrough
    );
    assert_eq!(h.key_down(Key::Other), EventResponse::PassThrough);
    assert!(h.engine.is_drawing());

    // Axis keys outside the viewport still update the lock
    let r = h.event_in(InputKind::KeyPressed(Key::Y), px(5.0, 5.0), Region::SidePanel);
    assert_eq!(r, EventResponse::PassThrough);
    assert!(h.engine.axis_lock().is_locked(1));
}

#[test]
fn test_press_in_unknown_region_ends_session() {
    let mut h = TestHarness::new();
    h.engine.toggle_drawing();
    let r = h.event_in(InputKind::PointerPressed(PointerButton::Primary), px(-5.0, -5.0), Region::Unknown);
    assert_eq!(r, EventResponse::PassThrough);
    assert!(!h.engine.is_drawing());
}

#[test]
fn test_hiding_lines_ends_session() {
    let mut h = TestHarness::new();
    h.draw_line(px(10.0, 10.0), px(60.0, 10.0)).unwrap();
    assert!(!h.engine.toggle_visibility());
    assert!(!h.engine.is_drawing());
    assert!(h.draw().is_empty());

    assert!(h.engine.toggle_visibility());
    assert_eq!(h.draw().texts(), vec!["1.00 m"]);
}

#[test]
fn test_loose_edge_snapping() {
    let mut h = TestHarness::new();
    h.add(&wire_mesh("wire", [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0])).unwrap();
    h.engine.toggle_drawing();
    h.move_to(px(125.0, 103.0));
    let edge = h.engine.hover().edge().expect("loose edge hit");
    assert!(edge.position.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-4));
}

// ── Line model ──────────────────────────────────────────────────

#[test]
fn test_remove_at_shifts_following_segments() {
    let mut h = TestHarness::new();
    for y in [10.0, 20.0, 30.0] {
        h.draw_line(px(10.0, y), px(60.0, y)).unwrap();
    }
    h.engine.set_line_color(1, [1.0, 0.0, 0.0, 1.0]).unwrap();
    let ids: Vec<_> = h.engine.lines().iter().map(|s| s.id).collect();

    let removed = h.engine.delete_line(1).unwrap();
    assert_eq!(removed.id, ids[1]);
    assert_eq!(removed.color, Some([1.0, 0.0, 0.0, 1.0]));

    let left: Vec<_> = h.engine.lines().iter().map(|s| s.id).collect();
    assert_eq!(left, vec![ids[0], ids[2]]);
    assert!(h.engine.lines().iter().all(|s| s.color.is_none()));
}

#[test]
fn test_remove_at_out_of_range_warns() {
    let mut h = TestHarness::new();
    assert!(h.engine.delete_line(0).is_err());

    h.draw_line(px(10.0, 10.0), px(60.0, 10.0)).unwrap();
    assert!(h.engine.delete_line(5).is_err());
    assert_eq!(h.line_count(), 1);

    let notices = h.engine.take_notices();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Warning));
    assert_eq!(notices[0].message, "Index out of bounds or list is empty");
}

#[test]
fn test_dashed_segments_and_label_settings() {
    let mut h = TestHarness::new();
    h.draw_line(px(100.0, 100.0), px(200.0, 100.0)).unwrap();
    h.engine.settings_mut().set_precision(1);

    let list = h.draw();
    // 2 world units with 0.5 dashes: dashes at 0..0.5 and 1..1.5
    assert_eq!(list.lines().count(), 2);
    assert_eq!(list.texts(), vec!["2.0 m"]);
}
