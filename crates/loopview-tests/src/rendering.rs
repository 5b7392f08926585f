//! Integration tests for the render path and error recovery.
//!
//! Exercises loopview-effects transforms as composed by the playback
//! pipeline, plus config and source parsing at the crate seams.

use crate::support::{frame, session, session_with, HEIGHT, WIDTH};
use loopview_core::{FrameBuffer, LoopviewError, PlayerConfig, ViewportSize};
use loopview_effects::{
    flip_horizontal, flip_vertical, rotate_quarter_turns, scale_and_crop, to_grayscale,
};
use loopview_media::{PatternDecoder, SourceSpec};
use loopview_playback::{Command, PlaybackState, RenderPipeline};
use std::path::PathBuf;
use std::sync::Arc;

// ── Pipeline order ─────────────────────────────────────────────

#[test]
fn all_stages_apply_in_fixed_order() {
    let mut s = session(10);
    for cmd in [
        Command::ToggleGrayscale,
        Command::Rotate,
        Command::FlipHorizontal,
        Command::FlipVertical,
    ] {
        s.scheduler.apply(cmd);
    }
    let report = s.tick();
    let expected = to_grayscale(&rotate_quarter_turns(
        &flip_horizontal(&flip_vertical(&frame(1))),
        1,
    ));
    assert_eq!(*report.image, expected);
}

#[test]
fn scale_runs_first_against_the_viewport() {
    let config = PlayerConfig::default();
    let mut state = PlaybackState::new(&config, 10);
    state.scale_up();
    state.pan_right();
    state.rotate();

    let pipeline = RenderPipeline::new(ViewportSize {
        width: 4,
        height: 4,
    });
    let raw = FrameBuffer::test_pattern(40, 20);
    let out = pipeline.render(&raw, &state).unwrap();
    let scaled = scale_and_crop(&raw, 1.1, 5, 0, 4, 4).unwrap();
    assert_eq!(out, rotate_quarter_turns(&scaled, 1));
}

#[test]
fn double_toggles_restore_the_raw_frame() {
    let mut s = session(10);
    for cmd in [
        Command::FlipHorizontal,
        Command::FlipHorizontal,
        Command::ToggleGrayscale,
        Command::ToggleGrayscale,
        Command::ScaleUp,
        Command::ScaleReset,
    ] {
        s.scheduler.apply(cmd);
    }
    assert_eq!(*s.tick().image, frame(1));
}

#[test]
fn four_rotations_restore_the_raw_frame() {
    let mut s = session(10);
    for _ in 0..4 {
        s.scheduler.apply(Command::Rotate);
    }
    assert_eq!(*s.tick().image, frame(1));
}

// ── Recovery ───────────────────────────────────────────────────

#[test]
fn empty_crop_keeps_the_previous_frame() {
    let mut s = session(10);
    s.positions(2);
    let before = s.scheduler.last_frame().clone();

    s.scheduler.apply(Command::ScaleUp);
    for _ in 0..10 {
        s.scheduler.apply(Command::PanRight);
    }
    let report = s.tick();
    assert!(report.recovered);
    assert!(Arc::ptr_eq(&report.image, &before));
    assert_eq!(report.position, 3);

    s.scheduler.apply(Command::PanReset);
    s.scheduler.apply(Command::ScaleReset);
    let report = s.tick();
    assert!(!report.recovered);
    assert_eq!(*report.image, frame(4));
}

#[test]
fn frames_panned_out_of_view_still_loop() {
    let mut s = session(10);
    s.scheduler.apply(Command::MarkLoopStart);
    s.scheduler.apply(Command::ScaleUp);
    for _ in 0..10 {
        s.scheduler.apply(Command::PanUp);
    }
    assert!(s.tick().recovered);
    assert!(s.tick().recovered);
    s.scheduler.apply(Command::MarkLoopEnd);
    assert_eq!(s.scheduler.state().cached_frames().len(), 3);

    s.scheduler.apply(Command::PanReset);
    s.scheduler.apply(Command::ScaleReset);
    let shown: Vec<_> = (0..3).map(|_| (*s.tick().image).clone()).collect();
    assert_eq!(shown, vec![frame(0), frame(1), frame(2)]);
}

#[test]
fn failed_display_keeps_the_previous_frame() {
    let mut s = session(10);
    s.tick();
    let before = s.scheduler.last_frame().clone();

    s.sink.reject = 1;
    let report = s.tick();
    assert!(report.recovered);
    assert!(Arc::ptr_eq(s.scheduler.last_frame(), &before));
    // The retry with the previous frame went through
    assert!(Arc::ptr_eq(s.sink.shown.last().unwrap(), &before));

    assert_eq!(*s.tick().image, frame(3));
}

#[test]
fn scale_down_stops_at_one_step() {
    let mut s = session_with(PatternDecoder::new(10, 40, 20), &PlayerConfig::default());
    for _ in 0..30 {
        s.scheduler.apply(Command::ScaleDown);
    }
    assert!((s.scheduler.state().scale_factor() - 0.1).abs() < 1e-9);
    let report = s.tick();
    assert!(!report.recovered);
    assert_eq!((report.image.width, report.image.height), (4, 2));
}

#[test]
fn custom_steps_come_from_config() {
    let config = PlayerConfig::from_json_str(r#"{ "scale_step": 0.5, "pan_step": 2 }"#).unwrap();
    let mut s = session_with(PatternDecoder::new(10, WIDTH, HEIGHT), &config);
    s.scheduler.apply(Command::ScaleUp);
    s.scheduler.apply(Command::PanUp);
    assert_eq!(s.scheduler.state().scale_factor(), 1.5);
    assert_eq!(s.scheduler.state().pan(), (0, 2));
}

// ── Seams ──────────────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected() {
    let err = PlayerConfig::from_json_str(r#"{ "scale_step": 0.0 }"#).unwrap_err();
    assert!(matches!(err, LoopviewError::Config(_)));
}

#[test]
fn source_argument_selects_camera_or_file() {
    assert_eq!(SourceSpec::from_arg(None), SourceSpec::Camera(0));
    assert_eq!(SourceSpec::from_arg(Some("1")), SourceSpec::Camera(1));
    assert_eq!(
        SourceSpec::from_arg(Some("clips/demo.mp4")),
        SourceSpec::File(PathBuf::from("clips/demo.mp4"))
    );
    assert!(!SourceSpec::from_arg(Some("1.mp4")).is_live());
}
