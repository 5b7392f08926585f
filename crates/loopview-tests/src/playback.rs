//! Integration tests for transport and pacing.
//!
//! Exercises loopview-media sources driven through the loopview-playback
//! scheduler.

use crate::support::{frame, session, session_with, HEIGHT, WIDTH};
use loopview_core::{FrameRate, LoopviewError, PlayerConfig};
use loopview_media::{PatternDecoder, RestartPolicy, SourceCursor};
use loopview_playback::{Command, ManualClock, PlaybackMode, PlaybackScheduler};
use std::time::Duration;

const MS: Duration = Duration::from_millis(1);

// ── Continuous playback ────────────────────────────────────────

#[test]
fn ten_frame_source_wraps_around() {
    let mut s = session(10);
    assert_eq!(s.scheduler.status(), "0/10");

    let positions = s.positions(12);
    assert_eq!(positions, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2]);

    let expected: Vec<_> = positions.iter().map(|&p| frame(p)).collect();
    let shown: Vec<_> = s.sink.shown.iter().map(|f| (**f).clone()).collect();
    assert_eq!(shown, expected);
    assert_eq!(s.sink.titles.last().map(String::as_str), Some("2/10"));
}

#[test]
fn restart_resets_position_to_zero() {
    let mut s = session(3);
    assert_eq!(s.positions(7), vec![1, 2, 0, 1, 2, 0, 1]);
    assert_eq!(**s.scheduler.last_frame(), frame(1));
}

#[test]
fn live_source_counts_up_without_wrapping() {
    let mut s = session_with(PatternDecoder::live(WIDTH, HEIGHT), &PlayerConfig::default());
    assert_eq!(s.positions(3), vec![1, 2, 3]);
    assert_eq!(s.scheduler.status(), "3/0");
}

#[test]
fn stop_policy_ends_the_stream() {
    let config = PlayerConfig {
        cycle_finite_sources: false,
        ..PlayerConfig::default()
    };
    let mut s = session_with(PatternDecoder::new(3, WIDTH, HEIGHT), &config);
    assert_eq!(s.positions(2), vec![1, 2]);
    assert!(matches!(
        s.scheduler.tick(&mut s.sink),
        Err(LoopviewError::StreamEnded)
    ));
}

#[test]
fn run_blocking_returns_cleanly_at_stream_end() {
    let config = PlayerConfig {
        cycle_finite_sources: false,
        ..PlayerConfig::default()
    };
    let decoder =
        PatternDecoder::new(4, WIDTH, HEIGHT).with_frame_rate(Some(FrameRate::new(1000, 1)));
    let mut s = session_with(decoder, &config);
    let mut ticks = 0;
    s.scheduler
        .run_blocking(&mut s.sink, |_| {
            ticks += 1;
            false
        })
        .unwrap();
    assert_eq!(ticks, 3);
    // Primed frame plus three ticks
    assert_eq!(s.sink.shown.len(), 4);
}

#[test]
fn run_blocking_honors_stop_request() {
    let decoder =
        PatternDecoder::new(10, WIDTH, HEIGHT).with_frame_rate(Some(FrameRate::new(1000, 1)));
    let mut s = session_with(decoder, &PlayerConfig::default());
    s.scheduler
        .run_blocking(&mut s.sink, |report| report.position == 5)
        .unwrap();
    assert_eq!(s.scheduler.state().position(), 5);
}

// ── Pause and step ─────────────────────────────────────────────

#[test]
fn pause_holds_the_current_frame() {
    let mut s = session(10);
    s.positions(2);
    s.scheduler.apply(Command::TogglePause);

    for _ in 0..3 {
        let report = s.tick();
        assert!(!report.advanced);
        assert_eq!(report.position, 2);
        assert_eq!(*report.image, frame(2));
    }

    s.scheduler.apply(Command::TogglePause);
    assert_eq!(s.positions(1), vec![3]);
}

#[test]
fn step_shows_exactly_one_frame() {
    let mut s = session(10);
    s.scheduler.apply(Command::TogglePause);
    s.scheduler.apply(Command::Step);
    s.scheduler.apply(Command::Step);

    let advanced: Vec<bool> = (0..3).map(|_| s.tick().advanced).collect();
    assert_eq!(advanced, vec![true, false, false]);
    assert_eq!(s.scheduler.state().position(), 1);
    assert!(s.scheduler.state().is_paused());
}

#[test]
fn step_while_playing_pauses() {
    let mut s = session(10);
    s.scheduler.apply(Command::Step);
    assert_eq!(s.positions(3), vec![1, 1, 1]);
}

#[test]
fn toggles_refresh_a_paused_player() {
    let mut s = session(10);
    s.scheduler.apply(Command::TogglePause);
    s.scheduler.apply(Command::FlipHorizontal);
    let report = s.tick();
    assert!(report.advanced);
    assert_eq!(*report.image, loopview_effects::flip_horizontal(&frame(1)));
    assert!(!s.tick().advanced);
}

#[test]
fn rotate_waits_for_the_next_frame_while_paused() {
    let mut s = session(10);
    s.scheduler.apply(Command::TogglePause);
    s.scheduler.apply(Command::Rotate);
    let held = s.tick();
    assert!(!held.advanced);
    assert_eq!(*held.image, frame(0));

    s.scheduler.apply(Command::Step);
    let report = s.tick();
    assert_eq!(*report.image, loopview_effects::rotate_quarter_turns(&frame(1), 1));
    assert_eq!((report.image.width, report.image.height), (HEIGHT, WIDTH));
}

#[test]
fn commands_never_change_the_mode() {
    let mut s = session(10);
    for cmd in [
        Command::TogglePause,
        Command::Step,
        Command::FlipVertical,
        Command::ScaleUp,
        Command::PanLeft,
        Command::Rotate,
        Command::ToggleGrayscale,
    ] {
        s.scheduler.apply(cmd);
        s.tick();
        assert_eq!(s.scheduler.mode(), PlaybackMode::Running);
    }
}

// ── Pacing ─────────────────────────────────────────────────────

#[test]
fn delay_tracks_the_source_rate() {
    let mut s = session(10);
    s.clock.advance(MS * 10);
    assert_eq!(s.tick().delay, MS * 30);
    s.clock.advance(MS * 40);
    assert_eq!(s.tick().delay, MS);
    s.clock.advance(MS * 200);
    assert_eq!(s.tick().delay, MS);
}

#[test]
fn rateless_source_uses_fallback_rate() {
    let config = PlayerConfig {
        fallback_fps: 50.0,
        ..PlayerConfig::default()
    };
    let s = session_with(PatternDecoder::live(WIDTH, HEIGHT), &config);
    assert_eq!(s.scheduler.target_interval(), MS * 20);
}

#[test]
fn min_delay_comes_from_config() {
    let config = PlayerConfig {
        min_tick_delay_ms: 5,
        ..PlayerConfig::default()
    };
    let mut s = session_with(PatternDecoder::new(10, WIDTH, HEIGHT), &config);
    s.clock.advance(MS * 100);
    assert_eq!(s.tick().delay, MS * 5);
}

// ── Startup ────────────────────────────────────────────────────

#[test]
fn empty_source_is_a_startup_failure() {
    let cursor = SourceCursor::new(
        Box::new(PatternDecoder::new(0, WIDTH, HEIGHT)),
        RestartPolicy::Cycle,
    );
    let result = PlaybackScheduler::with_clock(cursor, &PlayerConfig::default(), ManualClock::new());
    assert!(matches!(result, Err(LoopviewError::SourceOpen(_))));
}
