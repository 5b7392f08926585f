//! Integration tests for loop regions: caching, replay and reset.

use crate::support::{frame, session, session_with, HEIGHT, WIDTH};
use loopview_core::PlayerConfig;
use loopview_effects::{flip_horizontal, to_grayscale};
use loopview_media::PatternDecoder;
use loopview_playback::{Command, PlaybackMode};

#[test]
fn loop_region_caches_and_replays() {
    let mut s = session(20);
    s.positions(5);

    s.scheduler.apply(Command::MarkLoopStart);
    assert_eq!(s.scheduler.mode(), PlaybackMode::Caching);
    assert_eq!(s.scheduler.state().loop_start(), Some(5));

    assert_eq!(s.positions(5), vec![6, 7, 8, 9, 10]);
    s.scheduler.apply(Command::MarkLoopEnd);
    assert_eq!(s.scheduler.mode(), PlaybackMode::Replaying);
    assert_eq!(s.scheduler.state().loop_end(), Some(10));

    let cached: Vec<u64> = s
        .scheduler
        .state()
        .cached_frames()
        .iter()
        .map(|c| c.position)
        .collect();
    assert_eq!(cached, vec![5, 6, 7, 8, 9, 10]);

    let replayed = s.positions(13);
    assert_eq!(replayed, vec![5, 6, 7, 8, 9, 10, 5, 6, 7, 8, 9, 10, 5]);
    for (image, &position) in s.sink.shown.iter().rev().zip(replayed.iter().rev()) {
        assert_eq!(**image, frame(position));
    }
}

#[test]
fn replay_repeats_the_same_images() {
    let mut s = session(20);
    s.scheduler.apply(Command::MarkLoopStart);
    s.positions(2);
    s.scheduler.apply(Command::MarkLoopEnd);

    let first = s.tick().image;
    s.positions(2);
    let again = s.tick().image;
    assert_eq!(*first, *again);
    assert_eq!(*again, frame(0));
}

#[test]
fn toggles_apply_to_replayed_frames() {
    let mut s = session(20);
    s.scheduler.apply(Command::MarkLoopStart);
    s.positions(3);
    s.scheduler.apply(Command::MarkLoopEnd);
    s.tick();

    s.scheduler.apply(Command::TogglePause);
    assert!(!s.tick().advanced);
    s.scheduler.apply(Command::FlipHorizontal);
    let report = s.tick();
    assert_eq!(report.position, 1);
    assert_eq!(*report.image, flip_horizontal(&frame(1)));

    s.scheduler.apply(Command::ToggleGrayscale);
    let report = s.tick();
    assert_eq!(report.position, 2);
    assert_eq!(*report.image, to_grayscale(&flip_horizontal(&frame(2))));

    // What was recorded stays as it was first rendered
    let cached = &s.scheduler.state().cached_frames()[1];
    assert_eq!(*cached.image, frame(1));
    assert_eq!(*cached.raw, frame(1));
}

#[test]
fn full_cache_closes_the_region() {
    let config = PlayerConfig {
        max_cached_frames: 3,
        ..PlayerConfig::default()
    };
    let mut s = session_with(PatternDecoder::new(20, WIDTH, HEIGHT), &config);
    s.positions(2);
    s.scheduler.apply(Command::MarkLoopStart);

    assert_eq!(s.positions(2), vec![3, 4]);
    assert_eq!(s.scheduler.mode(), PlaybackMode::Replaying);
    assert_eq!(s.scheduler.state().loop_end(), Some(4));
    assert_eq!(s.positions(4), vec![2, 3, 4, 2]);
}

#[test]
fn loop_start_after_a_hidden_frame_records_the_live_frame() {
    let mut s = session(20);
    s.positions(2);
    s.scheduler.apply(Command::ScaleUp);
    for _ in 0..10 {
        s.scheduler.apply(Command::PanRight);
    }
    let report = s.tick();
    assert!(report.recovered);
    assert_eq!(**s.scheduler.last_frame(), frame(2));

    s.scheduler.apply(Command::PanReset);
    s.scheduler.apply(Command::ScaleReset);
    s.scheduler.apply(Command::MarkLoopStart);
    let seed = &s.scheduler.state().cached_frames()[0];
    assert_eq!(seed.position, 3);
    assert_eq!(*seed.image, frame(3));

    s.positions(1);
    s.scheduler.apply(Command::MarkLoopEnd);
    let shown: Vec<_> = (0..2).map(|_| (*s.tick().image).clone()).collect();
    assert_eq!(shown, vec![frame(3), frame(4)]);
}

#[test]
fn reset_resumes_live_playback() {
    let mut s = session(20);
    s.positions(3);
    s.scheduler.apply(Command::MarkLoopStart);
    s.positions(3);
    s.scheduler.apply(Command::MarkLoopEnd);
    s.positions(4);

    s.scheduler.apply(Command::ResetLoopRegion);
    assert_eq!(s.scheduler.mode(), PlaybackMode::Running);
    assert!(s.scheduler.state().cached_frames().is_empty());
    assert_eq!(s.scheduler.state().position(), 6);

    let report = s.tick();
    assert_eq!(report.position, 7);
    assert_eq!(*report.image, frame(7));
}

#[test]
fn pause_is_honored_during_replay() {
    let mut s = session(20);
    s.scheduler.apply(Command::MarkLoopStart);
    s.positions(3);
    s.scheduler.apply(Command::MarkLoopEnd);
    s.positions(2);

    s.scheduler.apply(Command::TogglePause);
    assert_eq!(s.positions(3), vec![1, 1, 1]);
    s.scheduler.apply(Command::Step);
    assert_eq!(s.positions(2), vec![2, 2]);
}

#[test]
fn remarking_start_during_replay_opens_a_fresh_region() {
    let mut s = session(20);
    s.positions(4);
    s.scheduler.apply(Command::MarkLoopStart);
    s.positions(2);
    s.scheduler.apply(Command::MarkLoopEnd);
    s.positions(1);

    s.scheduler.apply(Command::MarkLoopStart);
    assert_eq!(s.scheduler.mode(), PlaybackMode::Caching);
    assert_eq!(s.scheduler.state().loop_start(), Some(6));
    let cached = s.scheduler.state().cached_frames();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].position, 6);

    assert_eq!(s.positions(2), vec![7, 8]);
    s.scheduler.apply(Command::MarkLoopEnd);
    assert_eq!(s.positions(4), vec![6, 7, 8, 6]);
}

#[test]
fn loop_end_without_start_keeps_running() {
    let mut s = session(20);
    s.positions(2);
    s.scheduler.apply(Command::MarkLoopEnd);
    assert_eq!(s.scheduler.mode(), PlaybackMode::Running);
    assert_eq!(s.positions(2), vec![3, 4]);
}

#[test]
fn loop_across_the_source_wrap() {
    let mut s = session(5);
    s.positions(3);
    s.scheduler.apply(Command::MarkLoopStart);
    assert_eq!(s.positions(4), vec![4, 0, 1, 2]);
    s.scheduler.apply(Command::MarkLoopEnd);
    assert_eq!(s.positions(6), vec![3, 4, 0, 1, 2, 3]);
}
