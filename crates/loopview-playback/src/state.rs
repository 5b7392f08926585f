//! Playback state and the commands that mutate it.
//!
//! `PlaybackState` never touches pixels or time. The scheduler owns the
//! single instance for a session; the UI reaches it only through
//! `PlaybackScheduler::apply`, and the render pipeline reads it.

use loopview_core::{PlayerConfig, SharedFrameBuffer};
use serde::{Deserialize, Serialize};

/// Slack for accumulated float error in repeated scale steps.
const SCALE_EPSILON: f64 = 1e-9;

/// Where the scheduler pulls frames from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Cyclic pull from the frame source.
    Running,
    /// Loop start marked: pull from the source and record each frame.
    Caching,
    /// Loop closed: cycle through the recorded frames, re-rendering each.
    Replaying,
}

/// A frame recorded inside a loop region.
#[derive(Debug, Clone)]
pub struct CachedFrame {
    /// Source position of the frame.
    pub position: u64,
    /// Decoded frame, rendered again on every replay.
    pub raw: SharedFrameBuffer,
    /// The frame as rendered when it was recorded.
    pub image: SharedFrameBuffer,
}

/// All user-controllable playback parameters plus derived counters.
#[derive(Debug)]
pub struct PlaybackState {
    position: u64,
    frame_count: u64,

    paused: bool,
    /// Render a new frame on the next tick.
    advance_pending: bool,

    flip_horizontal: bool,
    flip_vertical: bool,
    rotation_quarter_turns: i64,
    grayscale: bool,

    scale_factor: f64,
    scale_step: f64,
    pan_x: i32,
    pan_y: i32,
    pan_step: i32,

    loop_start: Option<u64>,
    loop_end: Option<u64>,
    loop_active: bool,
    cached_frames: Vec<CachedFrame>,
    max_cached_frames: usize,

    rotate_forces_render: bool,
}

impl PlaybackState {
    /// Fresh state: no transforms, scale 1.0, playing.
    pub fn new(config: &PlayerConfig, frame_count: u64) -> Self {
        Self {
            position: 0,
            frame_count,
            paused: false,
            advance_pending: true,
            flip_horizontal: false,
            flip_vertical: false,
            rotation_quarter_turns: 0,
            grayscale: false,
            scale_factor: 1.0,
            scale_step: config.scale_step,
            pan_x: 0,
            pan_y: 0,
            pan_step: config.pan_step,
            loop_start: None,
            loop_end: None,
            loop_active: false,
            cached_frames: Vec::new(),
            max_cached_frames: config.max_cached_frames.max(1),
            rotate_forces_render: config.rotate_forces_render,
        }
    }

    // === Accessors ===

    /// Position of the frame currently on screen.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Frames per pass, 0 for live sources.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn advance_pending(&self) -> bool {
        self.advance_pending
    }

    pub fn flip_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    pub fn flip_vertical(&self) -> bool {
        self.flip_vertical
    }

    /// Raw accumulated quarter turns; consumers apply it mod 4.
    pub fn rotation_quarter_turns(&self) -> i64 {
        self.rotation_quarter_turns
    }

    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn scale_step(&self) -> f64 {
        self.scale_step
    }

    /// Pan offsets `(x, y)` in scaled-image pixels.
    pub fn pan(&self) -> (i32, i32) {
        (self.pan_x, self.pan_y)
    }

    pub fn loop_start(&self) -> Option<u64> {
        self.loop_start
    }

    pub fn loop_end(&self) -> Option<u64> {
        self.loop_end
    }

    pub fn loop_active(&self) -> bool {
        self.loop_active
    }

    pub fn cached_frames(&self) -> &[CachedFrame] {
        &self.cached_frames
    }

    pub fn mode(&self) -> PlaybackMode {
        if self.loop_active {
            PlaybackMode::Replaying
        } else if self.loop_start.is_some() {
            PlaybackMode::Caching
        } else {
            PlaybackMode::Running
        }
    }

    /// "position / total" line for the window title.
    pub fn status(&self) -> String {
        format!("{}/{}", self.position, self.frame_count)
    }

    // === Commands ===

    /// Pause or resume. Resuming schedules a fresh frame right away.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.advance_pending = !self.paused;
    }

    /// Advance exactly one frame, then stay paused.
    pub fn step(&mut self) {
        self.advance_pending = true;
        self.paused = true;
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.flip_horizontal = !self.flip_horizontal;
        self.advance_pending = true;
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.flip_vertical = !self.flip_vertical;
        self.advance_pending = true;
    }

    /// One more counter-clockwise quarter turn.
    ///
    /// Unlike the toggles this does not force a render unless
    /// `rotate_forces_render` is configured; a paused player shows the
    /// rotation with the next advanced frame.
    pub fn rotate(&mut self) {
        self.rotation_quarter_turns = self.rotation_quarter_turns.wrapping_add(1);
        if self.rotate_forces_render {
            self.advance_pending = true;
        }
    }

    pub fn toggle_grayscale(&mut self) {
        self.grayscale = !self.grayscale;
        self.advance_pending = true;
    }

    pub fn scale_up(&mut self) {
        self.scale_factor += self.scale_step;
    }

    /// Shrink by one step; refused once the factor is at or below one step.
    pub fn scale_down(&mut self) {
        if self.scale_factor - self.scale_step > SCALE_EPSILON {
            self.scale_factor -= self.scale_step;
        }
    }

    pub fn scale_reset(&mut self) {
        self.scale_factor = 1.0;
    }

    pub fn pan_up(&mut self) {
        self.pan_y += self.pan_step;
    }

    pub fn pan_down(&mut self) {
        self.pan_y -= self.pan_step;
    }

    pub fn pan_left(&mut self) {
        self.pan_x -= self.pan_step;
    }

    pub fn pan_right(&mut self) {
        self.pan_x += self.pan_step;
    }

    pub fn pan_reset(&mut self) {
        self.pan_x = 0;
        self.pan_y = 0;
    }

    /// Drop any region and open a new one at the current position.
    pub fn mark_loop_start(&mut self) {
        self.reset_loop_region();
        self.loop_start = Some(self.position);
    }

    /// Close the region at the current position.
    ///
    /// Ordering against the start marker is not checked: an end at or
    /// before the start yields whatever frames were recorded. Without a
    /// start marker the end is recorded but no loop activates.
    pub fn mark_loop_end(&mut self) {
        self.loop_end = Some(self.position);
        self.loop_active = self.loop_start.is_some();
    }

    /// Clear the cache and both markers.
    pub fn reset_loop_region(&mut self) {
        self.cached_frames.clear();
        self.loop_start = None;
        self.loop_end = None;
        self.loop_active = false;
    }

    // === Scheduler hooks ===

    /// Decide whether this tick advances, consuming a single step while paused.
    pub(crate) fn begin_advance(&mut self) -> bool {
        if !self.advance_pending {
            return false;
        }
        if self.paused {
            self.advance_pending = false;
        }
        true
    }

    /// Move to the next position, wrapping for finite sources.
    pub(crate) fn advance_position(&mut self) {
        self.position = if self.frame_count == 0 {
            self.position + 1
        } else {
            (self.position + 1) % self.frame_count
        };
    }

    pub(crate) fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    /// Record a frame while a region is open.
    ///
    /// Returns true when this frame filled the cache; the region is then
    /// closed at the current position.
    pub(crate) fn cache_frame(
        &mut self,
        position: u64,
        raw: SharedFrameBuffer,
        image: SharedFrameBuffer,
    ) -> bool {
        if self.mode() != PlaybackMode::Caching {
            return false;
        }
        self.cached_frames.push(CachedFrame {
            position,
            raw,
            image,
        });
        if self.cached_frames.len() >= self.max_cached_frames {
            self.mark_loop_end();
            return true;
        }
        false
    }
}
