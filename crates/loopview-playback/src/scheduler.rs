//! Playback scheduler: the per-tick state machine.
//!
//! # Tick
//!
//! 1. Without a pending advance, re-show the last image (hold path).
//! 2. While paused, consume the pending flag so one step shows one frame.
//! 3. Pull the next frame: from the source when running or caching, from
//!    the loop cache when replaying.
//! 4. Render it against the current state, cached frames included.
//! 5. While caching, record the frame; a full cache closes the region.
//! 6. Advance the position, wrapping for finite sources.
//! 7. Present the image; on failure re-present the last good one.
//! 8. Reschedule after `max(min_delay, target - elapsed)`.
//!
//! # Modes
//!
//! `Running -> Caching` on mark-loop-start, `Caching -> Replaying` on
//! mark-loop-end, back to `Running` on reset-loop-region. Pause, step and
//! transform commands never change the mode.

use crate::commands::Command;
use crate::pipeline::RenderPipeline;
use crate::sink::FrameSink;
use crate::state::{PlaybackMode, PlaybackState};
use crate::ticker::{Clock, SystemClock, Ticker};
use loopview_core::{FrameBuffer, LoopviewError, PlayerConfig, Result, SharedFrameBuffer};
use loopview_media::SourceCursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// What one tick did.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Image on screen after the tick.
    pub image: SharedFrameBuffer,
    /// A new frame was pulled (false on the hold path).
    pub advanced: bool,
    /// A render or display failure was covered by the previous image.
    pub recovered: bool,
    pub position: u64,
    pub mode: PlaybackMode,
    pub status: String,
    /// Wait this long before the next tick.
    pub delay: Duration,
}

/// Result of applying a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// Owns the playback state, the frame source and the loop cache.
pub struct PlaybackScheduler<C: Clock = SystemClock> {
    state: PlaybackState,
    cursor: SourceCursor,
    pipeline: RenderPipeline,
    ticker: Ticker,
    clock: C,
    /// Last image successfully handed to the sink.
    last_frame: SharedFrameBuffer,
    /// Last frame pulled from the source, before rendering.
    live_raw: SharedFrameBuffer,
    /// Position of `live_raw`.
    live_position: u64,
    replay_index: usize,
}

impl PlaybackScheduler<SystemClock> {
    /// Build a scheduler on the wall clock.
    pub fn new(cursor: SourceCursor, config: &PlayerConfig) -> Result<Self> {
        Self::with_clock(cursor, config, SystemClock)
    }
}

impl<C: Clock> PlaybackScheduler<C> {
    /// Build a scheduler and render the first frame at position 0.
    ///
    /// A source that cannot produce even one frame is a startup failure.
    pub fn with_clock(mut cursor: SourceCursor, config: &PlayerConfig, clock: C) -> Result<Self> {
        let first = cursor.next_frame()?.ok_or_else(|| {
            LoopviewError::SourceOpen("source produced no frames".into())
        })?;

        let state = PlaybackState::new(config, cursor.frame_count());
        let pipeline = RenderPipeline::new(config.viewport);
        let live_raw = Arc::new(first.buffer);
        let last_frame = Arc::new(pipeline.render(&live_raw, &state)?);

        let rate = cursor
            .frame_rate()
            .unwrap_or_else(|| config.fallback_frame_rate());
        let ticker = Ticker::new(
            rate.frame_interval(),
            Duration::from_millis(config.min_tick_delay_ms),
            clock.now(),
        );
        info!(
            "Playback ready: {} frames at {} (tick every {:?})",
            state.frame_count(),
            rate,
            ticker.target()
        );

        Ok(Self {
            state,
            cursor,
            pipeline,
            ticker,
            clock,
            last_frame,
            live_raw,
            live_position: 0,
            replay_index: 0,
        })
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.state.mode()
    }

    /// Image currently on screen.
    pub fn last_frame(&self) -> &SharedFrameBuffer {
        &self.last_frame
    }

    pub fn status(&self) -> String {
        self.state.status()
    }

    /// Desired interval between frames.
    pub fn target_interval(&self) -> Duration {
        self.ticker.target()
    }

    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline {
        &mut self.pipeline
    }

    /// Apply one user command between ticks.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        debug!("Command {}", command.id());
        match command {
            Command::Quit => return CommandOutcome::Quit,
            Command::TogglePause => self.state.toggle_pause(),
            Command::Step => self.state.step(),
            Command::FlipHorizontal => self.state.toggle_flip_horizontal(),
            Command::FlipVertical => self.state.toggle_flip_vertical(),
            Command::ScaleUp => self.state.scale_up(),
            Command::ScaleReset => self.state.scale_reset(),
            Command::ScaleDown => self.state.scale_down(),
            Command::PanLeft => self.state.pan_left(),
            Command::PanRight => self.state.pan_right(),
            Command::PanUp => self.state.pan_up(),
            Command::PanDown => self.state.pan_down(),
            Command::PanReset => self.state.pan_reset(),
            Command::MarkLoopStart => self.mark_loop_start(),
            Command::ResetLoopRegion => {
                self.state.reset_loop_region();
                self.state.set_position(self.live_position);
            }
            Command::MarkLoopEnd => {
                self.state.mark_loop_end();
                self.replay_index = 0;
                if self.state.loop_active() {
                    info!(
                        "Loop closed: {} cached frames",
                        self.state.cached_frames().len()
                    );
                }
            }
            Command::Rotate => self.state.rotate(),
            Command::ToggleGrayscale => self.state.toggle_grayscale(),
        }
        CommandOutcome::Continue
    }

    /// Open a region at the last source frame and record that frame.
    ///
    /// The frame is rendered afresh: the image on screen may be an older
    /// one kept after a failed tick, or a replayed frame from the old region.
    fn mark_loop_start(&mut self) {
        self.state.set_position(self.live_position);
        self.state.mark_loop_start();
        let raw = self.live_raw.clone();
        match self.render(&raw, self.live_position) {
            Ok(Some(image)) => self.record(self.live_position, raw, image),
            Ok(None) => {}
            Err(e) => warn!("Loop start frame could not be rendered: {}", e),
        }
    }

    fn record(&mut self, position: u64, raw: SharedFrameBuffer, image: SharedFrameBuffer) {
        if self.state.cache_frame(position, raw, image) {
            self.replay_index = 0;
            warn!(
                "Loop cache full at {} frames, closing the region at {}",
                self.state.cached_frames().len(),
                position
            );
        }
    }

    /// Present the image on screen without ticking, e.g. the primed first
    /// frame before playback starts.
    pub fn show_current(&self, sink: &mut dyn FrameSink) -> Result<()> {
        sink.present(&self.last_frame)?;
        sink.set_status(&self.state.status());
        Ok(())
    }

    /// Run one tick and present its image to `sink`.
    ///
    /// Errors are fatal: the source ended without restart (`StreamEnded`)
    /// or the decoder failed. Render and display failures are absorbed.
    pub fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<TickReport> {
        let advanced = self.state.begin_advance();
        let mut recovered = false;

        let mut image = if advanced {
            match self.advance()? {
                Some(image) => image,
                None => {
                    recovered = true;
                    self.last_frame.clone()
                }
            }
        } else {
            self.last_frame.clone()
        };

        if let Err(e) = sink.present(&image) {
            warn!("Display failed, keeping previous frame: {}", e);
            if let Err(e) = sink.present(&self.last_frame) {
                warn!("Previous frame could not be shown either: {}", e);
            }
            image = self.last_frame.clone();
            recovered = true;
        }
        self.last_frame = image.clone();

        let status = self.state.status();
        sink.set_status(&status);

        let delay = self.ticker.reschedule(self.clock.now());
        trace!(
            "Tick {} advanced={} recovered={} next in {:?}",
            status,
            advanced,
            recovered,
            delay
        );

        Ok(TickReport {
            image,
            advanced,
            recovered,
            position: self.state.position(),
            mode: self.state.mode(),
            status,
            delay,
        })
    }

    /// Steps 3-6. `Ok(None)` when the frame could not be rendered.
    fn advance(&mut self) -> Result<Option<SharedFrameBuffer>> {
        if self.state.mode() == PlaybackMode::Replaying {
            let cached = self.state.cached_frames();
            if !cached.is_empty() {
                let entry = &cached[self.replay_index % cached.len()];
                let (position, raw) = (entry.position, entry.raw.clone());
                self.replay_index = (self.replay_index + 1) % cached.len();
                self.state.set_position(position);
                return self.render(&raw, position);
            }
        }

        let frame = self
            .cursor
            .next_frame()?
            .ok_or(LoopviewError::StreamEnded)?;
        let (index, restarted) = (frame.index, frame.restarted);
        let raw = Arc::new(frame.buffer);
        let rendered = self.render(&raw, index)?;

        if restarted {
            self.state.set_position(0);
        } else {
            self.state.advance_position();
        }
        self.live_position = self.state.position();
        self.live_raw = raw.clone();

        if let Some(image) = &rendered {
            self.record(self.live_position, raw, image.clone());
        }
        Ok(rendered)
    }

    /// Render against the current state. Transient failures give `Ok(None)`.
    fn render(&self, raw: &FrameBuffer, position: u64) -> Result<Option<SharedFrameBuffer>> {
        match self.pipeline.render(raw, &self.state) {
            Ok(image) => Ok(Some(Arc::new(image))),
            Err(e) if e.is_transient() => {
                warn!("Render failed at frame {}, keeping previous frame: {}", position, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Tick until `should_stop` says so, sleeping the computed delay
    /// between ticks. End-of-stream ends the loop cleanly.
    pub fn run_blocking(
        &mut self,
        sink: &mut dyn FrameSink,
        mut should_stop: impl FnMut(&TickReport) -> bool,
    ) -> Result<()> {
        if let Err(e) = self.show_current(sink) {
            warn!("First frame could not be shown: {}", e);
        }
        std::thread::sleep(self.ticker.target());
        loop {
            let report = match self.tick(sink) {
                Ok(report) => report,
                Err(LoopviewError::StreamEnded) => {
                    info!("Stream ended at {}", self.state.status());
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            if should_stop(&report) {
                return Ok(());
            }
            std::thread::sleep(report.delay);
        }
    }
}
