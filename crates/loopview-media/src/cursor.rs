//! Restartable frame cursor over a decoder.
//!
//! The cursor turns a finite decoder into an endless sequence: when the
//! decoder runs dry it is rewound and reading continues from frame 0.
//! Consumers only ever see `None` when the source is live, restarts are
//! disabled, or a freshly restarted source still yields nothing.

use crate::decoder::FrameDecoder;
use loopview_core::{FrameBuffer, FrameRate, Result};
use tracing::{info, warn};

/// What to do when a finite source reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Rewind and keep going.
    #[default]
    Cycle,
    /// Report end-of-stream.
    Stop,
}

/// A frame handed out by the cursor.
#[derive(Debug, Clone)]
pub struct CursorFrame {
    pub buffer: FrameBuffer,
    /// Index within the current pass over the source.
    pub index: u64,
    /// True for the first frame after a rewind.
    pub restarted: bool,
}

/// Lazy, restartable sequence of raw frames.
pub struct SourceCursor {
    decoder: Box<dyn FrameDecoder>,
    policy: RestartPolicy,
    next_index: u64,
    passes: u64,
    ended: bool,
}

impl SourceCursor {
    /// Wrap a decoder. Live decoders always get `RestartPolicy::Stop`.
    pub fn new(decoder: Box<dyn FrameDecoder>, policy: RestartPolicy) -> Self {
        let policy = if decoder.is_live() {
            RestartPolicy::Stop
        } else {
            policy
        };
        Self {
            decoder,
            policy,
            next_index: 0,
            passes: 0,
            ended: false,
        }
    }

    pub fn policy(&self) -> RestartPolicy {
        self.policy
    }

    /// Native frame rate, if reported.
    pub fn frame_rate(&self) -> Option<FrameRate> {
        self.decoder.frame_rate()
    }

    /// Total frames per pass, 0 when unknown.
    pub fn frame_count(&self) -> u64 {
        self.decoder.frame_count()
    }

    /// Completed passes over the source.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Produce the next raw frame, rewinding a finite source on exhaustion.
    pub fn next_frame(&mut self) -> Result<Option<CursorFrame>> {
        if self.ended {
            return Ok(None);
        }

        if let Some(buffer) = self.decoder.decode_frame()? {
            return Ok(Some(self.hand_out(buffer, false)));
        }

        if self.policy == RestartPolicy::Stop {
            info!("Source ended after {} frames", self.next_index);
            self.ended = true;
            return Ok(None);
        }

        self.decoder.restart()?;
        self.passes += 1;
        self.next_index = 0;
        info!("Source exhausted, restarting (pass {})", self.passes + 1);

        match self.decoder.decode_frame()? {
            Some(buffer) => Ok(Some(self.hand_out(buffer, true))),
            None => {
                warn!("Source yielded no frames after restart");
                self.ended = true;
                Ok(None)
            }
        }
    }

    fn hand_out(&mut self, buffer: FrameBuffer, restarted: bool) -> CursorFrame {
        let index = self.next_index;
        self.next_index += 1;
        CursorFrame {
            buffer,
            index,
            restarted,
        }
    }
}
