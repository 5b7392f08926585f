//! Synthetic frame source.
//!
//! Produces deterministic RGB frames whose pixels encode the frame index,
//! so any frame can be regenerated with [`PatternDecoder::frame`] and
//! compared byte-for-byte against what a player displayed.

use crate::decoder::FrameDecoder;
use loopview_core::{FrameBuffer, FrameRate, PixelFormat, Result};

/// In-memory decoder yielding generated frames.
#[derive(Debug, Clone)]
pub struct PatternDecoder {
    /// `None` for a live (endless, unrestartable) source.
    frame_count: Option<u64>,
    width: u32,
    height: u32,
    frame_rate: Option<FrameRate>,
    next: u64,
}

impl PatternDecoder {
    /// A finite source of `frame_count` frames at 25 fps.
    pub fn new(frame_count: u64, width: u32, height: u32) -> Self {
        Self {
            frame_count: Some(frame_count),
            width,
            height,
            frame_rate: Some(FrameRate::FPS_25),
            next: 0,
        }
    }

    /// An endless source with no reported rate, like a webcam.
    pub fn live(width: u32, height: u32) -> Self {
        Self {
            frame_count: None,
            width,
            height,
            frame_rate: None,
            next: 0,
        }
    }

    pub fn with_frame_rate(mut self, rate: Option<FrameRate>) -> Self {
        self.frame_rate = rate;
        self
    }

    /// The frame this source yields at `index`.
    pub fn frame(index: u64, width: u32, height: u32) -> FrameBuffer {
        let mut frame = FrameBuffer::new(width, height, PixelFormat::Rgb8);
        for y in 0..height {
            let row = frame.row_mut(y);
            for x in 0..width {
                let i = x as usize * 3;
                row[i] = (x as u64 * 17 + index * 29) as u8;
                row[i + 1] = (y as u64 * 31 + index * 7) as u8;
                row[i + 2] = index as u8;
            }
        }
        frame
    }
}

impl FrameDecoder for PatternDecoder {
    fn frame_rate(&self) -> Option<FrameRate> {
        self.frame_rate
    }

    fn frame_count(&self) -> u64 {
        self.frame_count.unwrap_or(0)
    }

    fn is_live(&self) -> bool {
        self.frame_count.is_none()
    }

    fn decode_frame(&mut self) -> Result<Option<FrameBuffer>> {
        if let Some(count) = self.frame_count {
            if self.next >= count {
                return Ok(None);
            }
        }
        let frame = Self::frame(self.next, self.width, self.height);
        self.next += 1;
        Ok(Some(frame))
    }

    fn restart(&mut self) -> Result<()> {
        self.next = 0;
        Ok(())
    }
}
