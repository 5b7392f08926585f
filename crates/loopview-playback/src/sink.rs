//! Display seam between the scheduler and whatever paints frames.

use loopview_core::{Result, SharedFrameBuffer};

/// Receives the rendered image and status line once per tick.
pub trait FrameSink {
    /// Show `frame`. An error makes the scheduler fall back to the last
    /// successfully shown frame.
    fn present(&mut self, frame: &SharedFrameBuffer) -> Result<()>;

    /// Update the "position / total" status line.
    fn set_status(&mut self, _status: &str) {}
}
