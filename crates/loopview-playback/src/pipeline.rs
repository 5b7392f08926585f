//! Fixed-order render pipeline.

use crate::state::PlaybackState;
use loopview_core::{FrameBuffer, Result, ViewportSize};
use loopview_effects::{
    flip_horizontal, flip_vertical, rotate_quarter_turns, scale_and_crop, to_grayscale,
};
use std::borrow::Cow;

/// Applies the enabled transforms in order:
/// scale+crop, vertical flip, horizontal flip, rotation, grayscale.
///
/// Stages at their identity value are skipped, so a frame with nothing
/// enabled comes out bit-identical to the input.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    viewport: ViewportSize,
}

impl RenderPipeline {
    pub fn new(viewport: ViewportSize) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Update the crop viewport, e.g. once the monitor size is known.
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// Render `raw` against the current state. Never mutates the state.
    pub fn render(&self, raw: &FrameBuffer, state: &PlaybackState) -> Result<FrameBuffer> {
        let mut img = Cow::Borrowed(raw);

        if state.scale_factor() != 1.0 {
            let (pan_x, pan_y) = state.pan();
            img = Cow::Owned(scale_and_crop(
                &img,
                state.scale_factor(),
                pan_x,
                pan_y,
                self.viewport.width,
                self.viewport.height,
            )?);
        }
        if state.flip_vertical() {
            img = Cow::Owned(flip_vertical(&img));
        }
        if state.flip_horizontal() {
            img = Cow::Owned(flip_horizontal(&img));
        }
        let turns = state.rotation_quarter_turns().rem_euclid(4);
        if turns != 0 {
            img = Cow::Owned(rotate_quarter_turns(&img, turns));
        }
        if state.grayscale() {
            img = Cow::Owned(to_grayscale(&img));
        }

        Ok(img.into_owned())
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(ViewportSize::default())
    }
}
