//! Player configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::error::{LoopviewError, Result};
use crate::time::FrameRate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "LOOPVIEW_CONFIG";

/// Viewport size used for crop bounds until the real monitor size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Tunables for one player session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Scale change per scale-up/scale-down command.
    pub scale_step: f64,
    /// Pan change in pixels per pan command.
    pub pan_step: i32,
    /// Rate assumed when a live source reports none.
    pub fallback_fps: f64,
    /// Lower bound of the drift-corrected tick delay.
    pub min_tick_delay_ms: u64,
    /// Crop viewport until the monitor size is detected.
    pub viewport: ViewportSize,
    /// Restart finite sources from the beginning on end-of-stream.
    pub cycle_finite_sources: bool,
    /// Make the rotate command force a render like the other toggles.
    pub rotate_forces_render: bool,
    /// Upper bound on frames recorded in one loop region; reaching it
    /// closes the region.
    pub max_cached_frames: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            scale_step: 0.1,
            pan_step: 5,
            fallback_fps: 25.0,
            min_tick_delay_ms: 1,
            viewport: ViewportSize::default(),
            cycle_finite_sources: true,
            rotate_forces_render: false,
            max_cached_frames: 750,
        }
    }
}

impl PlayerConfig {
    /// Parse a config from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| LoopviewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `LOOPVIEW_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would break state invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale_step.is_finite() && self.scale_step > 0.0) {
            return Err(LoopviewError::Config(format!(
                "scale_step must be > 0, got {}",
                self.scale_step
            )));
        }
        if self.pan_step <= 0 {
            return Err(LoopviewError::Config(format!(
                "pan_step must be > 0, got {}",
                self.pan_step
            )));
        }
        if FrameRate::from_fps_f64(self.fallback_fps).is_none() {
            return Err(LoopviewError::Config(format!(
                "fallback_fps must be > 0, got {}",
                self.fallback_fps
            )));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(LoopviewError::Config("viewport must be non-empty".into()));
        }
        if self.max_cached_frames == 0 {
            return Err(LoopviewError::Config("max_cached_frames must be > 0".into()));
        }
        Ok(())
    }

    /// Fallback rate as a `FrameRate`.
    pub fn fallback_frame_rate(&self) -> FrameRate {
        FrameRate::from_fps_f64(self.fallback_fps).unwrap_or_default()
    }
}
