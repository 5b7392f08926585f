//! Loopview Core - Foundation types for the stream player
//!
//! This crate provides the fundamental types shared by every Loopview crate:
//! - Frame buffers and pixel formats
//! - Frame rates and frame intervals
//! - The error type
//! - Player configuration

pub mod config;
pub mod error;
pub mod frame;
pub mod time;

pub use config::{PlayerConfig, ViewportSize, CONFIG_ENV_VAR};
pub use error::{LoopviewError, Result};
pub use frame::{FrameBuffer, PixelFormat, SharedFrameBuffer};
pub use time::FrameRate;
