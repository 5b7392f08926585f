//! Loopview Effects - pure frame transforms
//!
//! Every function here maps one frame to a new frame and touches no shared
//! state:
//! - horizontal / vertical flips
//! - quarter-turn rotation
//! - channel-mean grayscale
//! - area-averaging scale with a clamped viewport crop

pub mod resample;
pub mod transform;

pub use resample::{resize_area, scale_and_crop};
pub use transform::{flip_horizontal, flip_vertical, rotate_quarter_turns, to_grayscale};
