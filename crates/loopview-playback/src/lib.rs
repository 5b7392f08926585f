//! Loopview Playback - the playback engine
//!
//! - `PlaybackState`: every user-controllable parameter and the commands
//!   that mutate it
//! - `RenderPipeline`: fixed-order transform chain driven by the state
//! - `PlaybackScheduler`: per-tick pull, render, display and drift-corrected
//!   rescheduling, plus the loop-region cache
//! - `Command`: the user actions, with labels and keyboard shortcuts

pub mod commands;
pub mod pipeline;
pub mod scheduler;
pub mod sink;
pub mod state;
pub mod ticker;

pub use commands::{Command, CommandCategory};
pub use pipeline::RenderPipeline;
pub use scheduler::{CommandOutcome, PlaybackScheduler, TickReport};
pub use sink::FrameSink;
pub use state::{CachedFrame, PlaybackMode, PlaybackState};
pub use ticker::{Clock, ManualClock, SystemClock, Ticker};
