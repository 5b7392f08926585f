//! Integration test crate for Loopview.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! Sessions run against the synthetic pattern source and a hand-driven
//! clock, so no FFmpeg or display is needed.


#[cfg(test)]
mod playback;

#[cfg(test)]
mod looping;

#[cfg(test)]
mod rendering;
