//! Loopview Media - frame sources
//!
//! This crate handles:
//! - Parsing the source specifier (camera index or file path)
//! - Decoding files and cameras through an FFmpeg subprocess
//! - Collecting stream metadata (frame rate, frame count)
//! - Cyclic restart of finite sources behind `SourceCursor`

pub mod cursor;
pub mod decoder;
pub mod pattern;
pub mod probe;
pub mod source;

pub use cursor::{CursorFrame, RestartPolicy, SourceCursor};
pub use decoder::{FrameDecoder, VideoDecoder};
pub use pattern::PatternDecoder;
pub use probe::StreamInfo;
pub use source::SourceSpec;

/// Open the decoder for a source specifier.
pub fn open(spec: &SourceSpec) -> loopview_core::Result<Box<dyn FrameDecoder>> {
    tracing::info!("Opening source {}", spec);
    Ok(Box::new(VideoDecoder::open(spec.clone())?))
}
