//! Error types for Loopview.

use thiserror::Error;

/// Main error type for Loopview operations.
#[derive(Error, Debug)]
pub enum LoopviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The frame source could not be opened. Fatal at startup.
    #[error("Cannot open source: {0}")]
    SourceOpen(String),

    #[error("Decoder error: {0}")]
    Decoder(String),

    /// A single frame could not be rendered. Recovered by the scheduler.
    #[error("Render error: {0}")]
    Render(String),

    /// The display collaborator rejected a frame. Recovered by the scheduler.
    #[error("Display error: {0}")]
    Display(String),

    /// A source ran dry and could not be restarted.
    #[error("End of stream")]
    StreamEnded,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LoopviewError {
    /// Whether the scheduler can recover by re-displaying the last frame.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Render(_) | Self::Display(_))
    }
}

/// Result type alias for Loopview operations.
pub type Result<T> = std::result::Result<T, LoopviewError>;
