//! Source specifier parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceSpec {
    /// Capture device by index.
    Camera(u32),
    /// Video file on disk.
    File(PathBuf),
}

impl SourceSpec {
    /// Parse the optional startup argument.
    ///
    /// An all-digit string is a camera index; anything else is a path.
    /// No argument means camera 0.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Camera(0),
            Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
                .parse()
                .map(Self::Camera)
                .unwrap_or_else(|_| Self::File(PathBuf::from(s))),
            Some(s) => Self::File(PathBuf::from(s)),
        }
    }

    /// Live sources have no known length and never restart.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Camera(_))
    }
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self::Camera(0)
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera(index) => write!(f, "camera {}", index),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
