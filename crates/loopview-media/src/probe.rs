//! Stream metadata gathered from FFmpeg's startup log.

use ffmpeg_sidecar::event::FfmpegEvent;
use serde::{Deserialize, Serialize};

/// Information about the primary video stream of a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    /// Reported frame rate, if any.
    pub fps: Option<f64>,
    /// Reported container duration in seconds, if any.
    pub duration: Option<f64>,
    pub pixel_format: String,
}

impl StreamInfo {
    /// Fold one FFmpeg event into the collected metadata.
    ///
    /// Only the first video input stream is recorded.
    pub fn observe(&mut self, event: &FfmpegEvent) {
        match event {
            FfmpegEvent::ParsedInputStream(stream) => {
                if self.width != 0 {
                    return;
                }
                if let Some(video) = stream.video_data() {
                    self.width = video.width;
                    self.height = video.height;
                    self.pixel_format = video.pix_fmt.clone();
                    if video.fps > 0.0 {
                        self.fps = Some(video.fps as f64);
                    }
                }
            }
            FfmpegEvent::ParsedDuration(duration) => {
                if self.duration.is_none() && duration.duration > 0.0 {
                    self.duration = Some(duration.duration);
                }
            }
            _ => {}
        }
    }

    /// Estimated frame count, 0 when unknown.
    pub fn frame_count(&self) -> u64 {
        match (self.duration, self.fps) {
            (Some(duration), Some(fps)) => estimate_frame_count(duration, fps),
            _ => 0,
        }
    }
}

/// `round(duration * fps)`, 0 for degenerate inputs.
pub fn estimate_frame_count(duration: f64, fps: f64) -> u64 {
    let frames = duration * fps;
    if frames.is_finite() && frames > 0.0 {
        frames.round() as u64
    } else {
        0
    }
}
