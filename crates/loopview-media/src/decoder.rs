//! Video decoder using FFmpeg via ffmpeg-sidecar.

use crate::probe::StreamInfo;
use crate::source::SourceSpec;
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::{ffmpeg_is_installed, FfmpegCommand};
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use ffmpeg_sidecar::iter::FfmpegIterator;
use loopview_core::{FrameBuffer, FrameRate, LoopviewError, PixelFormat, Result};
use tracing::{debug, info, warn};

/// Uniform contract over anything that yields raw frames.
///
/// Frames are RGB, RGBA or gray; `decode_frame` returns `Ok(None)` at
/// end-of-stream. Restart policy lives in `SourceCursor`, not here.
pub trait FrameDecoder {
    /// Native frame rate, if the source reports one.
    fn frame_rate(&self) -> Option<FrameRate>;

    /// Total frame count, 0 for live or unknown-length sources.
    fn frame_count(&self) -> u64;

    /// Live sources cannot be rewound.
    fn is_live(&self) -> bool;

    /// Decode the next frame.
    fn decode_frame(&mut self) -> Result<Option<FrameBuffer>>;

    /// Rewind to the first frame.
    fn restart(&mut self) -> Result<()>;
}

/// Video decoder using FFmpeg.
///
/// Spawns FFmpeg as a subprocess emitting raw `rgb24` frames on stdout.
/// This approach works without system FFmpeg development headers.
pub struct VideoDecoder {
    spec: SourceSpec,
    child: FfmpegChild,
    events: FfmpegIterator,
    info: StreamInfo,
    /// First frame, read during `open` while waiting for metadata.
    pending: Option<FrameBuffer>,
    frames_decoded: u64,
}

impl VideoDecoder {
    /// Open a file or camera for decoding.
    ///
    /// Fails with `SourceOpen` when FFmpeg is missing, the process cannot
    /// start, or the source yields no video frame at all.
    pub fn open(spec: SourceSpec) -> Result<Self> {
        if !ffmpeg_is_installed() {
            return Err(LoopviewError::SourceOpen(
                "ffmpeg binary not found on PATH".into(),
            ));
        }

        let (child, events) = spawn(&spec)?;
        let mut decoder = Self {
            spec,
            child,
            events,
            info: StreamInfo::default(),
            pending: None,
            frames_decoded: 0,
        };

        decoder.pending = decoder.pump().map_err(|e| match e {
            LoopviewError::Decoder(msg) => LoopviewError::SourceOpen(msg),
            other => other,
        })?;
        if decoder.pending.is_none() {
            return Err(LoopviewError::SourceOpen(format!(
                "{} produced no video frames",
                decoder.spec
            )));
        }

        info!(
            "Opened {}: {}x{} {} ({} frames)",
            decoder.spec,
            decoder.info.width,
            decoder.info.height,
            decoder
                .frame_rate()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unknown rate".into()),
            decoder.frame_count()
        );
        Ok(decoder)
    }

    /// Drive the event stream until a frame arrives or the process ends.
    fn pump(&mut self) -> Result<Option<FrameBuffer>> {
        let mut last_error = None;
        for event in self.events.by_ref() {
            self.info.observe(&event);
            match event {
                FfmpegEvent::OutputFrame(frame) => return convert_frame(frame).map(Some),
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                    debug!("ffmpeg: {}", msg);
                    last_error = Some(msg);
                }
                FfmpegEvent::Error(msg) => {
                    warn!("ffmpeg error: {}", msg);
                    last_error = Some(msg);
                }
                FfmpegEvent::Done => break,
                _ => {}
            }
        }

        match last_error {
            Some(msg) if self.frames_decoded == 0 => Err(LoopviewError::Decoder(msg)),
            _ => Ok(None),
        }
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!("ffmpeg already exited: {}", e);
        }
        let _ = self.child.wait();
    }
}

impl FrameDecoder for VideoDecoder {
    fn frame_rate(&self) -> Option<FrameRate> {
        self.info.fps.and_then(FrameRate::from_fps_f64)
    }

    fn frame_count(&self) -> u64 {
        if self.spec.is_live() {
            0
        } else {
            self.info.frame_count()
        }
    }

    fn is_live(&self) -> bool {
        self.spec.is_live()
    }

    fn decode_frame(&mut self) -> Result<Option<FrameBuffer>> {
        let frame = match self.pending.take() {
            Some(frame) => Some(frame),
            None => self.pump()?,
        };
        if frame.is_some() {
            self.frames_decoded += 1;
        }
        Ok(frame)
    }

    fn restart(&mut self) -> Result<()> {
        if self.spec.is_live() {
            return Err(LoopviewError::InvalidParameter(format!(
                "{} cannot be restarted",
                self.spec
            )));
        }
        self.shutdown();
        let (child, events) = spawn(&self.spec)?;
        self.child = child;
        self.events = events;
        self.pending = None;
        self.frames_decoded = 0;
        debug!("Restarted {}", self.spec);
        Ok(())
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn(spec: &SourceSpec) -> Result<(FfmpegChild, FfmpegIterator)> {
    let mut command = FfmpegCommand::new();
    command.hide_banner();
    match spec {
        SourceSpec::File(path) => {
            if !path.exists() {
                return Err(LoopviewError::SourceOpen(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
            command.input(path.to_string_lossy().as_ref());
        }
        SourceSpec::Camera(index) => {
            let (format, device) = camera_input(*index)?;
            command.format(format).input(device);
        }
    }
    command.rawvideo();

    let mut child = command
        .spawn()
        .map_err(|e| LoopviewError::SourceOpen(format!("failed to start ffmpeg: {}", e)))?;
    let events = child
        .iter()
        .map_err(|e| LoopviewError::SourceOpen(format!("ffmpeg output unavailable: {}", e)))?;
    Ok((child, events))
}

/// Platform capture format and device name for a camera index.
fn camera_input(index: u32) -> Result<(&'static str, String)> {
    if cfg!(target_os = "linux") {
        Ok(("v4l2", format!("/dev/video{}", index)))
    } else if cfg!(target_os = "macos") {
        Ok(("avfoundation", index.to_string()))
    } else {
        Err(LoopviewError::SourceOpen(format!(
            "camera capture is not supported on this platform (camera {})",
            index
        )))
    }
}

fn convert_frame(frame: OutputVideoFrame) -> Result<FrameBuffer> {
    let format = match frame.pix_fmt.as_str() {
        "rgb24" => PixelFormat::Rgb8,
        "rgba" => PixelFormat::Rgba8,
        "gray" => PixelFormat::Gray8,
        other => {
            return Err(LoopviewError::Decoder(format!(
                "unexpected output pixel format {}",
                other
            )))
        }
    };
    FrameBuffer::from_raw(frame.width, frame.height, format, frame.data)
        .map_err(|e| LoopviewError::Decoder(e.to_string()))
}
