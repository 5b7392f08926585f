//! Frame buffer types for video frames in CPU memory.
//!
//! Frames are tightly packed, row-major and channel-interleaved. The
//! transform library relies on that layout: row `y` starts at
//! `y * width * bytes_per_pixel`.

use crate::error::{LoopviewError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGB (24 bits per pixel), what the decoder emits
    #[default]
    Rgb8,
    /// 8-bit RGBA (32 bits per pixel)
    Rgba8,
    /// 8-bit grayscale
    Gray8,
}

impl PixelFormat {
    /// Bytes per pixel (equal to the channel count for 8-bit formats).
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
            Self::Gray8 => 1,
        }
    }

    /// Number of color channels that carry intensity (alpha excluded).
    pub fn color_channels(self) -> usize {
        match self {
            Self::Rgb8 | Self::Rgba8 => 3,
            Self::Gray8 => 1,
        }
    }

    /// Calculate total bytes needed for a frame of this format.
    pub fn frame_size(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

/// A video frame in CPU memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixel format
    pub format: PixelFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Packed pixel data, `frame_size(width, height)` bytes
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a zeroed frame buffer with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            format,
            width,
            height,
            data: vec![0u8; format.frame_size(width, height)],
        }
    }

    /// Wrap already-decoded pixel data, checking that its length matches.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = format.frame_size(width, height);
        if data.len() != expected {
            return Err(LoopviewError::InvalidParameter(format!(
                "{}x{} {:?} frame needs {} bytes, got {}",
                width,
                height,
                format,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    /// Bytes per pixel of this frame's format.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Raw pixel data, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Channel values of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.bytes_per_pixel();
        let start = y as usize * self.stride() + x as usize * bpp;
        &self.data[start..start + bpp]
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }

    /// A frame filled with one color. `color` must have one value per channel.
    pub fn solid(width: u32, height: u32, format: PixelFormat, color: &[u8]) -> Self {
        let mut frame = Self::new(width, height, format);
        for px in frame.data.chunks_exact_mut(format.bytes_per_pixel()) {
            px.copy_from_slice(color);
        }
        frame
    }

    /// Create a test pattern frame (color bars) in RGB.
    pub fn test_pattern(width: u32, height: u32) -> Self {
        const BARS: [[u8; 3]; 8] = [
            [255, 255, 255], // White
            [255, 255, 0],   // Yellow
            [0, 255, 255],   // Cyan
            [0, 255, 0],     // Green
            [255, 0, 255],   // Magenta
            [255, 0, 0],     // Red
            [0, 0, 255],     // Blue
            [0, 0, 0],       // Black
        ];

        let mut frame = Self::new(width, height, PixelFormat::Rgb8);
        for y in 0..height {
            let row = frame.row_mut(y);
            for x in 0..width {
                let i = x as usize * 3;
                let bar = (x as u64 * 8 / width as u64) as usize;
                row[i..i + 3].copy_from_slice(&BARS[bar]);
            }
        }
        frame
    }
}

/// Arc-wrapped frame buffer for shared ownership.
pub type SharedFrameBuffer = Arc<FrameBuffer>;
