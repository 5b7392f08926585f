//! Orientation and color transforms.
//!
//! All functions are pure: they borrow the input and return a new frame of
//! the same pixel format.

use loopview_core::FrameBuffer;
use rayon::prelude::*;

/// Mirror left-to-right.
pub fn flip_horizontal(img: &FrameBuffer) -> FrameBuffer {
    let bpp = img.bytes_per_pixel();
    let mut out = img.clone();
    for y in 0..img.height {
        let src = img.row(y);
        let dst = out.row_mut(y);
        for (dst_px, src_px) in dst.chunks_exact_mut(bpp).zip(src.chunks_exact(bpp).rev()) {
            dst_px.copy_from_slice(src_px);
        }
    }
    out
}

/// Mirror top-to-bottom.
pub fn flip_vertical(img: &FrameBuffer) -> FrameBuffer {
    let mut out = img.clone();
    for y in 0..img.height {
        out.row_mut(y).copy_from_slice(img.row(img.height - 1 - y));
    }
    out
}

/// Rotate counter-clockwise by `90° × (turns mod 4)`.
///
/// One turn moves the top edge to the left edge. Negative turns rotate
/// clockwise.
pub fn rotate_quarter_turns(img: &FrameBuffer, turns: i64) -> FrameBuffer {
    let turns = turns.rem_euclid(4);
    if turns == 0 {
        return img.clone();
    }

    let (w, h) = (img.width, img.height);
    let (out_w, out_h) = if turns == 2 { (w, h) } else { (h, w) };
    let bpp = img.bytes_per_pixel();
    let mut out = FrameBuffer::new(out_w, out_h, img.format);

    for y in 0..out_h {
        let row = out.row_mut(y);
        for x in 0..out_w {
            let (sx, sy) = match turns {
                1 => (w - 1 - y, x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (y, h - 1 - x),
            };
            let i = x as usize * bpp;
            row[i..i + bpp].copy_from_slice(img.pixel(sx, sy));
        }
    }
    out
}

/// Replace every color channel with the truncated arithmetic mean of the
/// pixel's color channels.
///
/// This is a plain average, not a luma weighting. Channel count is kept;
/// alpha passes through untouched and gray frames come back unchanged.
pub fn to_grayscale(img: &FrameBuffer) -> FrameBuffer {
    let mut out = img.clone();
    let colors = img.format.color_channels();
    if colors < 2 || img.is_empty() {
        return out;
    }

    let bpp = img.bytes_per_pixel();
    let stride = img.stride();
    out.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(bpp) {
            let sum: u32 = px[..colors].iter().map(|&c| c as u32).sum();
            let mean = (sum / colors as u32) as u8;
            px[..colors].fill(mean);
        }
    });
    out
}
