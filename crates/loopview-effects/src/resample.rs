//! Area-averaging resize and viewport crop.

use loopview_core::{FrameBuffer, LoopviewError, Result};
use rayon::prelude::*;

/// Source taps for one output sample: `(source index, weight)`, weights sum to 1.
type Taps = Vec<(u32, f32)>;

/// Per-axis coverage weights for an area resample from `src_len` to `dst_len`.
///
/// Every output sample averages the source samples its footprint covers,
/// weighted by the covered fraction.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = (start + scale).min(src_len as f64);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            let mut taps: Taps = (first..last)
                .filter_map(|s| {
                    let covered = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (covered > 0.0).then_some((s, covered as f32))
                })
                .collect();
            let total: f32 = taps.iter().map(|&(_, w)| w).sum();
            for tap in &mut taps {
                tap.1 /= total;
            }
            taps
        })
        .collect()
}

/// Resize with area averaging. Dimensions of 0 are rejected.
pub fn resize_area(img: &FrameBuffer, width: u32, height: u32) -> Result<FrameBuffer> {
    if width == 0 || height == 0 || img.is_empty() {
        return Err(LoopviewError::Render(format!(
            "cannot resize {}x{} to {}x{}",
            img.width, img.height, width, height
        )));
    }
    if (width, height) == (img.width, img.height) {
        return Ok(img.clone());
    }

    let x_taps = area_taps(img.width, width);
    let y_taps = area_taps(img.height, height);
    let bpp = img.bytes_per_pixel();
    let mut out = FrameBuffer::new(width, height, img.format);
    let stride = out.stride();

    out.data_mut()
        .par_chunks_mut(stride)
        .zip(y_taps.par_iter())
        .for_each(|(row, ys)| {
            let mut acc = vec![0f32; bpp];
            for (x, xs) in x_taps.iter().enumerate() {
                acc.fill(0.0);
                for &(sy, wy) in ys {
                    for &(sx, wx) in xs {
                        let w = wy * wx;
                        for (a, &c) in acc.iter_mut().zip(img.pixel(sx, sy)) {
                            *a += c as f32 * w;
                        }
                    }
                }
                let i = x * bpp;
                for (dst, a) in row[i..i + bpp].iter_mut().zip(&acc) {
                    *dst = a.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    Ok(out)
}

/// Scale by `factor`, then cut out what a viewport would show at the
/// given pan offsets.
///
/// The visible window spans `max(viewport, scaled)` along each axis,
/// shifted by the offset, and is clamped to the scaled image. Panning
/// past the image, or scaling it below one pixel, gives an empty frame.
pub fn scale_and_crop(
    img: &FrameBuffer,
    factor: f64,
    offset_x: i32,
    offset_y: i32,
    viewport_w: u32,
    viewport_h: u32,
) -> Result<FrameBuffer> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(LoopviewError::InvalidParameter(format!(
            "scale factor must be > 0, got {}",
            factor
        )));
    }

    let scaled_w = (img.width as f64 * factor) as u32;
    let scaled_h = (img.height as f64 * factor) as u32;
    if scaled_w == 0 || scaled_h == 0 {
        return Ok(FrameBuffer::new(scaled_w, scaled_h, img.format));
    }
    let scaled = resize_area(img, scaled_w, scaled_h)?;

    let (x0, x1) = crop_span(scaled_w, viewport_w, offset_x);
    let (y0, y1) = crop_span(scaled_h, viewport_h, offset_y);
    if (x0, y0, x1, y1) == (0, 0, scaled_w, scaled_h) {
        return Ok(scaled);
    }

    let bpp = scaled.bytes_per_pixel();
    let (crop_w, crop_h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
    let mut out = FrameBuffer::new(crop_w, crop_h, scaled.format);
    for y in 0..crop_h {
        let src = scaled.row(y0 + y);
        let start = x0 as usize * bpp;
        out.row_mut(y)
            .copy_from_slice(&src[start..start + crop_w as usize * bpp]);
    }
    Ok(out)
}

/// `[max(0, offset), min(scaled, max(viewport, scaled) + offset))`, clamped to `[0, scaled]`.
fn crop_span(scaled: u32, viewport: u32, offset: i32) -> (u32, u32) {
    let scaled = scaled as i64;
    let onscreen = (viewport as i64).max(scaled);
    let offset = offset as i64;
    let start = offset.max(0).clamp(0, scaled);
    let end = (onscreen + offset).min(scaled).clamp(0, scaled);
    (start as u32, end as u32)
}
