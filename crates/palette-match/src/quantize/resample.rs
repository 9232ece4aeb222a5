//! Resampling to the target grid size.
//!
//! Each output cell covers a rectangle of source pixels. When shrinking the
//! rectangle spans several pixels and is averaged (alpha weighted); when
//! enlarging it collapses to the single source pixel under the cell, which
//! is nearest-neighbour sampling.

use super::bitmap::{Bitmap, Rgba};

/// Height that keeps the aspect ratio of `width × height` at `target_width`.
///
/// Never returns less than 1.
///
/// ```
/// use palette_match::quantize::target_height;
///
/// assert_eq!(target_height(100, 50, 10), 5);
/// assert_eq!(target_height(1000, 1, 10), 1);
/// ```
pub fn target_height(width: usize, height: usize, target_width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    (target_width * height / width).max(1)
}

/// Source span `[start, end)` covered by output index `i` of `dst` cells
/// mapped onto `src` pixels.
fn span(i: usize, src: usize, dst: usize) -> (usize, usize) {
    let start = i * src / dst;
    let end = ((i + 1) * src / dst).max(start + 1).min(src);
    (start, end)
}

/// Resample `bitmap` to `new_width × new_height`.
///
/// Returns a clone when the size already matches. Both target dimensions
/// must be non-zero and the source must not be empty.
pub fn resample(bitmap: &Bitmap, new_width: usize, new_height: usize) -> Bitmap {
    let (w, h) = (bitmap.width(), bitmap.height());
    if w == new_width && h == new_height {
        return bitmap.clone();
    }

    let mut out = Bitmap::filled(new_width, new_height, super::bitmap::CLEAR);
    for oy in 0..new_height {
        let (y0, y1) = span(oy, h, new_height);
        for ox in 0..new_width {
            let (x0, x1) = span(ox, w, new_width);
            out.set_pixel(ox, oy, average(bitmap, x0, x1, y0, y1));
        }
    }
    out
}

fn average(bitmap: &Bitmap, x0: usize, x1: usize, y0: usize, y1: usize) -> Rgba {
    if x1 - x0 == 1 && y1 - y0 == 1 {
        return bitmap.pixel(x0, y0).unwrap_or(super::bitmap::CLEAR);
    }

    let mut sum = [0u64; 3];
    let mut alpha_sum = 0u64;
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let Some([r, g, b, a]) = bitmap.pixel(x, y) else {
                continue;
            };
            let a = u64::from(a);
            sum[0] += u64::from(r) * a;
            sum[1] += u64::from(g) * a;
            sum[2] += u64::from(b) * a;
            alpha_sum += a;
            count += 1;
        }
    }

    if count == 0 || alpha_sum == 0 {
        return super::bitmap::CLEAR;
    }

    let channel = |s: u64| ((s + alpha_sum / 2) / alpha_sum) as u8;
    [
        channel(sum[0]),
        channel(sum[1]),
        channel(sum[2]),
        ((alpha_sum + count / 2) / count) as u8,
    ]
}
