use rayon::prelude::*;

use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::render::backend::FrameRGBA;
use crate::session::race_session::Frame;

/// Colors used by the CPU rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOpts {
    /// Clear color.
    pub background: Rgba8,
    /// Axis gridline color.
    pub grid: Rgba8,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(18, 20, 28),
            grid: Rgba8 {
                r: 255,
                g: 255,
                b: 255,
                a: 40,
            },
        }
    }
}

/// Draw gridlines and bars of `frame` onto a fresh `canvas`-sized surface.
///
/// Bar edges are antialiased by pixel coverage. Everything outside the plot area is clipped.
pub fn rasterize(frame: &Frame, canvas: Canvas, opts: &RasterOpts) -> FrameRGBA {
    let mut out = FrameRGBA::cleared(canvas.width, canvas.height, opts.background);
    let plot = frame.axis.plot;

    for tick in &frame.axis.ticks {
        let x = tick.x.round() - 0.5;
        let line = Rect::new(x, plot.y0, x + 1.0, plot.y1);
        fill_rect(&mut out, line, plot, opts.grid);
    }
    // Exiting bars first so bars moving into the window are drawn on top.
    let mut bars: Vec<_> = frame.bars.values().collect();
    bars.sort_by(|a, b| b.slot.total_cmp(&a.slot));
    for bar in bars {
        fill_rect(&mut out, bar.rect, plot, bar.color);
    }
    out
}

/// Rasterize many frames in parallel; output order matches input order.
pub fn rasterize_all(frames: &[Frame], canvas: Canvas, opts: &RasterOpts) -> Vec<FrameRGBA> {
    frames
        .par_iter()
        .map(|f| rasterize(f, canvas, opts))
        .collect()
}

fn fill_rect(out: &mut FrameRGBA, rect: Rect, clip: Rect, color: Rgba8) {
    let r = rect.intersect(clip);
    if !(r.width() > 0.0 && r.height() > 0.0) {
        return;
    }
    let x0 = r.x0.floor().max(0.0) as u32;
    let y0 = r.y0.floor().max(0.0) as u32;
    let x1 = (r.x1.ceil().max(0.0) as u32).min(out.width);
    let y1 = (r.y1.ceil().max(0.0) as u32).min(out.height);
    let src = color.premultiplied();

    for y in y0..y1 {
        let cy = coverage(r.y0, r.y1, f64::from(y));
        for x in x0..x1 {
            let cov = cy * coverage(r.x0, r.x1, f64::from(x));
            if cov <= 0.0 {
                continue;
            }
            let i = (y as usize * out.width as usize + x as usize) * 4;
            blend_over(&mut out.data[i..i + 4], src, cov);
        }
    }
}

/// Fraction of the pixel span `[p, p + 1)` covered by `[lo, hi)`.
fn coverage(lo: f64, hi: f64, p: f64) -> f64 {
    (hi.min(p + 1.0) - lo.max(p)).clamp(0.0, 1.0)
}

fn blend_over(dst: &mut [u8], src: [u8; 4], cov: f64) {
    let sa = f64::from(src[3]) / 255.0 * cov;
    for (d, s) in dst.iter_mut().zip(src) {
        let v = f64::from(s) * cov + f64::from(*d) * (1.0 - sa);
        *d = v.round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
