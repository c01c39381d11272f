use crate::foundation::core::Rgba8;

/// Pixels of one rasterized chart frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Pixels per row.
    pub width: u32,
    /// Row count.
    pub height: u32,
    /// Four bytes per pixel, rows top to bottom with no padding.
    pub data: Vec<u8>,
    /// Color bytes are already scaled by alpha; always true for
    /// [`rasterize`](super::cpu::rasterize) output.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Frame filled with `clear`.
    pub fn cleared(width: u32, height: u32, clear: Rgba8) -> Self {
        let data = clear
            .premultiplied()
            .repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}
