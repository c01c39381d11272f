use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::foundation::core::Rgba8;

/// Color as written in dataset or config JSON, normalized to `0..=1` channels.
///
/// Accepted forms: `"#rgb"`, `"#rrggbb"`, `"#rrggbbaa"`, `{r,g,b[,a]}`, `{h,s,l[,a]}` with hue in
/// degrees, and `[r,g,b]` / `[r,g,b,a]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub struct ColorDef {
    pub(crate) r: f64,
    pub(crate) g: f64,
    pub(crate) b: f64,
    pub(crate) a: f64,
}

impl ColorDef {
    pub(crate) fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize to straight-alpha RGBA8.
    pub fn to_rgba8(self) -> Rgba8 {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8 {
            r: q(self.r),
            g: q(self.g),
            b: q(self.b),
            a: q(self.a),
        }
    }
}

impl From<Rgba8> for ColorDef {
    fn from(c: Rgba8) -> Self {
        let [r, g, b, a] = [c.r, c.g, c.b, c.a].map(|v| f64::from(v) / 255.0);
        Self { r, g, b, a }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Text(String),
    Rgb {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default = "opaque")]
        a: f64,
    },
    Hsl {
        h: f64,
        s: f64,
        l: f64,
        #[serde(default = "opaque")]
        a: f64,
    },
    Channels(Vec<f64>),
}

fn opaque() -> f64 {
    1.0
}

impl TryFrom<ColorSpec> for ColorDef {
    type Error = String;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Text(text) => parse_hex(&text),
            ColorSpec::Rgb { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            ColorSpec::Hsl { h, s, l, a } => Ok(from_hsl(h, s, l, a)),
            ColorSpec::Channels(v) => match *v.as_slice() {
                [r, g, b] => Ok(Self::rgba(r, g, b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
                _ => Err(format!(
                    "color array needs 3 or 4 channels, got {}",
                    v.len()
                )),
            },
        }
    }
}

pub(crate) fn parse_hex(text: &str) -> Result<ColorDef, String> {
    let digits = text.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let bad = || format!("invalid hex color {text:?} (want #RGB, #RRGGBB or #RRGGBBAA)");

    let nibbles = digits
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(bad)?;
    let bytes: Vec<u8> = match nibbles.len() {
        3 => nibbles.iter().map(|n| n * 17).collect(),
        6 | 8 => nibbles.chunks(2).map(|p| (p[0] << 4) | p[1]).collect(),
        _ => return Err(bad()),
    };

    Ok(Rgba8 {
        r: bytes[0],
        g: bytes[1],
        b: bytes[2],
        a: bytes.get(3).copied().unwrap_or(u8::MAX),
    }
    .into())
}

/// HSL to RGB through chroma and hue sector; hue wraps, `s` and `l` clamp to `[0, 1]`.
fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> ColorDef {
    let sector = h.rem_euclid(360.0) / 60.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    ColorDef::rgba(r + m, g + m, b + m, a)
}

/// Colors handed out to categories that do not declare one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8>,
}

/// Tableau 10.
const DEFAULT_PALETTE: [Rgba8; 10] = [
    Rgba8::rgb(0x4e, 0x79, 0xa7),
    Rgba8::rgb(0xf2, 0x8e, 0x2c),
    Rgba8::rgb(0xe1, 0x57, 0x59),
    Rgba8::rgb(0x76, 0xb7, 0xb2),
    Rgba8::rgb(0x59, 0xa1, 0x4f),
    Rgba8::rgb(0xed, 0xc9, 0x49),
    Rgba8::rgb(0xaf, 0x7a, 0xa1),
    Rgba8::rgb(0xff, 0x9d, 0xa7),
    Rgba8::rgb(0x9c, 0x75, 0x5f),
    Rgba8::rgb(0xba, 0xb0, 0xab),
];

impl Palette {
    /// Palette from explicit colors; an empty list falls back to the default palette.
    pub fn new(colors: Vec<Rgba8>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    /// Color for `id`, chosen by a stable hash so the same id always gets the same entry.
    pub fn pick(&self, id: &str) -> Rgba8 {
        let idx = (xxh3_64(id.as_bytes()) % self.colors.len() as u64) as usize;
        self.colors[idx]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/color.rs"]
mod tests;
