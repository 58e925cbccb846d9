use plotters::style::RGBColor;

use crate::error::{ChartError, Result};

/// Default categorical cycle (matplotlib's tab10).
pub const CATEGORY10: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Look up a matplotlib-style color name, a `C0`..`C9` cycle reference,
/// or a `#rrggbb` hex string.
pub fn named_color(name: &str) -> Option<RGBColor> {
    let color = match name.trim() {
        "blue" | "b" => RGBColor(0, 0, 255),
        "red" | "r" => RGBColor(255, 0, 0),
        "green" | "g" => RGBColor(0, 128, 0),
        "black" | "k" => RGBColor(0, 0, 0),
        "white" | "w" => RGBColor(255, 255, 255),
        "yellow" => RGBColor(255, 255, 0),
        "y" => RGBColor(191, 191, 0),
        "cyan" => RGBColor(0, 255, 255),
        "c" => RGBColor(0, 191, 191),
        "magenta" => RGBColor(255, 0, 255),
        "m" => RGBColor(191, 0, 191),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "gray" | "grey" => RGBColor(128, 128, 128),
        "brown" => RGBColor(165, 42, 42),
        "pink" => RGBColor(255, 192, 203),
        other => {
            if let Some(idx) = other.strip_prefix('C') {
                let idx: usize = idx.parse().ok()?;
                return CATEGORY10.get(idx).copied();
            }
            return parse_hex(other);
        }
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGBColor(r, g, b))
}

/// Parse a request color, rejecting unknown names.
pub fn parse_color(field: &str, value: &str) -> Result<RGBColor> {
    named_color(value).ok_or_else(|| {
        ChartError::InvalidParameter(format!("field '{}': unknown color '{}'", field, value))
    })
}

/// A continuous colormap given as evenly spaced stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colormap {
    name: &'static str,
    stops: &'static [RGBColor],
}

const VIRIDIS: &[RGBColor] = &[
    RGBColor(0x44, 0x01, 0x54),
    RGBColor(0x48, 0x28, 0x78),
    RGBColor(0x3e, 0x49, 0x89),
    RGBColor(0x31, 0x68, 0x8e),
    RGBColor(0x26, 0x82, 0x8e),
    RGBColor(0x1f, 0x9e, 0x89),
    RGBColor(0x35, 0xb7, 0x79),
    RGBColor(0x6e, 0xce, 0x58),
    RGBColor(0xb5, 0xde, 0x2b),
    RGBColor(0xfd, 0xe7, 0x25),
];

const PLASMA: &[RGBColor] = &[
    RGBColor(0x0d, 0x08, 0x87),
    RGBColor(0x46, 0x03, 0x9f),
    RGBColor(0x72, 0x01, 0xa8),
    RGBColor(0x9c, 0x17, 0x9e),
    RGBColor(0xbd, 0x37, 0x86),
    RGBColor(0xd8, 0x57, 0x6b),
    RGBColor(0xed, 0x79, 0x53),
    RGBColor(0xfb, 0x9f, 0x3a),
    RGBColor(0xfd, 0xca, 0x26),
    RGBColor(0xf0, 0xf9, 0x21),
];

const INFERNO: &[RGBColor] = &[
    RGBColor(0x00, 0x00, 0x04),
    RGBColor(0x1b, 0x0c, 0x41),
    RGBColor(0x4a, 0x0c, 0x6b),
    RGBColor(0x78, 0x1c, 0x6d),
    RGBColor(0xa5, 0x2c, 0x60),
    RGBColor(0xcf, 0x44, 0x46),
    RGBColor(0xed, 0x69, 0x25),
    RGBColor(0xfb, 0x9b, 0x06),
    RGBColor(0xf7, 0xd1, 0x3d),
    RGBColor(0xfc, 0xff, 0xa4),
];

const MAGMA: &[RGBColor] = &[
    RGBColor(0x00, 0x00, 0x04),
    RGBColor(0x18, 0x0f, 0x3d),
    RGBColor(0x44, 0x0f, 0x76),
    RGBColor(0x72, 0x1f, 0x81),
    RGBColor(0x9e, 0x2f, 0x7f),
    RGBColor(0xcd, 0x40, 0x71),
    RGBColor(0xf1, 0x60, 0x5d),
    RGBColor(0xfd, 0x96, 0x68),
    RGBColor(0xfe, 0xca, 0x8d),
    RGBColor(0xfc, 0xfd, 0xbf),
];

const CIVIDIS: &[RGBColor] = &[
    RGBColor(0x00, 0x22, 0x4e),
    RGBColor(0x12, 0x35, 0x70),
    RGBColor(0x3b, 0x49, 0x6c),
    RGBColor(0x57, 0x5d, 0x6d),
    RGBColor(0x70, 0x71, 0x73),
    RGBColor(0x8a, 0x86, 0x78),
    RGBColor(0xa5, 0x9c, 0x74),
    RGBColor(0xc3, 0xb3, 0x69),
    RGBColor(0xe1, 0xcc, 0x55),
    RGBColor(0xfe, 0xe8, 0x38),
];

const COOLWARM: &[RGBColor] = &[
    RGBColor(0x3b, 0x4c, 0xc0),
    RGBColor(0x62, 0x82, 0xea),
    RGBColor(0x8d, 0xb0, 0xfe),
    RGBColor(0xb8, 0xd0, 0xf9),
    RGBColor(0xdd, 0xdd, 0xdd),
    RGBColor(0xf5, 0xc4, 0xad),
    RGBColor(0xf4, 0x9a, 0x7b),
    RGBColor(0xde, 0x60, 0x4d),
    RGBColor(0xb4, 0x04, 0x26),
];

const BLUES: &[RGBColor] = &[
    RGBColor(0xf7, 0xfb, 0xff),
    RGBColor(0xde, 0xeb, 0xf7),
    RGBColor(0xc6, 0xdb, 0xef),
    RGBColor(0x9e, 0xca, 0xe1),
    RGBColor(0x6b, 0xae, 0xd6),
    RGBColor(0x42, 0x92, 0xc6),
    RGBColor(0x21, 0x71, 0xb5),
    RGBColor(0x08, 0x51, 0x9c),
    RGBColor(0x08, 0x30, 0x6b),
];

const REDS: &[RGBColor] = &[
    RGBColor(0xff, 0xf5, 0xf0),
    RGBColor(0xfe, 0xe0, 0xd2),
    RGBColor(0xfc, 0xbb, 0xa1),
    RGBColor(0xfc, 0x92, 0x72),
    RGBColor(0xfb, 0x6a, 0x4a),
    RGBColor(0xef, 0x3b, 0x2c),
    RGBColor(0xcb, 0x18, 0x1d),
    RGBColor(0xa5, 0x0f, 0x15),
    RGBColor(0x67, 0x00, 0x0d),
];

const GREENS: &[RGBColor] = &[
    RGBColor(0xf7, 0xfc, 0xf5),
    RGBColor(0xe5, 0xf5, 0xe0),
    RGBColor(0xc7, 0xe9, 0xc0),
    RGBColor(0xa1, 0xd9, 0x9b),
    RGBColor(0x74, 0xc4, 0x76),
    RGBColor(0x41, 0xab, 0x5d),
    RGBColor(0x23, 0x8b, 0x45),
    RGBColor(0x00, 0x6d, 0x2c),
    RGBColor(0x00, 0x44, 0x1b),
];

const GRAY: &[RGBColor] = &[RGBColor(0, 0, 0), RGBColor(255, 255, 255)];

const COLORMAPS: &[(&str, &[RGBColor])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("coolwarm", COOLWARM),
    ("Blues", BLUES),
    ("Reds", REDS),
    ("Greens", GREENS),
    ("gray", GRAY),
];

impl Colormap {
    pub fn by_name(name: &str) -> Option<Self> {
        let name = if name == "grey" { "gray" } else { name };
        COLORMAPS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(name, stops)| Self { name, stops })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Color at `t` in [0, 1]; values outside are clamped.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let lo = (pos.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let w = pos - lo as f64;
        let (a, b) = (self.stops[lo], self.stops[hi]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * w).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// `n` colors spread over the map, skipping both extremes.
    pub fn sample_n(&self, n: usize) -> Vec<RGBColor> {
        (0..n)
            .map(|i| self.sample((i + 1) as f64 / (n + 1) as f64))
            .collect()
    }
}

/// Fill colors for per-column distribution charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Palette {
    Map(Colormap),
    Single(RGBColor),
}

impl Palette {
    /// Accept a colormap name or any single color.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        if let Some(map) = Colormap::by_name(value) {
            return Ok(Palette::Map(map));
        }
        named_color(value).map(Palette::Single).ok_or_else(|| {
            ChartError::InvalidParameter(format!(
                "field '{}': unknown palette or color '{}'",
                field, value
            ))
        })
    }

    pub fn colors(&self, n: usize) -> Vec<RGBColor> {
        match self {
            Palette::Map(map) => map.sample_n(n),
            Palette::Single(color) => vec![*color; n],
        }
    }
}

/// Relative luminance, used to pick readable annotation text.
pub fn is_dark(color: RGBColor) -> bool {
    let lum = 0.2126 * color.0 as f64 + 0.7152 * color.1 as f64 + 0.0722 * color.2 as f64;
    lum < 128.0
}
