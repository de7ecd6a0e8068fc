//! Sequential color scales for the map and heatmap.

use serde::{Deserialize, Serialize};

/// Sequential 9-class ColorBrewer ramps, light to dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Reds,
    Oranges,
    Blues,
    Greens,
    Purples,
    Greys,
}

const REDS: [u32; 9] = [
    0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d,
];
const ORANGES: [u32; 9] = [
    0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704,
];
const BLUES: [u32; 9] = [
    0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b,
];
const GREENS: [u32; 9] = [
    0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b,
];
const PURPLES: [u32; 9] = [
    0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d,
];
const GREYS: [u32; 9] = [
    0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525, 0x000000,
];

impl ColorScheme {
    pub const ALL: [ColorScheme; 6] = [
        ColorScheme::Reds,
        ColorScheme::Oranges,
        ColorScheme::Blues,
        ColorScheme::Greens,
        ColorScheme::Purples,
        ColorScheme::Greys,
    ];

    fn stops(self) -> &'static [u32; 9] {
        match self {
            ColorScheme::Reds => &REDS,
            ColorScheme::Oranges => &ORANGES,
            ColorScheme::Blues => &BLUES,
            ColorScheme::Greens => &GREENS,
            ColorScheme::Purples => &PURPLES,
            ColorScheme::Greys => &GREYS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorScheme::Reds => "reds",
            ColorScheme::Oranges => "oranges",
            ColorScheme::Blues => "blues",
            ColorScheme::Greens => "greens",
            ColorScheme::Purples => "purples",
            ColorScheme::Greys => "greys",
        }
    }
}

fn unpack(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

/// Linear mapping from a value range onto a scheme.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    scheme: ColorScheme,
    min: f64,
    max: f64,
}

impl ColorScale {
    pub fn new(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self { scheme, min, max }
    }

    /// Scale over `0..=max`, the range both dashboard charts use.
    pub fn from_zero(scheme: ColorScheme, max: i64) -> Self {
        Self::new(scheme, 0.0, max as f64)
    }

    /// RGB for a value. Out-of-range values are clamped; a degenerate range
    /// maps everything to the darkest stop.
    pub fn color(&self, value: f64) -> [u8; 3] {
        let stops = self.scheme.stops();
        let last = stops.len() - 1;
        if self.max <= self.min {
            return unpack(stops[last]);
        }

        let t = (value - self.min) / (self.max - self.min);
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * last as f64;
        let idx = (pos.floor() as usize).min(last - 1);
        let frac = pos - idx as f64;

        let lo = unpack(stops[idx]);
        let hi = unpack(stops[idx + 1]);
        let mut out = [0u8; 3];
        for c in 0..3 {
            let v = lo[c] as f64 + (hi[c] as f64 - lo[c] as f64) * frac;
            out[c] = v.round() as u8;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stops() {
        let scale = ColorScale::new(ColorScheme::Reds, 0.0, 100.0);
        assert_eq!(scale.color(0.0), [0xff, 0xf5, 0xf0]);
        assert_eq!(scale.color(100.0), [0x67, 0x00, 0x0d]);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let scale = ColorScale::new(ColorScheme::Blues, 10.0, 20.0);
        assert_eq!(scale.color(-5.0), scale.color(10.0));
        assert_eq!(scale.color(99.0), scale.color(20.0));
        assert_eq!(scale.color(f64::NAN), scale.color(10.0));
    }

    #[test]
    fn midpoint_lands_on_middle_stop() {
        let scale = ColorScale::new(ColorScheme::Greys, 0.0, 8.0);
        assert_eq!(scale.color(4.0), [0x96, 0x96, 0x96]);
        // halfway between two stops
        let [r, _, _] = scale.color(0.5);
        assert_eq!(r, ((0xff + 0xf0) as f64 / 2.0).round() as u8);
    }

    #[test]
    fn zero_width_range_is_darkest() {
        let scale = ColorScale::from_zero(ColorScheme::Reds, 0);
        assert_eq!(scale.color(0.0), [0x67, 0x00, 0x0d]);
    }

    #[test]
    fn scheme_names_round_trip_through_serde() {
        for scheme in ColorScheme::ALL {
            let json = serde_json::to_string(&scheme).unwrap();
            assert_eq!(json, format!("\"{}\"", scheme.label()));
            let back: ColorScheme = serde_json::from_str(&json).unwrap();
            assert_eq!(back, scheme);
        }
    }
}
