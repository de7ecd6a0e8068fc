//! Theme configuration.
//! One explicit value, loaded once at startup and handed to every renderer.

use crate::charts::ColorScheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid theme file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An RGB color written as `#rrggbb` in theme files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn to_egui(self) -> egui::Color32 {
        let [r, g, b] = self.0;
        egui::Color32::from_rgb(r, g, b)
    }

    pub fn to_plotters(self) -> plotters::style::RGBColor {
        let [r, g, b] = self.0;
        plotters::style::RGBColor(r, g, b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected #rrggbb, got {value:?}"));
        }
        let raw = u32::from_str_radix(hex, 16).map_err(|e| format!("{value:?}: {e}"))?;
        Ok(Self([(raw >> 16) as u8, (raw >> 8) as u8, raw as u8]))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Page and chart styling. Fields missing from a theme file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub title: String,
    pub background: HexColor,
    pub text: HexColor,
    /// Header color.
    pub accent: HexColor,
    /// Outline drawn around heatmap cells and map tiles.
    pub stroke: HexColor,
    /// Fill for map tiles with no data in the selected year.
    pub empty: HexColor,
    pub color_scheme: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "US Gun Fatalities Dashboard".to_string(),
            background: HexColor::rgb(0x1a, 0x1a, 0x1a),
            text: HexColor::rgb(0xff, 0xff, 0xff),
            accent: HexColor::rgb(0xcc, 0x55, 0x55),
            stroke: HexColor::rgb(0x00, 0x00, 0x00),
            empty: HexColor::rgb(0x33, 0x33, 0x33),
            color_scheme: ColorScheme::Reds,
        }
    }
}

impl Theme {
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
