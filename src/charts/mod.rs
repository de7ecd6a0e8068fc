//! Charts module - Chart rendering

mod heatmap;
mod layout;
mod plotter;
mod renderer;
mod scale;
mod tile_map;

pub use heatmap::HeatmapGrid;
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use scale::ColorScheme;
