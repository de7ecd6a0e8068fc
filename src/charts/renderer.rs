//! Static Chart Renderer
//! Writes the dashboard's two views as PNG files with plotters.
//!
//! Layout, shared by both images:
//! 1. Title centered at the top in the theme accent color
//! 2. Chart body on a uniform grid (tile map or year x state heatmap)
//! 3. Color legend strip along the bottom, 0 to the max value

use crate::charts::heatmap::HeatmapGrid;
use crate::charts::layout::{CellRect, GridLayout};
use crate::charts::scale::ColorScale;
use crate::charts::tile_map::{self, GRID_COLS, GRID_ROWS};
use crate::config::Theme;
use crate::data::FatalityTable;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const FONT: &str = "sans-serif";
const TITLE_H: f32 = 60.0;
const LEGEND_H: f32 = 50.0;
const MARGIN: f32 = 20.0;
const LEGEND_STEPS: usize = 40;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("No data for year {0}")]
    NoDataForYear(i32),
    #[error("Nothing to render")]
    Empty,
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the year x state heatmap over the whole table.
    pub fn render_heatmap(
        table: &FatalityTable,
        theme: &Theme,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let grid = HeatmapGrid::from_table(table);
        if grid.is_empty() {
            return Err(RenderError::Empty);
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&theme.background.to_plotters())?;
        Self::draw_title(&root, "Fatalities Heatmap", theme, size.0)?;

        // Room on the left for year labels, below for state labels
        let label_w = 60.0;
        let label_h = 24.0;
        let layout = GridLayout::fit(
            MARGIN + label_w,
            TITLE_H,
            size.0 as f32 - 2.0 * MARGIN - label_w,
            size.1 as f32 - TITLE_H - LEGEND_H - label_h - MARGIN,
            grid.cols(),
            grid.rows(),
        );

        let scale = ColorScale::from_zero(theme.color_scheme, grid.max());
        let stroke = theme.stroke.to_plotters();
        for (col, row, value) in grid.filled() {
            let rect = layout.cell_rect(col, row);
            Self::fill_rect(&root, rect, scale.color(value as f64))?;
            root.draw(&Rectangle::new(Self::corners(rect), stroke.stroke_width(1)))?;
        }

        let text = theme.text.to_plotters();
        let label_style = TextStyle::from((FONT, 12).into_font())
            .color(&text)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for (col, state) in grid.states.iter().enumerate() {
            let (x, _) = layout.cell_center(col, 0);
            let y = layout.top + layout.height() + label_h / 2.0;
            root.draw(&Text::new(state.as_str(), (x as i32, y as i32), label_style.clone()))?;
        }
        let year_style = label_style.pos(Pos::new(HPos::Right, VPos::Center));
        for (row, year) in grid.years.iter().enumerate() {
            let (_, y) = layout.cell_center(0, row);
            let x = layout.left - 8.0;
            root.draw(&Text::new(year.to_string(), (x as i32, y as i32), year_style.clone()))?;
        }

        Self::draw_legend(&root, &scale, grid.max(), theme, size)?;
        root.present()?;
        info!(path = %path.display(), cells = grid.filled().count(), "rendered heatmap");
        Ok(())
    }

    /// Render the single-year tile map.
    pub fn render_tile_map(
        table: &FatalityTable,
        year: i32,
        theme: &Theme,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let rows = table.for_year(year);
        if rows.is_empty() {
            return Err(RenderError::NoDataForYear(year));
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&theme.background.to_plotters())?;
        Self::draw_title(
            &root,
            &format!("Fatalities by State, {year}"),
            theme,
            size.0,
        )?;

        let layout = GridLayout::fit(
            MARGIN,
            TITLE_H,
            size.0 as f32 - 2.0 * MARGIN,
            size.1 as f32 - TITLE_H - LEGEND_H - MARGIN,
            GRID_COLS as usize,
            GRID_ROWS as usize,
        )
        .squared()
        .with_gap(2.0);

        let max = table.max_for_year(year);
        let scale = ColorScale::from_zero(theme.color_scheme, max);
        let stroke = theme.stroke.to_plotters();
        let code_size = (layout.cell_h * 0.3).max(8.0) as u32;

        for (code, col, row) in tile_map::tiles() {
            let rect = layout.cell_rect(col as usize, row as usize);
            let value = table.get(year, code);
            match value {
                Some(v) => Self::fill_rect(&root, rect, scale.color(v as f64))?,
                None => Self::fill_rect(&root, rect, theme.empty.0)?,
            }
            root.draw(&Rectangle::new(Self::corners(rect), stroke.stroke_width(1)))?;

            let (cx, cy) = layout.cell_center(col as usize, row as usize);
            let ink = Self::ink_for(value.map(|v| scale.color(v as f64)), theme);
            let style = TextStyle::from((FONT, code_size).into_font())
                .color(&ink)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(code, (cx as i32, cy as i32), style))?;
        }

        Self::draw_legend(&root, &scale, max, theme, size)?;
        root.present()?;
        info!(path = %path.display(), year, states = rows.len(), "rendered tile map");
        Ok(())
    }

    fn draw_title(root: &Area, title: &str, theme: &Theme, width: u32) -> Result<(), RenderError> {
        let accent = theme.accent.to_plotters();
        let style = TextStyle::from((FONT, 26).into_font().style(FontStyle::Bold))
            .color(&accent)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            title,
            ((width / 2) as i32, (TITLE_H / 2.0) as i32),
            style,
        ))?;
        Ok(())
    }

    /// Horizontal gradient strip with "0" and max labels.
    fn draw_legend(
        root: &Area,
        scale: &ColorScale,
        max: i64,
        theme: &Theme,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let strip_w = (size.0 as f32 * 0.4).max(100.0);
        let left = (size.0 as f32 - strip_w) / 2.0;
        let top = size.1 as f32 - MARGIN - LEGEND_H / 2.0;
        let strip = GridLayout::fit(left, top, strip_w, 12.0, LEGEND_STEPS, 1);

        for step in 0..LEGEND_STEPS {
            let value = max as f64 * step as f64 / (LEGEND_STEPS - 1) as f64;
            Self::fill_rect(root, strip.cell_rect(step, 0), scale.color(value))?;
        }

        let text = theme.text.to_plotters();
        let style = TextStyle::from((FONT, 12).into_font()).color(&text);
        let y = (top + 6.0) as i32;
        root.draw(&Text::new(
            "0",
            ((left - 8.0) as i32, y),
            style.pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
        root.draw(&Text::new(
            format!("{max} fatalities"),
            ((left + strip_w + 8.0) as i32, y),
            style.pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
        Ok(())
    }

    fn fill_rect(root: &Area, rect: CellRect, rgb: [u8; 3]) -> Result<(), RenderError> {
        let [r, g, b] = rgb;
        root.draw(&Rectangle::new(Self::corners(rect), RGBColor(r, g, b).filled()))?;
        Ok(())
    }

    fn corners((x0, y0, x1, y1): CellRect) -> [(i32, i32); 2] {
        [
            (x0.round() as i32, y0.round() as i32),
            (x1.round() as i32, y1.round() as i32),
        ]
    }

    /// Dark text on light fills, theme text otherwise.
    fn ink_for(fill: Option<[u8; 3]>, theme: &Theme) -> RGBColor {
        match fill {
            Some([r, g, b]) if luminance(r, g, b) > 0.6 => RGBColor(0, 0, 0),
            _ => theme.text.to_plotters(),
        }
    }
}

/// Relative luminance in 0..=1 (Rec. 601 weights).
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}
