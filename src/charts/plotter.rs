//! Chart Plotter Module
//! Draws the interactive dashboard charts with egui and egui_plot.

use crate::charts::heatmap::HeatmapGrid;
use crate::charts::layout::{CellRect, GridLayout};
use crate::charts::renderer::luminance;
use crate::charts::scale::ColorScale;
use crate::charts::tile_map::{tile_at, tiles, GRID_COLS, GRID_ROWS};
use crate::config::Theme;
use crate::data::{state_name, FatalityTable};
use egui::{pos2, vec2, Align2, Color32, FontId, Painter, Rect, Sense, Stroke};
use egui_plot::{Bar, BarChart, Plot};

const LEGEND_H: f32 = 28.0;
const LEGEND_STEPS: usize = 30;

fn to_color32([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn to_rect((x0, y0, x1, y1): CellRect) -> Rect {
    Rect::from_min_max(pos2(x0, y0), pos2(x1, y1))
}

fn hover_label(code: &str, year: i32, value: Option<i64>) -> String {
    let name = state_name(code).unwrap_or(code);
    match value {
        Some(v) => format!("{name} ({code})\n{year}: {v} fatalities"),
        None => format!("{name} ({code})\n{year}: no recorded incidents"),
    }
}

/// Creates the dashboard visualizations.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Tile map of one year, colored over `0..=max` of that year.
    pub fn draw_tile_map(
        ui: &mut egui::Ui,
        table: &FatalityTable,
        year: i32,
        theme: &Theme,
        height: f32,
    ) {
        let (rect, response) =
            ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
        let painter = ui.painter_at(rect);

        let layout = GridLayout::fit(
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height() - LEGEND_H,
            GRID_COLS as usize,
            GRID_ROWS as usize,
        )
        .squared()
        .with_gap(2.0);

        let max = table.max_for_year(year);
        let scale = ColorScale::from_zero(theme.color_scheme, max);
        let stroke = Stroke::new(1.0, theme.stroke.to_egui());
        let font = FontId::proportional((layout.cell_h * 0.3).clamp(8.0, 16.0));

        for (code, col, row) in tiles() {
            let cell = to_rect(layout.cell_rect(col as usize, row as usize));
            let fill = table.get(year, code).map(|v| scale.color(v as f64));
            painter.rect_filled(
                cell,
                3.0,
                fill.map(to_color32).unwrap_or(theme.empty.to_egui()),
            );
            painter.rect_stroke(cell, 3.0, stroke);

            let ink = match fill {
                Some([r, g, b]) if luminance(r, g, b) > 0.6 => Color32::BLACK,
                _ => theme.text.to_egui(),
            };
            painter.text(cell.center(), Align2::CENTER_CENTER, code, font.clone(), ink);
        }

        Self::draw_legend(&painter, rect, &scale, max, theme);

        let hovered = response
            .hover_pos()
            .and_then(|pos| layout.cell_at(pos.x, pos.y))
            .and_then(|(col, row)| tile_at(col as u8, row as u8));
        if let Some(code) = hovered {
            response.on_hover_text_at_pointer(hover_label(code, year, table.get(year, code)));
        }
    }

    /// Year x state heatmap over the whole table.
    pub fn draw_heatmap(ui: &mut egui::Ui, grid: &HeatmapGrid, theme: &Theme, height: f32) {
        let (rect, response) =
            ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
        if grid.is_empty() {
            return;
        }
        let painter = ui.painter_at(rect);

        let label_w = 40.0;
        let label_h = 18.0;
        let layout = GridLayout::fit(
            rect.left() + label_w,
            rect.top(),
            rect.width() - label_w,
            rect.height() - label_h - LEGEND_H,
            grid.cols(),
            grid.rows(),
        );

        let scale = ColorScale::from_zero(theme.color_scheme, grid.max());
        let stroke = Stroke::new(0.25, theme.stroke.to_egui());
        for (col, row, value) in grid.filled() {
            let cell = to_rect(layout.cell_rect(col, row));
            painter.rect_filled(cell, 0.0, to_color32(scale.color(value as f64)));
            painter.rect_stroke(cell, 0.0, stroke);
        }

        let text = theme.text.to_egui();
        let label_font = FontId::proportional(layout.cell_w.clamp(6.0, 11.0));
        for (col, state) in grid.states.iter().enumerate() {
            let (x, _) = layout.cell_center(col, 0);
            let y = layout.top + layout.height() + label_h / 2.0;
            painter.text(pos2(x, y), Align2::CENTER_CENTER, state, label_font.clone(), text);
        }
        let year_font = FontId::proportional(layout.cell_h.clamp(6.0, 12.0));
        for (row, year) in grid.years.iter().enumerate() {
            let (_, y) = layout.cell_center(0, row);
            painter.text(
                pos2(layout.left - 6.0, y),
                Align2::RIGHT_CENTER,
                year.to_string(),
                year_font.clone(),
                text,
            );
        }

        Self::draw_legend(&painter, rect, &scale, grid.max(), theme);

        let hovered = response
            .hover_pos()
            .and_then(|pos| layout.cell_at(pos.x, pos.y));
        if let Some((col, row)) = hovered {
            let label = hover_label(&grid.states[col], grid.years[row], grid.value(col, row));
            response.on_hover_text_at_pointer(label);
        }
    }

    /// Bar chart of one year's states, highest first.
    pub fn draw_ranking_chart(ui: &mut egui::Ui, table: &FatalityTable, year: i32, theme: &Theme) {
        let ranked = table.ranked_for_year(year);
        let scale = ColorScale::from_zero(theme.color_scheme, table.max_for_year(year));
        let labels: Vec<String> = ranked.iter().map(|r| r.state_code.clone()).collect();

        let bars: Vec<Bar> = ranked
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.fatalities as f64)
                    .name(&row.state_code)
                    .width(0.7)
                    .fill(to_color32(scale.color(row.fatalities as f64)))
            })
            .collect();

        Plot::new(format!("ranking_{year}"))
            .height(200.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid([false, true])
            .y_axis_label("Fatalities")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(theme.accent.to_egui()));
            });
    }

    fn draw_legend(painter: &Painter, rect: Rect, scale: &ColorScale, max: i64, theme: &Theme) {
        let strip_w = (rect.width() * 0.5).max(60.0);
        let left = rect.center().x - strip_w / 2.0;
        let top = rect.bottom() - LEGEND_H + 8.0;
        let strip = GridLayout::fit(left, top, strip_w, 10.0, LEGEND_STEPS, 1);

        for step in 0..LEGEND_STEPS {
            let value = max as f64 * step as f64 / (LEGEND_STEPS - 1) as f64;
            let cell = to_rect(strip.cell_rect(step, 0));
            painter.rect_filled(cell, 0.0, to_color32(scale.color(value)));
        }

        let font = FontId::proportional(11.0);
        let text = theme.text.to_egui();
        painter.text(pos2(left - 6.0, top + 5.0), Align2::RIGHT_CENTER, "0", font.clone(), text);
        painter.text(
            pos2(left + strip_w + 6.0, top + 5.0),
            Align2::LEFT_CENTER,
            max.to_string(),
            font,
            text,
        );
    }
}
