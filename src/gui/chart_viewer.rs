//! Chart Viewer Widget
//! Central panel: map and heatmap side by side, year ranking underneath.

use crate::charts::{ChartPlotter, HeatmapGrid};
use crate::config::Theme;
use crate::data::FatalityTable;
use egui::{RichText, ScrollArea};

const CHART_HEIGHT: f32 = 380.0;

/// Holds the aggregated table and the heatmap matrix derived from it.
#[derive(Default)]
pub struct ChartViewer {
    pub table: Option<FatalityTable>,
    heatmap: Option<HeatmapGrid>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.table = None;
        self.heatmap = None;
    }

    pub fn set_table(&mut self, table: FatalityTable) {
        self.heatmap = Some(HeatmapGrid::from_table(&table));
        self.table = Some(table);
    }

    pub fn show(&self, ui: &mut egui::Ui, year: Option<i32>, theme: &Theme) {
        let (Some(table), Some(heatmap), Some(year)) = (&self.table, &self.heatmap, year) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.columns(2, |columns| {
                    columns[0].label(
                        RichText::new("Fatalities by State and Year")
                            .size(18.0)
                            .strong()
                            .color(theme.accent.to_egui()),
                    );
                    columns[0].label(
                        RichText::new(format!(
                            "{year}: {} fatalities across {} states",
                            table.total_for_year(year),
                            table.for_year(year).len()
                        ))
                        .size(12.0),
                    );
                    ChartPlotter::draw_tile_map(&mut columns[0], table, year, theme, CHART_HEIGHT);

                    columns[1].label(
                        RichText::new("Fatalities Heatmap")
                            .size(18.0)
                            .strong()
                            .color(theme.accent.to_egui()),
                    );
                    columns[1].label(RichText::new("All years").size(12.0));
                    ChartPlotter::draw_heatmap(&mut columns[1], heatmap, theme, CHART_HEIGHT);
                });

                ui.add_space(15.0);
                ui.label(
                    RichText::new(format!("States ranked by fatalities, {year}"))
                        .size(16.0)
                        .strong()
                        .color(theme.accent.to_egui()),
                );
                ChartPlotter::draw_ranking_chart(ui, table, year, theme);
            });
    }
}
