//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::Theme;
use crate::data::{self, LoadedData};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info};

/// Image size for PNG export.
pub const EXPORT_SIZE: (u32, u32) = (1400, 900);

/// CSV loading result from background thread
enum LoadResult {
    Complete(Box<LoadedData>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    theme: Theme,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, theme: Theme, csv: Option<PathBuf>) -> Self {
        Self::apply_theme(&cc.egui_ctx, &theme);

        let mut app = Self {
            theme,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        if let Some(path) = csv {
            app.start_loading(path);
        }
        app
    }

    fn apply_theme(ctx: &egui::Context, theme: &Theme) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = theme.background.to_egui();
        visuals.window_fill = theme.background.to_egui();
        visuals.override_text_color = Some(theme.text.to_egui());
        ctx.set_visuals(visuals);
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Run the whole load-clean-aggregate pipeline on a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;
        self.control_panel.is_busy = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match data::load_and_aggregate(&path) {
                Ok(loaded) => LoadResult::Complete(Box::new(loaded)),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(loaded)) => {
                let LoadedData { table, report } = *loaded;
                info!(rows = table.len(), "dashboard data ready");
                self.control_panel.update_years(table.years());
                self.control_panel.set_status(format!(
                    "Loaded {} incidents, {} state-year totals",
                    report.rows_read,
                    table.len()
                ));
                self.control_panel.report = Some(report);
                self.chart_viewer.set_table(table);
                self.finish_loading();
            }
            Ok(LoadResult::Error(e)) => {
                error!(error = %e, "failed to load data");
                self.control_panel.set_status(format!("Error: {e}"));
                self.finish_loading();
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader stopped unexpectedly");
                self.finish_loading();
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.is_busy = false;
    }

    /// Write heatmap.png and map_<year>.png into a chosen folder.
    fn handle_export_png(&mut self) {
        let (Some(table), Some(year)) =
            (&self.chart_viewer.table, self.control_panel.selected_year)
        else {
            self.control_panel.set_status("No charts to export");
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        let status = match export_pngs(table, year, &self.theme, &dir) {
            Ok(()) => format!("Exported charts to {}", dir.display()),
            Err(e) => {
                error!(error = %e, "export failed");
                format!("Error: {e}")
            }
        };
        self.control_panel.set_status(status);
    }
}

fn export_pngs(
    table: &data::FatalityTable,
    year: i32,
    theme: &Theme,
    dir: &Path,
) -> Result<(), crate::charts::RenderError> {
    StaticChartRenderer::render_heatmap(table, theme, &dir.join("heatmap.png"), EXPORT_SIZE)?;
    StaticChartRenderer::render_tile_map(
        table,
        year,
        theme,
        &dir.join(format!("map_{year}.png")),
        EXPORT_SIZE,
    )
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, &self.theme) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::SchemeChanged(scheme) => {
                            info!(scheme = scheme.label(), "color scheme changed");
                            self.theme.color_scheme = scheme;
                        }
                        // the chart viewer reads the selection every frame
                        ControlPanelAction::YearChanged | ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer
                .show(ui, self.control_panel.selected_year, &self.theme);
        });
    }
}
