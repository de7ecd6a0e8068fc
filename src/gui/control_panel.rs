//! Control Panel Widget
//! Sidebar with data source, year and color selection, data quality and export.

use crate::charts::ColorScheme;
use crate::config::Theme;
use crate::data::DerivationReport;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Sidebar state.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    /// Years present in the aggregated table, newest first.
    pub years: Vec<i32>,
    pub selected_year: Option<i32>,
    pub report: Option<DerivationReport>,
    pub status: String,
    pub is_busy: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            years: Vec::new(),
            selected_year: None,
            report: None,
            status: "Ready".to_string(),
            is_busy: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the year list after a load, selecting the newest year.
    pub fn update_years(&mut self, years: Vec<i32>) {
        self.selected_year = match self.selected_year {
            Some(y) if years.contains(&y) => Some(y),
            _ => years.first().copied(),
        };
        self.years = years;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new(&theme.title).size(20.0).strong().color(theme.accent.to_egui()));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.is_busy, |ui| {
                            if ui.button("Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year =====
        ui.label(RichText::new("Select a year").size(14.0).strong());
        ui.add_space(5.0);

        let selected_text = self
            .selected_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        ComboBox::from_id_salt("selected_year")
            .width(150.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for &year in &self.years {
                    if ui
                        .selectable_label(self.selected_year == Some(year), year.to_string())
                        .clicked()
                        && self.selected_year != Some(year)
                    {
                        self.selected_year = Some(year);
                        action = ControlPanelAction::YearChanged;
                    }
                }
            });

        ui.add_space(10.0);

        // ===== Color Scheme =====
        ui.label(RichText::new("Color scheme").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("color_scheme")
            .width(150.0)
            .selected_text(theme.color_scheme.label())
            .show_ui(ui, |ui| {
                for scheme in ColorScheme::ALL {
                    if ui
                        .selectable_label(theme.color_scheme == scheme, scheme.label())
                        .clicked()
                        && theme.color_scheme != scheme
                    {
                        action = ControlPanelAction::SchemeChanged(scheme);
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Quality =====
        if let Some(report) = &self.report {
            ui.label(RichText::new("Data Quality").size(14.0).strong());
            ui.add_space(5.0);
            egui::Grid::new("data_quality")
                .striped(true)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Rows read");
                    ui.label(report.rows_read.to_string());
                    ui.end_row();
                    ui.label("Counted");
                    ui.label(report.records_kept.to_string());
                    ui.end_row();
                    ui.label("Unusable rows");
                    ui.label(report.rows_skipped.to_string());
                    ui.end_row();
                    ui.label("No state in location");
                    ui.label(report.malformed_locations.to_string());
                    ui.end_row();
                    ui.label("Unknown state");
                    ui.label(report.unmapped_total().to_string());
                    ui.end_row();
                });
            if !report.unmapped_states.is_empty() {
                ui.collapsing("Unknown state tokens", |ui| {
                    for (token, count) in &report.unmapped_states {
                        ui.label(format!("{token:?} x{count}"));
                    }
                });
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Export =====
        ui.vertical_centered(|ui| {
            let enabled = !self.is_busy && self.selected_year.is_some();
            ui.add_enabled_ui(enabled, |ui| {
                let button = egui::Button::new(RichText::new("Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        if self.is_busy {
            ui.spinner();
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    YearChanged,
    SchemeChanged(ColorScheme),
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_year_selected_after_load() {
        let mut panel = ControlPanel::new();
        panel.update_years(vec![2018, 2017, 2016]);
        assert_eq!(panel.selected_year, Some(2018));
    }

    #[test]
    fn selection_survives_reload_when_year_still_present() {
        let mut panel = ControlPanel::new();
        panel.update_years(vec![2018, 2017]);
        panel.selected_year = Some(2017);
        panel.update_years(vec![2019, 2017]);
        assert_eq!(panel.selected_year, Some(2017));
        panel.update_years(vec![2020]);
        assert_eq!(panel.selected_year, Some(2020));
        panel.update_years(Vec::new());
        assert_eq!(panel.selected_year, None);
    }
}
