//! US Gun Fatalities Dashboard
//!
//! Loads a mass-shooting incident CSV, normalizes the state of every
//! incident, sums fatalities by year and state, and shows the result as a
//! tile map of one year next to a year x state heatmap.
//!
//! # Usage
//!
//! ```text
//! gun-fatalities dashboard US_Mass_Shootings.csv
//! gun-fatalities summary US_Mass_Shootings.csv --year 2017
//! gun-fatalities export US_Mass_Shootings.csv --out-dir charts --theme theme.json
//! ```

mod charts;
mod config;
mod data;
mod gui;

use anyhow::{bail, Context, Result};
use charts::StaticChartRenderer;
use clap::{Parser, Subcommand};
use config::Theme;
use data::{DerivationReport, FatalityTable};
use eframe::egui;
use gui::DashboardApp;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gun-fatalities", version, about = "US gun fatalities by state and year")]
struct Cli {
    /// JSON theme file; omitted fields keep the dark default.
    #[arg(long, global = true, value_name = "FILE")]
    theme: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard (default).
    Dashboard {
        /// CSV to load on startup.
        csv: Option<PathBuf>,
    },
    /// Print the aggregated table, or one year's ranking.
    Summary {
        csv: PathBuf,
        #[arg(long)]
        year: Option<i32>,
        /// Print the aggregated table as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write fatalities.csv, fatalities.json, heatmap.png and map_<year>.png.
    Export {
        csv: PathBuf,
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
        /// Year for the map view; defaults to the newest year.
        #[arg(long)]
        year: Option<i32>,
    },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let theme = match &cli.theme {
        Some(path) => Theme::load(path)
            .with_context(|| format!("loading theme {}", path.display()))?,
        None => Theme::default(),
    };

    match cli.command.unwrap_or(Command::Dashboard { csv: None }) {
        Command::Dashboard { csv } => run_dashboard(theme, csv),
        Command::Summary { csv, year, json } => run_summary(&csv, year, json),
        Command::Export { csv, out_dir, year } => run_export(&csv, &out_dir, year, &theme),
    }
}

fn run_dashboard(theme: Theme, csv: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title(theme.title.clone()),
        ..Default::default()
    };

    let title = theme.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, theme, csv)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard failed: {e}"))
}

fn load(csv: &Path) -> Result<data::LoadedData> {
    data::load_and_aggregate(csv).with_context(|| format!("processing {}", csv.display()))
}

fn resolve_year(table: &FatalityTable, year: Option<i32>) -> Result<i32> {
    match year {
        Some(y) if table.years().contains(&y) => Ok(y),
        Some(y) => bail!(
            "no data for year {y}; available: {}",
            table
                .years()
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => table.latest_year().context("aggregated table is empty"),
    }
}

/// Shape of `summary --json`.
#[derive(Serialize)]
struct SummaryJson<'a> {
    table: &'a FatalityTable,
    report: &'a DerivationReport,
}

fn summary_json(loaded: &data::LoadedData) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SummaryJson {
        table: &loaded.table,
        report: &loaded.report,
    })?)
}

fn run_summary(csv: &Path, year: Option<i32>, json: bool) -> Result<()> {
    let loaded = load(csv)?;
    let table = &loaded.table;

    if json {
        println!("{}", summary_json(&loaded)?);
        return Ok(());
    }

    match year {
        Some(_) => {
            let year = resolve_year(table, year)?;
            let ranked = table.ranked_for_year(year);
            println!(
                "{year}: {} fatalities in {} of {} states",
                table.total_for_year(year),
                ranked.len(),
                data::canonical_codes().count()
            );
            for row in ranked {
                println!("  {:<4}{:>6}", row.state_code, row.fatalities);
            }
        }
        None => {
            println!("{:<6}{:<7}{:>10}", "year", "state", "fatalities");
            for row in table.rows() {
                println!("{:<6}{:<7}{:>10}", row.year, row.state_code, row.fatalities);
            }
        }
    }
    print_report(&loaded.report);
    Ok(())
}

fn print_report(report: &DerivationReport) {
    println!();
    println!("rows read:            {}", report.rows_read);
    println!("counted:              {}", report.records_kept);
    println!("unusable rows:        {}", report.rows_skipped);
    println!("no state in location: {}", report.malformed_locations);
    println!("unknown state:        {}", report.unmapped_total());
    for (token, count) in &report.unmapped_states {
        println!("  {token:?} x{count}");
    }
}

fn run_export(csv: &Path, out_dir: &Path, year: Option<i32>, theme: &Theme) -> Result<()> {
    let loaded = load(csv)?;
    let table = &loaded.table;
    let year = resolve_year(table, year)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    table.write_csv(&out_dir.join("fatalities.csv"))?;
    table.write_json(&out_dir.join("fatalities.json"))?;
    StaticChartRenderer::render_heatmap(
        table,
        theme,
        &out_dir.join("heatmap.png"),
        gui::EXPORT_SIZE,
    )?;
    StaticChartRenderer::render_tile_map(
        table,
        year,
        theme,
        &out_dir.join(format!("map_{year}.png")),
        gui::EXPORT_SIZE,
    )?;

    info!(dir = %out_dir.display(), year, "export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use charts::RenderError;
    use polars::prelude::df;

    fn table() -> FatalityTable {
        let df = df!(
            "year" => [2016i32, 2017, 2017],
            "state_code" => ["FL", "NV", "TX"],
            "fatalities" => [49i64, 58, 34]
        )
        .unwrap();
        FatalityTable::from_frame(&df).unwrap()
    }

    fn write_csv(dir: &Path) -> PathBuf {
        let path = dir.join("incidents.csv");
        std::fs::write(
            &path,
            "location,year,fatalities\n\
             \"Las Vegas, NV\",2017,58\n\
             \"Orlando, Florida\",2016,49\n\
             \"Poseidonis, Atlantis\",2016,4\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn year_defaults_to_newest() {
        assert_eq!(resolve_year(&table(), None).unwrap(), 2017);
    }

    #[test]
    fn present_year_is_kept() {
        assert_eq!(resolve_year(&table(), Some(2016)).unwrap(), 2016);
    }

    #[test]
    fn unknown_year_lists_available_years() {
        let err = resolve_year(&table(), Some(1999)).unwrap_err().to_string();
        assert!(err.contains("1999"), "{err}");
        assert!(err.contains("2017, 2016"), "{err}");
    }

    #[test]
    fn empty_table_is_an_error() {
        let err = resolve_year(&FatalityTable::default(), None).unwrap_err();
        assert!(err.to_string().contains("empty"), "{err}");
    }

    #[test]
    fn summary_json_carries_table_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&write_csv(dir.path())).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&summary_json(&loaded).unwrap()).unwrap();
        assert_eq!(value["table"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["report"]["rows_read"], 3);
        assert_eq!(value["report"]["unmapped_states"]["Atlantis"], 1);
    }

    #[test]
    fn export_writes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path());
        let out = dir.path().join("out");

        // PNG rendering depends on system fonts; the tables are written first.
        if let Err(err) = run_export(&csv, &out, None, &Theme::default()) {
            assert!(err.downcast_ref::<RenderError>().is_some(), "{err:#}");
        }
        assert!(out.join("fatalities.csv").is_file());
        assert!(out.join("fatalities.json").is_file());

        let rows: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("fatalities.json")).unwrap())
                .unwrap();
        assert_eq!(rows[0]["state_code"], "FL");
    }

    #[test]
    fn export_rejects_unknown_year() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path());
        let out = dir.path().join("out");
        assert!(run_export(&csv, &out, Some(1999), &Theme::default()).is_err());
        assert!(!out.exists());
    }
}
