//! Spreadsheet export of estimate results
//!
//! Builds a two-sheet workbook: a summary sheet (`Ringkasan`) with plot metadata
//! and aggregate metrics, and a detail sheet (`Rincian Pohon`) with one row per
//! tree. Metrics are written with 4 decimal places. Sheets are written as CSV,
//! one file per sheet, named from the plot name and the current UTC date.

use chrono::{NaiveDate, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CarbonError, Result};
use crate::estimator::AggregateResult;
use crate::report::Plot;

/// Decimal places used for exported metrics
pub const EXPORT_DECIMALS: usize = 4;

/// Name of the summary sheet
pub const SUMMARY_SHEET: &str = "Ringkasan";

/// Name of the tree detail sheet
pub const DETAIL_SHEET: &str = "Rincian Pohon";

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Integer(usize),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Fixed-precision decimal, stored as text so the sheet shows exactly
    /// `EXPORT_DECIMALS` places
    fn fixed(value: f64) -> Self {
        Cell::Text(format!("{:.*}", EXPORT_DECIMALS, value))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Integer(v) => write!(f, "{v}"),
        }
    }
}

/// A named sheet of rows. Rows may differ in length.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Column widths fitted to the longest cell text in each column
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (col, cell) in row.iter().enumerate() {
                let len = cell.to_string().chars().count();
                if col >= widths.len() {
                    widths.resize(col + 1, 0);
                }
                widths[col] = widths[col].max(len);
            }
        }
        widths
    }

    fn row_strings(row: &[Cell]) -> Vec<String> {
        row.iter().map(ToString::to_string).collect()
    }
}

/// Summary and detail sheets for one plot estimate
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build the summary and detail sheets from an estimate.
    pub fn from_results(results: &AggregateResult, plot: &Plot) -> Self {
        let plot_name = if plot.name.is_empty() {
            "N/A".to_string()
        } else {
            plot.name.clone()
        };

        let summary = Sheet {
            name: SUMMARY_SHEET.to_string(),
            rows: vec![
                vec![Cell::text("Informasi Plot & Ringkasan Kalkulasi")],
                vec![],
                vec![Cell::text("Nama Plot"), Cell::Text(plot_name)],
                vec![Cell::text("Luas Plot (hektar)"), Cell::Number(*plot.area)],
                vec![],
                vec![Cell::text("Metrik"), Cell::text("Nilai"), Cell::text("Unit")],
                vec![
                    Cell::text("Total Pohon"),
                    Cell::Integer(results.total_trees),
                    Cell::text("pohon"),
                ],
                vec![
                    Cell::text("Total Stok Karbon"),
                    Cell::fixed(*results.total_carbon_stock),
                    Cell::text("ton C"),
                ],
                vec![
                    Cell::text("Total Serapan CO₂"),
                    Cell::fixed(*results.total_co2_sequestration),
                    Cell::text("ton CO₂e"),
                ],
                vec![
                    Cell::text("Stok Karbon per Hektar"),
                    Cell::fixed(*results.carbon_stock_per_hectare),
                    Cell::text("ton C/ha"),
                ],
                vec![
                    Cell::text("Serapan CO₂ per Hektar"),
                    Cell::fixed(*results.co2_sequestration_per_hectare),
                    Cell::text("ton CO₂e/ha"),
                ],
            ],
        };

        let mut detail_rows = Vec::with_capacity(results.tree_breakdown.len() + 1);
        detail_rows.push(vec![
            Cell::text("ID Pohon"),
            Cell::text("Jenis Pohon"),
            Cell::text("DBH (cm)"),
            Cell::text("Stok Karbon (kg)"),
            Cell::text("Serapan CO₂ (kg)"),
        ]);
        detail_rows.extend(results.tree_breakdown.iter().map(|tree| {
            vec![
                Cell::text(tree.id.as_str()),
                Cell::text(tree.species_name.as_str()),
                Cell::Number(*tree.dbh),
                Cell::fixed(*tree.carbon_stock),
                Cell::fixed(*tree.co2_sequestration),
            ]
        }));

        let detail = Sheet {
            name: DETAIL_SHEET.to_string(),
            rows: detail_rows,
        };

        Self {
            sheets: vec![summary, detail],
        }
    }

    /// Find a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Write each sheet as `<dir>/<stem>_<sheet name>.csv`.
    ///
    /// Spaces in sheet names become underscores. Returns the written paths in
    /// sheet order.
    ///
    /// # Errors
    /// Returns `CarbonError::Export` if a CSV writer fails, or `CarbonError::Io`
    /// if the directory cannot be created or a file cannot be flushed.
    pub fn write_csv_dir(&self, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            let path = dir.join(format!("{stem}_{}.csv", sheet.name.replace(' ', "_")));
            let export_err = |source: csv::Error| CarbonError::Export {
                sheet: sheet.name.clone(),
                source,
            };

            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&path)
                .map_err(export_err)?;
            for row in &sheet.rows {
                writer
                    .write_record(Sheet::row_strings(row))
                    .map_err(export_err)?;
            }
            writer.flush()?;

            info!(sheet = %sheet.name, path = %path.display(), "Exported sheet");
            written.push(path);
        }
        Ok(written)
    }
}

/// Characters that cannot appear in a file name on common platforms
const RESERVED_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// File stem for an export: `Kalkulasi_Karbon_<plot name>_<YYYY-MM-DD>`
///
/// Spaces, path separators, reserved and control characters in the plot name
/// become underscores so the stem is always a single path component. An empty
/// name becomes `Plot`.
pub fn export_file_stem(plot_name: &str, date: NaiveDate) -> String {
    let name = if plot_name.is_empty() {
        "Plot".to_string()
    } else {
        plot_name
            .chars()
            .map(|c| {
                if c == ' ' || c.is_control() || RESERVED_FILENAME_CHARS.contains(&c) {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    };
    format!("Kalkulasi_Karbon_{name}_{}", date.format("%Y-%m-%d"))
}

/// File stem for an export dated today (UTC)
pub fn export_file_stem_today(plot_name: &str) -> String {
    export_file_stem(plot_name, Utc::now().date_naive())
}
