use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;

use crate::per90::Per90Value;
use crate::pipeline::StatsReport;
use crate::stats_table::StatTable;

const UNDEFINED: &str = "undefined";
const NUMBER_FORMAT: &str = "0.00";

pub struct ExportReport {
    pub players: usize,
    pub metrics: usize,
    pub undefined_cells: usize,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    generated_at: String,
    matches: &'a [String],
    #[serde(flatten)]
    report: &'a StatsReport,
}

/// A typed worksheet cell. Numbers keep full precision; the sheet only
/// formats them for display.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<Option<f64>> for SheetCell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(SheetCell::Empty, SheetCell::Number)
    }
}

impl From<&Per90Value> for SheetCell {
    fn from(value: &Per90Value) -> Self {
        match value {
            Per90Value::Defined(v) => SheetCell::Number(*v),
            Per90Value::Missing => SheetCell::Empty,
            Per90Value::Undefined(_) => SheetCell::Text(UNDEFINED.to_string()),
        }
    }
}

pub fn write_workbook(report: &StatsReport, path: &Path) -> Result<ExportReport> {
    let number_format = Format::new().set_num_format(NUMBER_FORMAT);
    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Combined", sheet_rows(&report.combined, |c| SheetCell::from(*c))),
        ("Per90", sheet_rows(&report.per90, |c| SheetCell::from(c))),
        (
            "Percentiles",
            sheet_rows(&report.combined_percentiles, |c| SheetCell::from(*c)),
        ),
        (
            "Per90Percentiles",
            sheet_rows(&report.per90_percentiles, |c| SheetCell::from(*c)),
        ),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, &rows, &number_format)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: report.combined.len(),
        metrics: report.combined.metrics.len(),
        undefined_cells: report.per90.undefined().len(),
    })
}

pub fn to_json(report: &StatsReport) -> Result<String> {
    let doc = JsonExport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        matches: &report.merged.match_labels,
        report,
    };
    serde_json::to_string_pretty(&doc).context("serialize stats report")
}

pub fn write_json(report: &StatsReport, path: &Path) -> Result<()> {
    let json = to_json(report)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

/// Header row (player column plus metric names) followed by one row per
/// player. `None` cells render empty.
pub fn table_rows<C>(
    table: &StatTable<C>,
    mut fmt_cell: impl FnMut(&C) -> Option<String>,
) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(table.len() + 1);
    let mut header = vec!["Player".to_string()];
    header.extend(table.column_names().map(str::to_string));
    rows.push(header);
    for (player, cells) in table.players.iter().zip(&table.cells) {
        let mut row = vec![player.clone()];
        row.extend(cells.iter().map(|c| fmt_cell(c).unwrap_or_default()));
        rows.push(row);
    }
    rows
}

/// Same layout as [`table_rows`] with typed cells for the workbook.
pub fn sheet_rows<C>(
    table: &StatTable<C>,
    mut cell: impl FnMut(&C) -> SheetCell,
) -> Vec<Vec<SheetCell>> {
    let mut rows = Vec::with_capacity(table.len() + 1);
    let mut header = vec![SheetCell::Text("Player".to_string())];
    header.extend(table.column_names().map(|n| SheetCell::Text(n.to_string())));
    rows.push(header);
    for (player, cells) in table.players.iter().zip(&table.cells) {
        let mut row = vec![SheetCell::Text(player.clone())];
        row.extend(cells.iter().map(&mut cell));
        rows.push(row);
    }
    rows
}

fn write_rows(
    worksheet: &mut Worksheet,
    rows: &[Vec<SheetCell>],
    number_format: &Format,
) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                SheetCell::Number(num) => {
                    worksheet.write_number_with_format(r, c, *num, number_format)
                }
                SheetCell::Text(text) => worksheet.write_string(r, c, text),
                SheetCell::Empty => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
