use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use tracking_stats::config::StatsConfig;
use tracking_stats::export::{self, table_rows};
use tracking_stats::per90::Per90Value;
use tracking_stats::table::RawMatchTable;
use tracking_stats::{PipelineOutput, StatsPipeline, StatsReport};

/// Marks an upload slot with no file; later files keep their match number.
const EMPTY_SLOT: &str = "_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Combined,
    Per90,
    Percentiles,
}

#[derive(Debug)]
struct Args {
    slots: Vec<Option<PathBuf>>,
    config: Option<PathBuf>,
    view: View,
    xlsx: Option<PathBuf>,
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let config = match &args.config {
        Some(path) => StatsConfig::load(path)?,
        None => StatsConfig::from_env()?,
    };

    let mut slots = Vec::with_capacity(args.slots.len());
    for slot in &args.slots {
        let table = match slot {
            Some(path) => Some(
                RawMatchTable::from_path(path)
                    .with_context(|| format!("load {}", path.display()))?,
            ),
            None => None,
        };
        slots.push(table);
    }

    let pipeline = StatsPipeline::new(config);
    let report = match pipeline.run(slots)? {
        PipelineOutput::NoData => {
            println!("No match data uploaded yet.");
            return Ok(());
        }
        PipelineOutput::Ready(report) => report,
    };

    print_view(&report, args.view);

    if let Some(path) = &args.xlsx {
        let summary = export::write_workbook(&report, path)?;
        info!(
            path = %path.display(),
            players = summary.players,
            metrics = summary.metrics,
            undefined = summary.undefined_cells,
            "workbook written"
        );
    }
    if let Some(path) = &args.json {
        export::write_json(&report, path)?;
        info!(path = %path.display(), "json written");
    }
    Ok(())
}

fn init_tracing() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args {
        slots: Vec::new(),
        config: None,
        view: View::Combined,
        xlsx: None,
        json: None,
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "--xlsx" | "--json" | "--view" => {
                let Some(value) = iter.next().filter(|v| !v.trim().is_empty()) else {
                    bail!("{arg} needs a value");
                };
                match arg.as_str() {
                    "--config" => out.config = Some(PathBuf::from(value)),
                    "--xlsx" => out.xlsx = Some(PathBuf::from(value)),
                    "--json" => out.json = Some(PathBuf::from(value)),
                    _ => out.view = parse_view(&value)?,
                }
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            EMPTY_SLOT => out.slots.push(None),
            path => out.slots.push(Some(PathBuf::from(path))),
        }
    }
    Ok(out)
}

fn parse_view(raw: &str) -> Result<View> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "combined" => Ok(View::Combined),
        "per90" | "per-90" => Ok(View::Per90),
        "percentiles" | "pct" => Ok(View::Percentiles),
        other => bail!("unknown view {other} (combined|per90|percentiles)"),
    }
}

fn print_view(report: &StatsReport, view: View) {
    let rows = match view {
        View::Combined => table_rows(&report.combined, |c| c.map(|v| format!("{v:.2}"))),
        View::Per90 => table_rows(&report.per90, |c| match c {
            Per90Value::Defined(v) => Some(format!("{v:.2}")),
            Per90Value::Missing => None,
            Per90Value::Undefined(_) => Some("undefined".to_string()),
        }),
        View::Percentiles => {
            table_rows(&report.combined_percentiles, |c| c.map(|v| format!("{v:.1}")))
        }
    };
    print_rows(&rows);
}

fn print_rows(rows: &[Vec<String>]) {
    let cols = rows.first().map(Vec::len).unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn underscore_keeps_slot_numbering() {
        let args = parse_args(strings(&["m1.csv", "_", "m3.csv", "--view", "per90"])).unwrap();
        assert_eq!(args.slots.len(), 3);
        assert!(args.slots[1].is_none());
        assert_eq!(args.view, View::Per90);
    }

    #[test]
    fn flag_without_value_is_rejected() {
        assert!(parse_args(strings(&["m1.csv", "--xlsx"])).is_err());
        assert!(parse_args(strings(&["--bogus"])).is_err());
    }
}
