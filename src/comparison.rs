use serde::Serialize;

use crate::error::{Result, StatsError};
use crate::pipeline::StatsReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub combined: Option<f64>,
    pub per90: Option<f64>,
    pub percentile: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeComparison {
    pub attribute: String,
    pub label: String,
    pub first: PlayerSnapshot,
    pub second: PlayerSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerComparison {
    pub first: String,
    pub second: String,
    pub attributes: Vec<AttributeComparison>,
}

/// Side-by-side view of two players. Percentiles rank the combined totals;
/// per-90 values that are undefined for a player come back as `None`.
pub fn compare_players(
    report: &StatsReport,
    first: &str,
    second: &str,
    attributes: &[&str],
    min_attributes: usize,
) -> Result<PlayerComparison> {
    if attributes.len() < min_attributes {
        return Err(StatsError::TooFewAttributes {
            required: min_attributes,
            given: attributes.len(),
        });
    }
    report.combined.require_row(first)?;
    report.combined.require_row(second)?;

    let rows = attributes
        .iter()
        .map(|attr| -> Result<AttributeComparison> {
            let col = report.combined.require_column(attr)?;
            let metric = &report.combined.metrics[col];
            Ok(AttributeComparison {
                attribute: attr.to_string(),
                label: report.classification.display_label(metric),
                first: snapshot(report, first, attr)?,
                second: snapshot(report, second, attr)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PlayerComparison {
        first: first.to_string(),
        second: second.to_string(),
        attributes: rows,
    })
}

fn snapshot(report: &StatsReport, player: &str, attr: &str) -> Result<PlayerSnapshot> {
    let per90 = match report.per90.value(player, attr) {
        Ok(v) => v,
        Err(StatsError::DivisionByZero(_)) => None,
        Err(err) => return Err(err),
    };
    Ok(PlayerSnapshot {
        combined: report.combined.value(player, attr)?,
        per90,
        percentile: *report.combined_percentiles.cell(player, attr)?,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub player: String,
    pub x: f64,
    pub y: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x: String,
    pub y: String,
    pub title: String,
    pub points: Vec<ScatterPoint>,
}

/// Per-90 x/y pairs for every player with both values defined.
pub fn scatter_series(
    report: &StatsReport,
    x: &str,
    y: &str,
    highlight: &[&str],
) -> Result<ScatterSeries> {
    let per90 = &report.per90;
    let x_col = per90.require_column(x)?;
    let y_col = per90.require_column(y)?;
    for player in highlight {
        per90.require_row(player)?;
    }

    let points = per90
        .players
        .iter()
        .zip(&per90.cells)
        .filter_map(|(player, row)| {
            let (x, y) = (row[x_col].as_f64()?, row[y_col].as_f64()?);
            Some(ScatterPoint {
                player: player.clone(),
                x,
                y,
                highlighted: highlight.contains(&player.as_str()),
            })
        })
        .collect();

    Ok(ScatterSeries {
        x: x.to_string(),
        y: y.to_string(),
        title: format!("{y} vs {x}"),
        points,
    })
}
