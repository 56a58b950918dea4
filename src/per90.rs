use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::classify::MetricClassification;
use crate::error::{DivisionByZero, Result, StatsError};
use crate::stats_table::{CombinedStats, NumericCell, StatTable};

pub const MINUTES_PER_MATCH: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Per90Value {
    Defined(f64),
    /// Rate-type mean over no values.
    Missing,
    /// Cumulative metric for a player with zero minutes.
    Undefined(DivisionByZero),
}

impl Per90Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Per90Value::Defined(v) => Some(*v),
            _ => None,
        }
    }
}

impl NumericCell for Per90Value {
    fn numeric(&self) -> Option<f64> {
        self.as_f64().filter(|v| v.is_finite())
    }
}

impl Serialize for Per90Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Per90Value::Defined(v) => serializer.serialize_f64(*v),
            Per90Value::Missing => serializer.serialize_none(),
            Per90Value::Undefined(_) => serializer.serialize_str("undefined"),
        }
    }
}

pub type Per90Stats = StatTable<Per90Value>;

impl Per90Stats {
    /// Numeric per-90 value. Zero-minute cells surface as `DivisionByZero`.
    pub fn value(&self, player: &str, column: &str) -> Result<Option<f64>> {
        match self.cell(player, column)? {
            Per90Value::Defined(v) => Ok(Some(*v)),
            Per90Value::Missing => Ok(None),
            Per90Value::Undefined(err) => Err(StatsError::DivisionByZero(err.clone())),
        }
    }

    pub fn undefined(&self) -> Vec<DivisionByZero> {
        self.cells
            .iter()
            .flatten()
            .filter_map(|cell| match cell {
                Per90Value::Undefined(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Rescale cumulative metrics to per-90 figures using each player's own total
/// minutes. Rate-type metrics and the minutes column pass through unchanged.
pub fn normalize_per90(
    combined: &CombinedStats,
    classification: &MetricClassification,
) -> Result<Per90Stats> {
    let minutes_col = combined.require_column(&classification.minutes_column)?;
    let rescaled: Vec<bool> = combined
        .metrics
        .iter()
        .map(|m| classification.is_rescaled(m))
        .collect();

    let mut zero_minute_players = 0usize;
    let cells = combined
        .players
        .iter()
        .zip(&combined.cells)
        .map(|(player, row)| {
            let minutes = row[minutes_col].unwrap_or(0.0);
            let mut flagged = false;
            let out: Vec<Per90Value> = row
                .iter()
                .zip(&combined.metrics)
                .zip(&rescaled)
                .map(|((cell, metric), rescale)| {
                    if !*rescale {
                        return cell.map_or(Per90Value::Missing, Per90Value::Defined);
                    }
                    // Subnormal minutes overflow just like zero does.
                    let scaled = cell.unwrap_or(0.0) / minutes * MINUTES_PER_MATCH;
                    if minutes == 0.0 || !scaled.is_finite() {
                        flagged = true;
                        return Per90Value::Undefined(DivisionByZero {
                            player: player.clone(),
                            column: metric.name.clone(),
                        });
                    }
                    Per90Value::Defined(scaled)
                })
                .collect();
            if flagged {
                zero_minute_players += 1;
            }
            out
        })
        .collect();

    if zero_minute_players > 0 {
        warn!(
            players = zero_minute_players,
            "per-90 values undefined for players with zero or negligible minutes"
        );
    }
    debug!(players = combined.len(), "normalized per-90 stats");
    Ok(Per90Stats {
        players: combined.players.clone(),
        metrics: combined.metrics.clone(),
        cells,
    })
}
