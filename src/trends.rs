use serde::Serialize;

use crate::error::{Result, StatsError};
use crate::merge::MergedTable;
use crate::per90::Per90Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMode {
    /// Team total per match.
    Total,
    /// Mean per player per match.
    PerPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTrendMode {
    Match,
    Per90,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTrend {
    pub stat: String,
    pub title: String,
    pub points: Vec<TrendPoint>,
}

/// Team figure for `stat` in every uploaded match, in upload order.
pub fn team_stat_trend(merged: &MergedTable, stat: &str, mode: TrendMode) -> Result<StatTrend> {
    let col = numeric_column(merged, stat)?;

    let points = merged
        .match_labels
        .iter()
        .map(|label| {
            let values: Vec<f64> = merged
                .rows
                .iter()
                .filter(|row| row.match_label == *label)
                .filter_map(|row| merged.number(row, col))
                .collect();
            let value = match mode {
                TrendMode::Total => Some(values.iter().sum()),
                TrendMode::PerPlayer if values.is_empty() => None,
                TrendMode::PerPlayer => Some(values.iter().sum::<f64>() / values.len() as f64),
            };
            TrendPoint {
                label: label.clone(),
                value,
            }
        })
        .collect();

    let pretty = pretty_stat(stat);
    let title = match mode {
        TrendMode::Total => format!("Total {pretty} Covered by Team Across Matches"),
        TrendMode::PerPlayer => format!("Average {pretty} per Player Across Matches"),
    };
    Ok(StatTrend {
        stat: stat.to_string(),
        title,
        points,
    })
}

/// One player's `stat` per match, or their single per-90 figure.
pub fn player_stat_trend(
    merged: &MergedTable,
    per90: &Per90Stats,
    player: &str,
    stat: &str,
    mode: PlayerTrendMode,
) -> Result<StatTrend> {
    let pretty = pretty_stat(stat);
    match mode {
        PlayerTrendMode::Match => {
            let col = numeric_column(merged, stat)?;
            let points: Vec<TrendPoint> = merged
                .rows
                .iter()
                .filter(|row| row.player.as_deref() == Some(player))
                .map(|row| TrendPoint {
                    label: row.match_label.clone(),
                    value: merged.number(row, col),
                })
                .collect();
            if points.is_empty() {
                return Err(StatsError::unknown_player(player));
            }
            Ok(StatTrend {
                stat: stat.to_string(),
                title: format!("{pretty} Trend for {player} Across Matches"),
                points,
            })
        }
        PlayerTrendMode::Per90 => {
            let value = per90.value(player, stat)?;
            Ok(StatTrend {
                stat: stat.to_string(),
                title: format!("{pretty} (Per 90) Trend for {player} Across Matches"),
                points: vec![TrendPoint {
                    label: player.to_string(),
                    value,
                }],
            })
        }
    }
}

/// Only numeric columns can be charted; text columns such as positions or
/// names count as unknown attributes.
fn numeric_column(merged: &MergedTable, stat: &str) -> Result<usize> {
    merged
        .column_index(stat)
        .filter(|&col| merged.is_numeric_column(col))
        .ok_or_else(|| StatsError::unknown_attribute(stat))
}

/// `km_covered` -> `Km covered`.
fn pretty_stat(stat: &str) -> String {
    let spaced = stat.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
