use serde::Serialize;

use crate::error::{Result, StatsError};
use crate::merge::MergedTable;

/// Tracking export columns for distance by speed band, with display names.
pub const INTENSITY_BANDS: [(&str, &str); 6] = [
    ("Standing (m) (0-0.3 km/h)", "Standing"),
    ("Walking (m) (0.3-3 km/h)", "Walking"),
    ("Jogging (m) (3-8 km/h)", "Jogging"),
    ("Low Intensity Running (m) (8-13 km/h)", "Low Intensity"),
    ("Mid Intensity Running (m) (13-18 km/h)", "Mid Intensity"),
    ("High Intensity Running (m) (> 18 km/h)", "High Intensity"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandDistance {
    pub band: &'static str,
    pub meters: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceBreakdownRow {
    pub player: String,
    pub match_label: String,
    pub bands: Vec<BandDistance>,
}

impl DistanceBreakdownRow {
    pub fn total_meters(&self) -> f64 {
        self.bands.iter().filter_map(|b| b.meters).sum()
    }
}

/// Distance per speed band for every merged row, sorted by player.
pub fn distance_breakdown(merged: &MergedTable) -> Result<Vec<DistanceBreakdownRow>> {
    let missing: Vec<String> = INTENSITY_BANDS
        .iter()
        .filter(|(col, _)| !merged.has_column(col))
        .map(|(col, _)| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StatsError::MissingColumns {
            what: "distance breakdown",
            missing,
        });
    }
    let cols: Vec<(usize, &'static str)> = INTENSITY_BANDS
        .iter()
        .filter_map(|(col, label)| merged.column_index(col).map(|idx| (idx, *label)))
        .collect();

    let mut rows: Vec<DistanceBreakdownRow> = merged
        .rows
        .iter()
        .filter_map(|row| {
            let player = row.player.clone()?;
            Some(DistanceBreakdownRow {
                player,
                match_label: row.match_label.clone(),
                bands: cols
                    .iter()
                    .map(|&(idx, band)| BandDistance {
                        band,
                        meters: merged.number(row, idx),
                    })
                    .collect(),
            })
        })
        .collect();
    // Stable: a player's matches keep upload order.
    rows.sort_by(|a, b| a.player.cmp(&b.player));
    Ok(rows)
}
