use serde::Serialize;

use crate::classify::Metric;
use crate::error::{Result, StatsError};

/// One row per player, one column per metric. Shared shape of the combined,
/// per-90 and percentile tables; only the cell type differs.
#[derive(Debug, Clone, Serialize)]
pub struct StatTable<C> {
    pub players: Vec<String>,
    pub metrics: Vec<Metric>,
    /// `cells[row][col]`, aligned with `players` and `metrics`.
    pub cells: Vec<Vec<C>>,
}

impl<C> StatTable<C> {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m.name == name)
    }

    pub fn row_index(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| StatsError::unknown_attribute(name))
    }

    pub fn require_row(&self, player: &str) -> Result<usize> {
        self.row_index(player)
            .ok_or_else(|| StatsError::unknown_player(player))
    }

    pub fn cell(&self, player: &str, column: &str) -> Result<&C> {
        let col = self.require_column(column)?;
        let row = self.require_row(player)?;
        Ok(&self.cells[row][col])
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.metrics.iter().map(|m| m.name.as_str())
    }

    pub(crate) fn column_cells(&self, col: usize) -> impl Iterator<Item = &C> + '_ {
        self.cells.iter().map(move |row| &row[col])
    }
}

/// Cells the percentile ranker can read a number from.
pub trait NumericCell {
    fn numeric(&self) -> Option<f64>;
}

impl NumericCell for Option<f64> {
    fn numeric(&self) -> Option<f64> {
        self.filter(|v| v.is_finite())
    }
}

/// Per-player sums (cumulative) and means (rate-type). A `None` cell is a
/// rate-type mean over no values.
pub type CombinedStats = StatTable<Option<f64>>;

/// Within-column percentile ranks (0-100). `None` where the source cell had no
/// usable value.
pub type PercentileTable = StatTable<Option<f64>>;

impl CombinedStats {
    pub fn value(&self, player: &str, column: &str) -> Result<Option<f64>> {
        self.cell(player, column).copied()
    }
}
