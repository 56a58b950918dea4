use rayon::prelude::*;

use crate::error::Result;
use crate::stats_table::{NumericCell, PercentileTable, StatTable};

/// Percentile (0-100) of every value within its column, ties sharing their
/// average rank. Cells without a usable value are left out of the ranking and
/// stay `None`.
pub fn percentile_ranks<C>(table: &StatTable<C>) -> PercentileTable
where
    C: NumericCell + Sync,
{
    let columns: Vec<usize> = (0..table.metrics.len()).collect();
    rank_selected(table, &columns)
}

/// Same as [`percentile_ranks`] restricted to the named columns, in the order
/// given.
pub fn rank_columns<C>(table: &StatTable<C>, names: &[&str]) -> Result<PercentileTable>
where
    C: NumericCell + Sync,
{
    let columns = names
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;
    Ok(rank_selected(table, &columns))
}

fn rank_selected<C>(table: &StatTable<C>, columns: &[usize]) -> PercentileTable
where
    C: NumericCell + Sync,
{
    let ranked: Vec<Vec<Option<f64>>> = columns
        .par_iter()
        .map(|&col| {
            let values: Vec<Option<f64>> = table.column_cells(col).map(|c| c.numeric()).collect();
            rank_column(&values)
        })
        .collect();

    let cells = (0..table.len())
        .map(|row| ranked.iter().map(|col| col[row]).collect())
        .collect();
    PercentileTable {
        players: table.players.clone(),
        metrics: columns.iter().map(|&c| table.metrics[c].clone()).collect(),
        cells,
    }
}

/// `rank / n * 100` with average ranks for ties; `n` counts only defined values.
pub fn rank_column(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut order: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = order.len() as f64;
    let mut out = vec![None; values.len()];
    let mut start = 0usize;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && order[end].1 == order[start].1 {
            end += 1;
        }
        // 1-based positions start+1..=end share their mean.
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        for &(idx, _) in &order[start..end] {
            out[idx] = Some(avg_rank / n * 100.0);
        }
        start = end;
    }
    out
}
