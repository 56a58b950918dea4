use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::classify::{Metric, MetricClassification, MetricKind};
use crate::merge::{MergedRow, MergedTable};
use crate::stats_table::CombinedStats;

#[derive(Debug, Default, Clone, Copy)]
struct Accum {
    sum: f64,
    n: usize,
}

impl Accum {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn finish(self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Cumulative => Some(self.sum),
            MetricKind::RateType if self.n == 0 => None,
            MetricKind::RateType => Some(self.sum / self.n as f64),
        }
    }
}

/// Group merged rows by player: cumulative metrics are summed, rate-type
/// metrics averaged. Metrics the table does not carry are left out. Rows are
/// ordered by player identity.
pub fn aggregate(merged: &MergedTable, classification: &MetricClassification) -> CombinedStats {
    let present: Vec<(Metric, usize)> = classification
        .metrics
        .iter()
        .filter_map(|m| merged.column_index(&m.name).map(|idx| (m.clone(), idx)))
        .collect();

    let mut groups: BTreeMap<&str, Vec<Accum>> = BTreeMap::new();
    let mut skipped = 0usize;
    for row in &merged.rows {
        let Some(player) = row.player.as_deref() else {
            skipped += 1;
            continue;
        };
        let accums = groups
            .entry(player)
            .or_insert_with(|| vec![Accum::default(); present.len()]);
        accumulate_row(merged, row, &present, accums);
    }
    if skipped > 0 {
        warn!(rows = skipped, "skipped rows without a player identity");
    }

    let mut players = Vec::with_capacity(groups.len());
    let mut cells = Vec::with_capacity(groups.len());
    for (player, accums) in groups {
        players.push(player.to_string());
        cells.push(
            accums
                .into_iter()
                .zip(&present)
                .map(|(acc, (metric, _))| acc.finish(metric.kind))
                .collect(),
        );
    }

    debug!(
        players = players.len(),
        columns = present.len(),
        "aggregated per-player stats"
    );
    CombinedStats {
        players,
        metrics: present.into_iter().map(|(m, _)| m).collect(),
        cells,
    }
}

fn accumulate_row(
    merged: &MergedTable,
    row: &MergedRow,
    present: &[(Metric, usize)],
    accums: &mut [Accum],
) {
    for (acc, (_, idx)) in accums.iter_mut().zip(present) {
        if let Some(v) = merged.number(row, *idx) {
            acc.push(v);
        }
    }
}
