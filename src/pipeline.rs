use serde::Serialize;
use tracing::info;

use crate::aggregate::aggregate;
use crate::classify::{MetricClassification, classify_merged};
use crate::config::StatsConfig;
use crate::error::Result;
use crate::merge::{MergedTable, merge_matches};
use crate::per90::{Per90Stats, normalize_per90};
use crate::percentile::percentile_ranks;
use crate::stats_table::{CombinedStats, PercentileTable};
use crate::table::RawMatchTable;

#[derive(Debug)]
pub enum PipelineOutput {
    /// No match table was uploaded yet.
    NoData,
    Ready(Box<StatsReport>),
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    #[serde(skip)]
    pub merged: MergedTable,
    pub classification: MetricClassification,
    pub combined: CombinedStats,
    pub per90: Per90Stats,
    pub combined_percentiles: PercentileTable,
    pub per90_percentiles: PercentileTable,
}

pub struct StatsPipeline {
    config: StatsConfig,
}

impl StatsPipeline {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Validate, merge, classify, aggregate, normalize and rank one batch of
    /// upload slots.
    pub fn run(&self, slots: Vec<Option<RawMatchTable>>) -> Result<PipelineOutput> {
        let merged = merge_matches(slots, &self.config)?;
        if merged.is_empty() {
            info!("no match tables uploaded yet");
            return Ok(PipelineOutput::NoData);
        }

        let classification = classify_merged(&merged, &self.config);
        let combined = aggregate(&merged, &classification);
        let per90 = normalize_per90(&combined, &classification)?;
        let combined_percentiles = percentile_ranks(&combined);
        let per90_percentiles = percentile_ranks(&per90);

        info!(
            matches = merged.match_labels.len(),
            rows = merged.len(),
            players = combined.len(),
            metrics = combined.metrics.len(),
            undefined_per90 = per90.undefined().len(),
            "stats pipeline complete"
        );
        Ok(PipelineOutput::Ready(Box::new(StatsReport {
            merged,
            classification,
            combined,
            per90,
            combined_percentiles,
            per90_percentiles,
        })))
    }
}

impl PipelineOutput {
    pub fn report(&self) -> Option<&StatsReport> {
        match self {
            PipelineOutput::NoData => None,
            PipelineOutput::Ready(report) => Some(report.as_ref()),
        }
    }

    pub fn into_report(self) -> Option<StatsReport> {
        match self {
            PipelineOutput::NoData => None,
            PipelineOutput::Ready(report) => Some(*report),
        }
    }
}
