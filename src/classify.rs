use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StatsConfig;
use crate::merge::MergedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Summed across matches and rescaled per 90.
    Cumulative,
    /// Averaged across matches, never rescaled.
    RateType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Metric {
    pub name: String,
    pub kind: MetricKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricClassification {
    pub metrics: Vec<Metric>,
    /// Columns left out of aggregation (non-numeric, or not on the summable
    /// allowlist when one is configured).
    pub ignored: Vec<String>,
    pub minutes_column: String,
}

impl MetricClassification {
    pub fn cumulative(&self) -> impl Iterator<Item = &Metric> + '_ {
        self.metrics
            .iter()
            .filter(|m| m.kind == MetricKind::Cumulative)
    }

    pub fn rate_type(&self) -> impl Iterator<Item = &Metric> + '_ {
        self.metrics.iter().filter(|m| m.kind == MetricKind::RateType)
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<MetricKind> {
        self.get(name).map(|m| m.kind)
    }

    /// Whether per-90 normalization rescales this metric.
    pub fn is_rescaled(&self, metric: &Metric) -> bool {
        metric.kind == MetricKind::Cumulative && metric.name != self.minutes_column
    }

    pub fn display_label(&self, metric: &Metric) -> String {
        if self.is_rescaled(metric) {
            format!("{} (per 90)", metric.name)
        } else {
            metric.name.clone()
        }
    }
}

/// Split `columns` into cumulative and rate-type metrics. Anything not on the
/// rate-type list is cumulative unless a summable allowlist is configured.
pub fn classify_columns(columns: &[String], config: &StatsConfig) -> MetricClassification {
    let mut out = MetricClassification {
        minutes_column: config.minutes_column.clone(),
        ..MetricClassification::default()
    };

    for name in columns {
        if *name == config.identity_column || *name == config.match_column {
            continue;
        }
        if *name == config.minutes_column {
            if config.is_rate_type(name) {
                warn!(column = %name, "minutes column listed as rate-type; summing it anyway");
            }
            out.metrics.push(Metric {
                name: name.clone(),
                kind: MetricKind::Cumulative,
            });
            continue;
        }
        if config.is_rate_type(name) {
            out.metrics.push(Metric {
                name: name.clone(),
                kind: MetricKind::RateType,
            });
            continue;
        }
        let summable = config
            .summable_columns
            .as_ref()
            .is_none_or(|allow| allow.iter().any(|c| c == name));
        if summable {
            out.metrics.push(Metric {
                name: name.clone(),
                kind: MetricKind::Cumulative,
            });
        } else {
            out.ignored.push(name.clone());
        }
    }
    out
}

/// Classify the numeric columns of a merged table. Text columns never reach
/// the aggregator.
pub fn classify_merged(merged: &MergedTable, config: &StatsConfig) -> MetricClassification {
    let mut numeric = Vec::new();
    let mut text = Vec::new();
    for (idx, name) in merged.headers.iter().enumerate() {
        if *name == config.identity_column || *name == config.match_column {
            continue;
        }
        if merged.is_numeric_column(idx) {
            numeric.push(name.clone());
        } else {
            text.push(name.clone());
        }
    }
    if !text.is_empty() {
        warn!(columns = ?text, "ignoring non-numeric columns");
    }

    let mut out = classify_columns(&numeric, config);
    out.ignored.extend(text);
    debug!(
        cumulative = out.cumulative().count(),
        rate_type = out.rate_type().count(),
        ignored = out.ignored.len(),
        "classified columns"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_columns_default_to_cumulative() {
        let c = classify_columns(
            &cols(&["Player", "Minutes", "km_covered", "max_speed", "brand_new_metric"]),
            &StatsConfig::default(),
        );
        assert_eq!(c.kind_of("km_covered"), Some(MetricKind::Cumulative));
        assert_eq!(c.kind_of("brand_new_metric"), Some(MetricKind::Cumulative));
        assert_eq!(c.kind_of("max_speed"), Some(MetricKind::RateType));
        assert_eq!(c.kind_of("Minutes"), Some(MetricKind::Cumulative));
        assert_eq!(c.kind_of("Player"), None);
    }

    #[test]
    fn partitions_are_disjoint() {
        let c = classify_columns(
            &cols(&["Minutes", "xG", "EDI (%)", "technical_load"]),
            &StatsConfig::default(),
        );
        for m in c.cumulative() {
            assert!(c.rate_type().all(|r| r.name != m.name));
        }
        assert_eq!(c.cumulative().count() + c.rate_type().count(), 4);
    }

    #[test]
    fn allowlist_limits_summed_columns() {
        let config = StatsConfig {
            summable_columns: Some(cols(&["km_covered"])),
            ..StatsConfig::default()
        };
        let c = classify_columns(&cols(&["Minutes", "km_covered", "Shirt", "max_speed"]), &config);
        assert_eq!(c.kind_of("km_covered"), Some(MetricKind::Cumulative));
        assert_eq!(c.kind_of("Minutes"), Some(MetricKind::Cumulative));
        assert_eq!(c.kind_of("max_speed"), Some(MetricKind::RateType));
        assert_eq!(c.ignored, vec!["Shirt"]);
    }

    #[test]
    fn labels_come_from_the_tag() {
        let c = classify_columns(&cols(&["Minutes", "xG", "max_speed"]), &StatsConfig::default());
        let label = |name: &str| c.display_label(c.get(name).unwrap());
        assert_eq!(label("xG"), "xG (per 90)");
        assert_eq!(label("max_speed"), "max_speed");
        assert_eq!(label("Minutes"), "Minutes");
    }
}
