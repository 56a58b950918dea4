use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV_VAR: &str = "TRACKING_STATS_CONFIG";

/// Metrics whose meaningful value is an instantaneous or derived rate.
/// They are averaged across matches and never rescaled per 90.
pub const DEFAULT_RATE_TYPE_COLUMNS: [&str; 9] = [
    "max_speed",
    "Max Shot Power (km/h)",
    "technical_load",
    "technical_load_left",
    "technical_load_right",
    "distance_per_minute (m)",
    "EDI (%)",
    "Anaerobic Index (%)",
    "Aerobic Index (%)",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub identity_column: String,
    pub minutes_column: String,
    pub match_column: String,
    pub required_columns: Vec<String>,
    pub rate_type_columns: Vec<String>,
    // When set, only these columns (plus minutes) are summed; other non-rate
    // numeric columns are left out of the stats tables.
    pub summable_columns: Option<Vec<String>>,
    pub max_match_slots: usize,
    pub min_compare_attributes: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            identity_column: "Player".to_string(),
            minutes_column: "Minutes".to_string(),
            match_column: "Match".to_string(),
            required_columns: vec![
                "Player".to_string(),
                "Minutes".to_string(),
                "km_covered".to_string(),
            ],
            rate_type_columns: DEFAULT_RATE_TYPE_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            summable_columns: None,
            max_match_slots: 40,
            min_compare_attributes: 3,
        }
    }
}

impl StatsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = serde_json::from_str::<StatsConfig>(&raw)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Config file named by `TRACKING_STATS_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match config_path_from_env() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).context("serialize stats config")?;
        fs::write(&tmp, json).context("write stats config")?;
        fs::rename(&tmp, path).context("swap stats config")?;
        Ok(())
    }

    /// Required columns with identity and minutes always included.
    pub fn effective_required_columns(&self) -> Vec<String> {
        let mut out = vec![self.identity_column.clone(), self.minutes_column.clone()];
        for col in &self.required_columns {
            if !out.contains(col) {
                out.push(col.clone());
            }
        }
        out
    }

    pub fn is_rate_type(&self, column: &str) -> bool {
        self.rate_type_columns.iter().any(|c| c == column)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    let raw = std::env::var(CONFIG_ENV_VAR).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
