use std::collections::HashMap;

use tracing::debug;

use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::schema::validate_table;
use crate::table::{CellValue, RawMatchTable};

#[derive(Debug, Clone)]
pub struct MergedRow {
    pub match_label: String,
    /// 1-based upload slot the row came from.
    pub slot: usize,
    pub player: Option<String>,
    pub cells: Vec<CellValue>,
}

/// All uploaded matches stacked into one long table. `headers` is the union of
/// the input headers in first-seen order; cells absent from a source are
/// `Missing`.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub rows: Vec<MergedRow>,
    /// Labels of the matches actually present, in slot order.
    pub match_labels: Vec<String>,
    pub identity_column: String,
}

impl MergedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.match_labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Numeric value of `column` in `row`, `None` when missing or not a number.
    pub fn number(&self, row: &MergedRow, column: usize) -> Option<f64> {
        row.cells.get(column).and_then(CellValue::as_number)
    }

    /// A column is numeric when every non-missing cell holds a number.
    pub fn is_numeric_column(&self, column: usize) -> bool {
        self.rows
            .iter()
            .all(|row| !matches!(row.cells.get(column), Some(CellValue::Text(_))))
    }
}

pub fn match_label(slot: usize) -> String {
    format!("M{slot}")
}

/// Merge the upload slots in order. Empty slots are skipped but still count
/// toward the match numbering. Any invalid table aborts the whole merge.
pub fn merge_matches(
    slots: Vec<Option<RawMatchTable>>,
    config: &StatsConfig,
) -> Result<MergedTable> {
    if slots.len() > config.max_match_slots {
        return Err(StatsError::TooManyMatches {
            given: slots.len(),
            max: config.max_match_slots,
        });
    }

    // Validate everything before touching the output.
    for table in slots.iter().flatten() {
        validate_table(table, config)?;
    }

    let mut merged = MergedTable {
        identity_column: config.identity_column.clone(),
        ..MergedTable::default()
    };
    let mut header_pos: HashMap<String, usize> = HashMap::new();

    for (idx, table) in slots.into_iter().enumerate() {
        let Some(table) = table else { continue };
        let slot = idx + 1;
        let label = match_label(slot);

        let mapping: Vec<usize> = table
            .headers
            .iter()
            .map(|h| {
                *header_pos.entry(h.clone()).or_insert_with(|| {
                    merged.headers.push(h.clone());
                    merged.headers.len() - 1
                })
            })
            .collect();
        let identity_idx = table.column_index(&config.identity_column);

        debug!(
            source = %table.source_name,
            match_label = %label,
            rows = table.len(),
            "merging match table"
        );
        for row in table.into_rows() {
            let player = identity_idx
                .and_then(|i| row.get(i))
                .and_then(CellValue::as_key);
            let mut cells = Vec::with_capacity(mapping.len());
            for (src, cell) in row.into_iter().enumerate() {
                let Some(&dst) = mapping.get(src) else {
                    continue;
                };
                if cells.len() <= dst {
                    cells.resize(dst + 1, CellValue::Missing);
                }
                cells[dst] = cell;
            }
            merged.rows.push(MergedRow {
                match_label: label.clone(),
                slot,
                player,
                cells,
            });
        }
        merged.match_labels.push(label);
    }

    // Earlier rows predate columns introduced by later tables.
    let width = merged.headers.len();
    for row in &mut merged.rows {
        row.cells.resize(width, CellValue::Missing);
    }

    debug!(
        matches = merged.match_labels.len(),
        rows = merged.rows.len(),
        columns = width,
        "merge complete"
    );
    Ok(merged)
}
