use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::table::{CellValue, RawMatchTable};

/// Check that `table` carries every column in `required`.
pub fn validate_columns(table: &RawMatchTable, required: &[String]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !table.has_column(col))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StatsError::Schema {
            source_name: table.source_name.clone(),
            missing,
        })
    }
}

/// Full pre-merge check: required columns, then minutes cells must be empty or
/// a non-negative number.
pub fn validate_table(table: &RawMatchTable, config: &StatsConfig) -> Result<()> {
    validate_columns(table, &config.effective_required_columns())?;

    let Some(minutes_idx) = table.column_index(&config.minutes_column) else {
        return Ok(());
    };
    for (row_idx, row) in table.rows().iter().enumerate() {
        let Some(cell) = row.get(minutes_idx) else {
            continue;
        };
        let bad = match cell {
            CellValue::Missing => false,
            CellValue::Number(v) => !v.is_finite() || *v < 0.0,
            CellValue::Text(_) => true,
        };
        if bad {
            return Err(StatsError::InvalidValue {
                source_name: table.source_name.clone(),
                column: config.minutes_column.clone(),
                row: row_idx + 1,
                value: match cell {
                    CellValue::Number(v) => v.to_string(),
                    CellValue::Text(s) => s.clone(),
                    CellValue::Missing => String::new(),
                },
            });
        }
    }
    Ok(())
}
