use std::path::PathBuf;

use thiserror::Error;

/// A cumulative per-90 cell for a player whose aggregated minutes are zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("per-90 value for {player} / {column} is undefined: player has zero minutes")]
pub struct DivisionByZero {
    pub player: String,
    pub column: String,
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("CSV file '{source_name}' must contain at least these columns: {}", .missing.join(", "))]
    Schema {
        source_name: String,
        missing: Vec<String>,
    },

    #[error("invalid value {value:?} in '{source_name}' column {column} (row {row})")]
    InvalidValue {
        source_name: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    DivisionByZero(#[from] DivisionByZero),

    #[error("unknown attribute: {column}")]
    UnknownAttribute { column: String },

    #[error("unknown player: {player}")]
    UnknownPlayer { player: String },

    #[error("select at least {required} attributes for comparison (got {given})")]
    TooFewAttributes { required: usize, given: usize },

    #[error("too many match slots: {given} (max {max})")]
    TooManyMatches { given: usize, max: usize },

    #[error("{what} requires missing columns: {}", .missing.join(", "))]
    MissingColumns {
        what: &'static str,
        missing: Vec<String>,
    },

    #[error("CSV error in '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StatsError {
    pub fn unknown_attribute(column: &str) -> Self {
        StatsError::UnknownAttribute {
            column: column.to_string(),
        }
    }

    pub fn unknown_player(player: &str) -> Self {
        StatsError::UnknownPlayer {
            player: player.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
