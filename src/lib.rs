pub mod aggregate;
pub mod classify;
pub mod comparison;
pub mod config;
pub mod distance;
pub mod error;
pub mod export;
pub mod merge;
pub mod per90;
pub mod percentile;
pub mod pipeline;
pub mod schema;
pub mod stats_table;
pub mod table;
pub mod trends;

pub use error::{DivisionByZero, Result, StatsError};
pub use pipeline::{PipelineOutput, StatsPipeline, StatsReport};
