use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use tracking_stats::config::StatsConfig;
use tracking_stats::schema::validate_table;
use tracking_stats::table::RawMatchTable;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let (config_path, files) = parse_args();
    let config = match config_path {
        Some(path) => StatsConfig::load(&path)?,
        None => StatsConfig::from_env().context("load stats config")?,
    };

    println!(
        "Required columns: {}",
        config.effective_required_columns().join(", ")
    );
    let mut failures = 0usize;
    for path in &files {
        let result = RawMatchTable::from_path(path).and_then(|table| {
            validate_table(&table, &config)?;
            Ok(table.len())
        });
        match result {
            Ok(rows) => println!("OK   {} ({rows} rows)", path.display()),
            Err(err) => {
                failures += 1;
                println!("FAIL {}: {err}", path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} files failed validation", files.len());
    }
    Ok(())
}

fn parse_args() -> (Option<PathBuf>, Vec<PathBuf>) {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = None;
    let mut files = Vec::new();
    let mut idx = 0;
    while idx < args.len() {
        let arg = &args[idx];
        if let Some(path) = arg.strip_prefix("--config=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                config = Some(PathBuf::from(trimmed));
            }
        } else if arg == "--config" {
            if let Some(next) = args.get(idx + 1) {
                config = Some(PathBuf::from(next));
                idx += 1;
            }
        } else {
            files.push(PathBuf::from(arg));
        }
        idx += 1;
    }
    (config, files)
}
