use std::fs;
use std::path::PathBuf;

use tracking_stats::config::StatsConfig;
use tracking_stats::export::{
    SheetCell, sheet_rows, table_rows, to_json, write_json, write_workbook,
};
use tracking_stats::table::RawMatchTable;
use tracking_stats::{StatsPipeline, StatsReport};

fn report() -> StatsReport {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("match1.csv");
    let table = RawMatchTable::from_path(&path).expect("fixture should load");
    StatsPipeline::new(StatsConfig::default())
        .run(vec![Some(table)])
        .expect("pipeline should succeed")
        .into_report()
        .expect("report should be ready")
}

#[test]
fn json_marks_undefined_per90_cells() {
    let report = report();
    let raw = to_json(&report).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(doc["generated_at"].as_str().is_some_and(|s| s.ends_with('Z')));
    assert_eq!(doc["matches"], serde_json::json!(["M1"]));

    let players = doc["per90"]["players"].as_array().unwrap();
    let neri = players.iter().position(|p| p == "Neri").unwrap();
    let metrics = doc["per90"]["metrics"].as_array().unwrap();
    let km = metrics
        .iter()
        .position(|m| m["name"] == "km_covered")
        .unwrap();
    assert_eq!(metrics[km]["kind"], "cumulative");
    assert_eq!(doc["per90"]["cells"][neri][km], "undefined");
    assert!(doc.get("merged").is_none());
}

#[test]
fn json_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");
    write_json(&report(), &path).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"combined_percentiles\""));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn workbook_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.xlsx");
    let summary = write_workbook(&report(), &path).unwrap();
    assert_eq!(summary.players, 4);
    assert!(summary.undefined_cells > 0);
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn table_rows_have_header_and_player_column() {
    let report = report();
    let rows = table_rows(&report.combined, |c| c.map(|v| format!("{v}")));
    assert_eq!(rows.len(), report.combined.len() + 1);
    assert_eq!(rows[0][0], "Player");
    assert_eq!(rows[0].len(), report.combined.metrics.len() + 1);
    assert_eq!(rows[1][0], "Bianchi");
}

#[test]
fn sheet_rows_keep_full_precision() {
    let report = report();
    let rows = sheet_rows(&report.per90, |c| SheetCell::from(c));
    let col = report.per90.column_index("xG").unwrap();
    let row = report.per90.row_index("Rossi").unwrap();
    let expected = report.per90.value("Rossi", "xG").unwrap().unwrap();
    assert_eq!(rows[row + 1][col + 1], SheetCell::Number(expected));

    let tiny = SheetCell::from(Some(0.004));
    assert_eq!(tiny, SheetCell::Number(0.004));
    assert_eq!(SheetCell::from(None::<f64>), SheetCell::Empty);

    let neri = report.per90.row_index("Neri").unwrap();
    let km = report.per90.column_index("km_covered").unwrap();
    assert_eq!(rows[neri + 1][km + 1], SheetCell::Text("undefined".to_string()));
}
