use std::path::PathBuf;

use tracking_stats::comparison::{compare_players, scatter_series};
use tracking_stats::config::StatsConfig;
use tracking_stats::distance::distance_breakdown;
use tracking_stats::table::RawMatchTable;
use tracking_stats::trends::{PlayerTrendMode, TrendMode, player_stat_trend, team_stat_trend};
use tracking_stats::{StatsError, StatsPipeline, StatsReport};

fn load_fixture(name: &str) -> RawMatchTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    RawMatchTable::from_path(&path).expect("fixture should load")
}

/// Matches uploaded in slots 1 and 3, slot 2 left empty.
fn report_with_gap() -> StatsReport {
    StatsPipeline::new(StatsConfig::default())
        .run(vec![
            Some(load_fixture("match1.csv")),
            None,
            Some(load_fixture("match2.csv")),
        ])
        .expect("pipeline should succeed")
        .into_report()
        .expect("report should be ready")
}

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn team_trend_totals_and_means_per_match() {
    let report = report_with_gap();
    let total = team_stat_trend(&report.merged, "km_covered", TrendMode::Total).unwrap();
    let labels: Vec<&str> = total.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["M1", "M3"]);
    assert!(approx(total.points[0].value, 26.7));
    assert!(approx(total.points[1].value, 27.6));
    assert_eq!(total.title, "Total Km covered Covered by Team Across Matches");

    let mean = team_stat_trend(&report.merged, "km_covered", TrendMode::PerPlayer).unwrap();
    assert!(approx(mean.points[0].value, 26.7 / 4.0));
}

#[test]
fn team_trend_unknown_stat() {
    let report = report_with_gap();
    let err = team_stat_trend(&report.merged, "xA", TrendMode::Total).unwrap_err();
    assert!(matches!(err, StatsError::UnknownAttribute { ref column } if column == "xA"));
}

#[test]
fn trends_reject_text_columns() {
    let report = report_with_gap();
    for stat in ["Position", "Player"] {
        let err = team_stat_trend(&report.merged, stat, TrendMode::Total).unwrap_err();
        assert!(matches!(err, StatsError::UnknownAttribute { ref column } if column == stat));
    }
    let err = player_stat_trend(
        &report.merged,
        &report.per90,
        "Rossi",
        "Position",
        PlayerTrendMode::Match,
    )
    .unwrap_err();
    assert!(matches!(err, StatsError::UnknownAttribute { .. }));
}

#[test]
fn player_trend_per_match_and_per90() {
    let report = report_with_gap();
    let by_match = player_stat_trend(
        &report.merged,
        &report.per90,
        "Rossi",
        "xG",
        PlayerTrendMode::Match,
    )
    .unwrap();
    assert_eq!(by_match.points.len(), 2);
    assert_eq!(by_match.points[1].label, "M3");
    assert!(approx(by_match.points[0].value, 0.8));

    let per90 = player_stat_trend(
        &report.merged,
        &report.per90,
        "Rossi",
        "xG",
        PlayerTrendMode::Per90,
    )
    .unwrap();
    assert_eq!(per90.points.len(), 1);
    assert!(approx(per90.points[0].value, 1.3 / 150.0 * 90.0));

    let err = player_stat_trend(
        &report.merged,
        &report.per90,
        "Neri",
        "xG",
        PlayerTrendMode::Per90,
    )
    .unwrap_err();
    assert!(matches!(err, StatsError::DivisionByZero(_)));

    let err = player_stat_trend(
        &report.merged,
        &report.per90,
        "Nobody",
        "xG",
        PlayerTrendMode::Match,
    )
    .unwrap_err();
    assert!(matches!(err, StatsError::UnknownPlayer { .. }));
}

#[test]
fn comparison_needs_three_attributes() {
    let report = report_with_gap();
    let err = compare_players(&report, "Rossi", "Bianchi", &["xG", "xT"], 3).unwrap_err();
    assert!(matches!(
        err,
        StatsError::TooFewAttributes {
            required: 3,
            given: 2
        }
    ));
}

#[test]
fn comparison_reports_each_attribute() {
    let report = report_with_gap();
    let cmp = compare_players(
        &report,
        "Rossi",
        "Neri",
        &["km_covered", "max_speed", "xG"],
        3,
    )
    .unwrap();
    assert_eq!(cmp.attributes.len(), 3);

    let km = &cmp.attributes[0];
    assert_eq!(km.label, "km_covered (per 90)");
    assert!(approx(km.first.combined, 16.8));
    assert!(approx(km.first.per90, 16.8 / 150.0 * 90.0));
    // Zero-minute player: total is known, per-90 is not.
    assert_eq!(km.second.combined, Some(0.0));
    assert_eq!(km.second.per90, None);

    let speed = &cmp.attributes[1];
    assert_eq!(speed.label, "max_speed");
    assert_eq!(speed.first.combined, speed.first.per90);
    assert!(approx(speed.first.percentile, 100.0));
    assert_eq!(speed.second.percentile, None);
}

#[test]
fn comparison_unknown_attribute_or_player() {
    let report = report_with_gap();
    let err = compare_players(&report, "Rossi", "Verdi", &["xG", "xT", "goals"], 3).unwrap_err();
    assert!(matches!(err, StatsError::UnknownAttribute { ref column } if column == "goals"));

    let err = compare_players(&report, "Rossi", "Ghost", &["xG", "xT", "km_covered"], 3)
        .unwrap_err();
    assert!(matches!(err, StatsError::UnknownPlayer { ref player } if player == "Ghost"));
}

#[test]
fn scatter_skips_undefined_and_marks_highlights() {
    let report = report_with_gap();
    let series = scatter_series(&report, "xG", "xT", &["Rossi"]).unwrap();
    assert_eq!(series.title, "xT vs xG");
    let players: Vec<&str> = series.points.iter().map(|p| p.player.as_str()).collect();
    assert_eq!(players, vec!["Bianchi", "Rossi", "Verdi"]);
    let rossi = series.points.iter().find(|p| p.player == "Rossi").unwrap();
    assert!(rossi.highlighted);
    assert!(series.points.iter().filter(|p| p.highlighted).count() == 1);

    assert!(matches!(
        scatter_series(&report, "xG", "assists", &[]),
        Err(StatsError::UnknownAttribute { .. })
    ));
}

#[test]
fn distance_breakdown_rows_sorted_by_player() {
    let report = report_with_gap();
    let rows = distance_breakdown(&report.merged).unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0].player, "Bianchi");
    assert_eq!(rows[0].match_label, "M1");
    assert_eq!(rows[1].match_label, "M3");
    assert_eq!(rows[0].bands.len(), 6);
    assert_eq!(rows[0].bands[0].band, "Standing");
    assert!((rows[0].total_meters() - 11400.0).abs() < 1e-9);
}

#[test]
fn distance_breakdown_requires_band_columns() {
    let report = StatsPipeline::new(StatsConfig::default())
        .run(vec![Some(
            RawMatchTable::from_reader("m.csv", "Player,Minutes,km_covered\nA,90,9\n".as_bytes())
                .unwrap(),
        )])
        .unwrap()
        .into_report()
        .unwrap();
    let err = distance_breakdown(&report.merged).unwrap_err();
    match err {
        StatsError::MissingColumns { missing, .. } => assert_eq!(missing.len(), 6),
        other => panic!("unexpected error: {other:?}"),
    }
}
