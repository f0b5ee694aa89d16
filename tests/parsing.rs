use std::fs;
use std::path::PathBuf;

use fixture_insights::enriched_json::parse_enriched_matches_json;
use fixture_insights::stats::{OpaqueValue, Section, Side};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_enriched_matches_fixture() {
    let raw = read_fixture("enriched_matches.json");
    let rows = parse_enriched_matches_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 3);

    let first = &rows[0];
    assert_eq!(first.id, "pl-1");
    assert_eq!(first.competition_name(), Some("Premier League"));
    assert!(first.kickoff.is_some());
    assert_eq!(first.status, OpaqueValue::Text("NS".to_string()));
    assert_eq!(first.table.items().len(), 2);
    assert_eq!(first.home_recent.items().len(), 5);
    assert_eq!(first.head_to_head.items().len(), 4);
    assert_eq!(first.markets.items().len(), 4);
    assert!(first.home_summary.is_present());
    assert_eq!(first.away_summary, Section::Absent);
    assert_eq!(first.home_recent.items()[0].first_goal, Some(Side::Home));

    let third = &rows[2];
    assert_eq!(third.status, OpaqueValue::Number(3.0));
    assert_eq!(third.ground, OpaqueValue::Null);
    assert_eq!(third.competition_name(), None);
    assert_eq!(third.head_to_head, Section::Present(Vec::new()));
    assert_eq!(third.markets, Section::Absent);
    assert_eq!(third.home_recent, Section::Absent);
}

#[test]
fn single_object_is_one_fixture() {
    let raw = r#"{"id":"solo","homeTeam":{"id":"h"},"awayTeam":{"id":"a"}}"#;
    let rows = parse_enriched_matches_json(raw).expect("object should parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "solo");
}

#[test]
fn null_and_blank_are_empty() {
    assert!(parse_enriched_matches_json("null").unwrap().is_empty());
    assert!(parse_enriched_matches_json("  ").unwrap().is_empty());
}

#[test]
fn scalar_root_is_an_error() {
    let err = parse_enriched_matches_json("42").unwrap_err();
    assert!(err.to_string().contains("number"));
}

#[test]
fn bad_entry_reports_index() {
    let raw = r#"[{"id":"ok","homeTeam":{"id":"h"},"awayTeam":{"id":"a"}},{"id":"broken"}]"#;
    let err = parse_enriched_matches_json(raw).unwrap_err();
    assert!(format!("{err:#}").contains("index 1"));
}
