use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

use fixture_insights::config::EngineConfig;
use fixture_insights::enriched_json::parse_enriched_matches_json;
use fixture_insights::league_summary::{UNKNOWN_COMPETITION, aggregate_leagues};
use fixture_insights::prediction::{predict_all, predict_match, rank_by_confidence};
use fixture_insights::stats::EnrichedMatch;

fn recent_match(idx: u32, team: &str, opponent: &str, home: bool) -> Value {
    let (home_id, away_id) = if home { (team, opponent) } else { (opponent, team) };
    let first_goal = if idx % 2 == 0 { "home" } else { "away" };
    json!({
        "id": format!("r{idx}-{team}"),
        "homeTeam": { "id": home_id, "name": home_id.to_uppercase() },
        "awayTeam": { "id": away_id, "name": away_id.to_uppercase() },
        "result": { "homeGoals": idx % 4, "awayGoals": (idx + 1) % 3 },
        "corners": { "home": 3 + idx % 5, "away": 2 + idx % 4 },
        "firstGoal": first_goal,
        "lastGoal": "home",
        "kickoff": format!("2024-0{}-1{}T15:00:00Z", 1 + idx % 9, idx % 10),
    })
}

fn synthetic_fixture(idx: u32) -> Value {
    let home = format!("h{idx}");
    let away = format!("a{idx}");
    let home_recent: Vec<Value> = (0..10)
        .map(|i| recent_match(i, &home, "x", i % 2 == 0))
        .collect();
    let away_recent: Vec<Value> = (0..10)
        .map(|i| recent_match(i + 3, &away, "y", i % 3 == 0))
        .collect();
    let h2h: Vec<Value> = (0..6)
        .map(|i| recent_match(i, &home, &away, i % 2 == 0))
        .collect();
    json!({
        "id": format!("bench-{idx}"),
        "competition": { "id": format!("c{}", idx % 4), "name": format!("League {}", idx % 4) },
        "homeTeam": { "id": home, "name": format!("Home Club {idx}") },
        "awayTeam": { "id": away, "name": format!("Away Club {idx}") },
        "table": [
            { "teamId": home, "position": 1 + idx % 20, "played": 10, "points": 20 },
            { "teamId": away, "position": 1 + (idx * 7) % 20, "played": 10, "points": 15 }
        ],
        "homeRecent": home_recent,
        "awayRecent": away_recent,
        "headToHead": h2h,
        "markets": [
            { "name": "1X2", "outcomes": [
                { "description": "Home", "price": "2.10" },
                { "description": "Draw", "price": "3.30" },
                { "description": "Away", "price": "3.60" }
            ]},
            { "name": "Over/Under", "specifier": "total=2.5", "outcomes": [
                { "description": "Over 2.5", "price": "1.90", "probability": "0.52" },
                { "description": "Under 2.5", "price": "1.95", "probability": "0.48" }
            ]}
        ],
        "homeSummary": {
            "played": { "home": 5, "away": 5 },
            "scored": { "home": 9, "away": 6 },
            "conceded": { "home": 4, "away": 7 }
        }
    })
}

fn synthetic_batch(n: u32) -> Vec<EnrichedMatch> {
    let raw = Value::Array((0..n).map(synthetic_fixture).collect()).to_string();
    parse_enriched_matches_json(&raw).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let raw = Value::Array((0..50).map(synthetic_fixture).collect()).to_string();
    c.bench_function("enriched_json_parse", |b| {
        b.iter(|| {
            let rows = parse_enriched_matches_json(black_box(&raw)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_predict_match(c: &mut Criterion) {
    let fixtures = synthetic_batch(1);
    c.bench_function("predict_match", |b| {
        b.iter(|| {
            let p = predict_match(black_box(&fixtures[0]));
            black_box(p.confidence);
        })
    });
}

fn bench_predict_all(c: &mut Criterion) {
    let fixtures = synthetic_batch(200);
    let cfg = EngineConfig::default();
    c.bench_function("predict_all_200", |b| {
        b.iter(|| {
            let mut rows = predict_all(black_box(&fixtures), &cfg);
            rank_by_confidence(&mut rows);
            black_box(rows.len());
        })
    });
}

fn bench_league_aggregation(c: &mut Criterion) {
    let fixtures = synthetic_batch(200);
    c.bench_function("aggregate_leagues_200", |b| {
        b.iter(|| {
            let leagues = aggregate_leagues(black_box(&fixtures), UNKNOWN_COMPETITION);
            black_box(leagues.len());
        })
    });
}

criterion_group!(
    perf,
    bench_parse,
    bench_predict_match,
    bench_predict_all,
    bench_league_aggregation
);
criterion_main!(perf);
