use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stats::{EnrichedMatch, Verdict, rate_pct, round2};

pub const UNKNOWN_COMPETITION: &str = "Unknown competition";

/// Per-competition rollup over every head-to-head meeting of its fixtures.
///
/// Rates are percentages and read `0` when no meetings were observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub competition: String,
    pub fixtures: usize,
    /// Historical meetings observed across the fixtures; the denominator of every rate.
    pub matches: usize,
    pub avg_goals: f64,
    pub home_win_rate: u32,
    pub draw_rate: u32,
    pub away_win_rate: u32,
    pub btts_rate: u32,
}

pub fn group_by_competition<'a>(
    fixtures: &'a [EnrichedMatch],
    unknown_label: &str,
) -> BTreeMap<String, Vec<&'a EnrichedMatch>> {
    let mut groups: BTreeMap<String, Vec<&EnrichedMatch>> = BTreeMap::new();
    for fixture in fixtures {
        let key = fixture.competition_name().unwrap_or(unknown_label).to_string();
        groups.entry(key).or_default().push(fixture);
    }
    groups
}

pub fn summarize_competition(competition: &str, fixtures: &[&EnrichedMatch]) -> LeagueSummary {
    let mut matches = 0usize;
    let mut goals = 0u64;
    let mut home_wins = 0usize;
    let mut draws = 0usize;
    let mut away_wins = 0usize;
    let mut btts = 0usize;

    for fixture in fixtures {
        let meetings = fixture.head_to_head.items();
        if meetings.is_empty() {
            continue;
        }
        for m in meetings {
            matches += 1;
            goals += m.result.total_goals().unwrap_or(0);
            match m.result.verdict() {
                Verdict::HomeWin => home_wins += 1,
                Verdict::Draw => draws += 1,
                Verdict::AwayWin => away_wins += 1,
            }
            if m.result.both_scored() == Some(true) {
                btts += 1;
            }
        }
    }

    let avg_goals = if matches == 0 {
        0.0
    } else {
        round2(goals as f64 / matches as f64)
    };

    LeagueSummary {
        competition: competition.to_string(),
        fixtures: fixtures.len(),
        matches,
        avg_goals,
        home_win_rate: rate_pct(home_wins, matches).unwrap_or(0),
        draw_rate: rate_pct(draws, matches).unwrap_or(0),
        away_win_rate: rate_pct(away_wins, matches).unwrap_or(0),
        btts_rate: rate_pct(btts, matches).unwrap_or(0),
    }
}

pub fn aggregate_leagues(
    fixtures: &[EnrichedMatch],
    unknown_label: &str,
) -> BTreeMap<String, LeagueSummary> {
    let out: BTreeMap<String, LeagueSummary> = group_by_competition(fixtures, unknown_label)
        .into_iter()
        .map(|(name, group)| {
            let summary = summarize_competition(&name, &group);
            (name, summary)
        })
        .collect();
    tracing::info!(competitions = out.len(), fixtures = fixtures.len(), "league summaries built");
    out
}
