use serde::{Deserialize, Serialize};

use crate::head_to_head::HeadToHeadSummary;
use crate::odds::{ImpliedProbabilities, OddsSnapshot};
use crate::stats::{HistoricalMatch, Outcome, Side, mean, most_recent_first, round2};

const W_ODDS: f64 = 0.4;
const W_H2H: f64 = 0.2;
const W_FORM: f64 = 0.3;
const W_POSITION: f64 = 0.1;

const H2H_SCALE: f64 = 25.0;
const FORM_SCALE: f64 = 5.0;
const POSITION_SCALE: f64 = 3.0;
const POSITION_CAP: f64 = 20.0;

const FORM_WINDOW: usize = 5;
const VENUE_WINDOW: usize = 5;
const DEFENSE_WINDOW: usize = 10;
const CLEAN_SHEET_FACTOR: f64 = 0.2;

const XG_WEIGHT_OVER_2_5: f64 = 0.6;
const XG_WEIGHT_OVER_1_5: f64 = 0.4;
const XG_MIN_MARKET_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Favorite {
    Home,
    Away,
    Draw,
}

impl Favorite {
    pub fn label(self) -> &'static str {
        match self {
            Favorite::Home => "home",
            Favorite::Away => "away",
            Favorite::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveScore {
    pub favorite: Favorite,
    /// 0..=100, `None` when markets, head-to-head or either recent list is missing.
    pub confidence: Option<u8>,
    pub expected_goals: Option<f64>,
    /// Lower is stronger; 1.0 is roughly a league-average defence.
    pub defensive_strength: Option<f64>,
}

/// One team's recent matches, read from that team's own role in each.
#[derive(Debug, Clone, Copy)]
pub struct RecentSample<'a> {
    pub team_id: &'a str,
    pub matches: &'a [HistoricalMatch],
}

impl<'a> RecentSample<'a> {
    pub fn new(team_id: &'a str, matches: &'a [HistoricalMatch]) -> Self {
        Self { team_id, matches }
    }

    /// Most-recent-first, limited to matches the team played in.
    fn played(self) -> impl Iterator<Item = (&'a HistoricalMatch, Side)> {
        let team_id = self.team_id;
        most_recent_first(self.matches)
            .into_iter()
            .filter_map(move |m| m.side_of(team_id).map(|side| (m, side)))
    }

    fn wins_in_last(&self, n: usize) -> u32 {
        self.played()
            .take(n)
            .filter(|(m, side)| m.outcome_for(*side) == Outcome::Win)
            .count() as u32
    }

    /// Mean total goals over the last `n` matches played at `venue`.
    fn venue_goal_average(&self, venue: Side, n: usize) -> Option<f64> {
        let totals: Vec<f64> = self
            .played()
            .filter(|(_, side)| *side == venue)
            .take(n)
            .filter_map(|(m, _)| m.result.total_goals())
            .map(|g| g as f64)
            .collect();
        mean(&totals)
    }

    fn defensive_value(&self, n: usize) -> Option<f64> {
        let conceded: Vec<u32> = self
            .played()
            .take(n)
            .filter_map(|(m, side)| m.goals_against(side))
            .collect();
        if conceded.is_empty() {
            return None;
        }
        let total: u64 = conceded.iter().map(|g| u64::from(*g)).sum();
        let avg = total as f64 / conceded.len() as f64;
        let clean_sheets = conceded.iter().filter(|g| **g == 0).count() as f64;
        Some(avg / (1.0 + CLEAN_SHEET_FACTOR * clean_sheets))
    }
}

pub struct ScoringInputs<'a> {
    pub odds: &'a OddsSnapshot,
    pub implied: &'a ImpliedProbabilities,
    pub markets_available: bool,
    pub head_to_head: &'a HeadToHeadSummary,
    pub home: RecentSample<'a>,
    pub away: RecentSample<'a>,
    /// Home table position minus away table position.
    pub position_gap: i32,
}

pub fn score_fixture(inputs: &ScoringInputs<'_>) -> PredictiveScore {
    PredictiveScore {
        favorite: favorite(inputs.odds),
        confidence: confidence(inputs),
        expected_goals: expected_goals(inputs.implied, &inputs.home, &inputs.away),
        defensive_strength: defensive_strength(&inputs.home, &inputs.away),
    }
}

pub fn favorite(odds: &OddsSnapshot) -> Favorite {
    if odds.home <= 0.0 || odds.away <= 0.0 || odds.home == odds.away {
        Favorite::Draw
    } else if odds.home < odds.away {
        Favorite::Home
    } else {
        Favorite::Away
    }
}

pub fn odds_confidence(odds: &OddsSnapshot) -> f64 {
    let ratio = if odds.home > 0.0 && odds.away > 0.0 {
        odds.home.min(odds.away) / odds.home.max(odds.away)
    } else {
        0.5
    };
    100.0 * (1.0 - ratio)
}

fn confidence(inputs: &ScoringInputs<'_>) -> Option<u8> {
    let h2h = inputs.head_to_head;
    if !inputs.markets_available
        || h2h.matches == 0
        || inputs.home.matches.is_empty()
        || inputs.away.matches.is_empty()
    {
        return None;
    }

    let odds_part = odds_confidence(inputs.odds);
    let h2h_part = H2H_SCALE * f64::from(h2h.wins.max(h2h.losses)) / f64::from(h2h.matches);
    let form_gap = inputs
        .home
        .wins_in_last(FORM_WINDOW)
        .abs_diff(inputs.away.wins_in_last(FORM_WINDOW));
    let form_part = FORM_SCALE * f64::from(form_gap);
    let position_part =
        (POSITION_SCALE * f64::from(inputs.position_gap.unsigned_abs())).min(POSITION_CAP);

    Some(blend_confidence(odds_part, h2h_part, form_part, position_part))
}

/// Weighted blend of the four confidence components, rounded and clamped to `0..=100`.
pub fn blend_confidence(odds: f64, h2h: f64, form: f64, position: f64) -> u8 {
    let raw = W_ODDS * odds + W_H2H * h2h + W_FORM * form + W_POSITION * position;
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

pub fn expected_goals(
    implied: &ImpliedProbabilities,
    home: &RecentSample<'_>,
    away: &RecentSample<'_>,
) -> Option<f64> {
    let mut acc = 0.0;
    let mut weight = 0.0;

    if let Some(p) = implied.over_2_5 {
        acc += (2.5 + 1.5 * p) * XG_WEIGHT_OVER_2_5;
        weight += XG_WEIGHT_OVER_2_5;
    }
    if let Some(q) = implied.over_1_5 {
        acc += (1.5 + 1.5 * q) * XG_WEIGHT_OVER_1_5;
        weight += XG_WEIGHT_OVER_1_5;
    }

    if weight < XG_MIN_MARKET_WEIGHT {
        let venue_avgs: Vec<f64> = [
            home.venue_goal_average(Side::Home, VENUE_WINDOW),
            away.venue_goal_average(Side::Away, VENUE_WINDOW),
        ]
        .into_iter()
        .flatten()
        .collect();
        if let Some(hist) = mean(&venue_avgs) {
            acc = hist;
            weight = 1.0;
        }
    }

    if weight <= 0.0 {
        return None;
    }
    Some(round2(acc / weight))
}

pub fn defensive_strength(home: &RecentSample<'_>, away: &RecentSample<'_>) -> Option<f64> {
    let h = home.defensive_value(DEFENSE_WINDOW)?;
    let a = away.defensive_value(DEFENSE_WINDOW)?;
    Some(round2((h + a) / 2.0))
}
