use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::head_to_head::{HeadToHeadSummary, analyze_head_to_head};
use crate::odds::{OddsSnapshot, extract_odds, implied_probabilities};
use crate::predictive::{Favorite, RecentSample, ScoringInputs, score_fixture};
use crate::stats::{EnrichedMatch, TeamRef, round2};
use crate::team_features::{TeamFeatures, extract_team_features};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerStats {
    pub home_avg: Option<f64>,
    pub away_avg: Option<f64>,
    pub combined_avg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringPatterns {
    pub home_scored_first_rate: Option<u32>,
    pub away_scored_first_rate: Option<u32>,
    pub home_first_goal_win_rate: Option<u32>,
    pub away_first_goal_win_rate: Option<u32>,
    pub home_late_goal_rate: Option<u32>,
    pub away_late_goal_rate: Option<u32>,
    /// Home side's BTTS rate in its home matches.
    pub home_btts_rate: Option<u32>,
    /// Away side's BTTS rate in its away matches.
    pub away_btts_rate: Option<u32>,
}

/// Everything the ranking UI needs for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveMatchData {
    pub match_id: String,
    pub competition: Option<String>,
    pub kickoff: Option<DateTime<Utc>>,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_features: TeamFeatures,
    pub away_features: TeamFeatures,
    pub position_gap: i32,
    pub favorite: Favorite,
    pub confidence: Option<u8>,
    pub expected_goals: Option<f64>,
    pub defensive_strength: Option<f64>,
    pub odds: OddsSnapshot,
    pub head_to_head: HeadToHeadSummary,
    pub corners: CornerStats,
    pub scoring_patterns: ScoringPatterns,
    pub reasons: Vec<String>,
}

/// Home position minus away position; 0 when either side is unplaced.
pub fn position_gap(home: &TeamFeatures, away: &TeamFeatures) -> i32 {
    if home.table_position == 0 || away.table_position == 0 {
        return 0;
    }
    home.table_position as i32 - away.table_position as i32
}

pub fn predict_match(fixture: &EnrichedMatch) -> PredictiveMatchData {
    let table = fixture.table.items();
    let home_recent = fixture.home_recent.items();
    let away_recent = fixture.away_recent.items();
    let markets = fixture.markets.items();

    let home_features = extract_team_features(
        &fixture.home_team,
        table,
        fixture.home_summary.as_option(),
        home_recent,
    );
    let away_features = extract_team_features(
        &fixture.away_team,
        table,
        fixture.away_summary.as_option(),
        away_recent,
    );

    let odds = extract_odds(markets);
    let implied = implied_probabilities(markets);
    let head_to_head = analyze_head_to_head(
        fixture.head_to_head.items(),
        &fixture.home_team,
        &fixture.away_team,
    );
    let gap = position_gap(&home_features, &away_features);

    let score = score_fixture(&ScoringInputs {
        odds: &odds,
        implied: &implied,
        markets_available: !markets.is_empty(),
        head_to_head: &head_to_head,
        home: RecentSample::new(&fixture.home_team.id, home_recent),
        away: RecentSample::new(&fixture.away_team.id, away_recent),
        position_gap: gap,
    });

    let corners = corner_stats(&home_features, &away_features);
    let scoring_patterns = scoring_patterns(&home_features, &away_features);

    let mut out = PredictiveMatchData {
        match_id: fixture.id.clone(),
        competition: fixture.competition_name().map(str::to_string),
        kickoff: fixture.kickoff,
        home_team: fixture.home_team.clone(),
        away_team: fixture.away_team.clone(),
        home_features,
        away_features,
        position_gap: gap,
        favorite: score.favorite,
        confidence: score.confidence,
        expected_goals: score.expected_goals,
        defensive_strength: score.defensive_strength,
        odds,
        head_to_head,
        corners,
        scoring_patterns,
        reasons: Vec::new(),
    };
    out.reasons = prediction_reasons(&out);

    tracing::debug!(
        match_id = %out.match_id,
        favorite = out.favorite.label(),
        confidence = ?out.confidence,
        expected_goals = ?out.expected_goals,
        "fixture scored"
    );
    out
}

/// Scores a batch on a dedicated pool. Output order follows input order.
pub fn predict_all(fixtures: &[EnrichedMatch], cfg: &EngineConfig) -> Vec<PredictiveMatchData> {
    let out = with_scoring_pool(cfg.parallelism, || {
        fixtures.par_iter().map(predict_match).collect::<Vec<_>>()
    });
    tracing::info!(
        fixtures = out.len(),
        with_confidence = out.iter().filter(|p| p.confidence.is_some()).count(),
        "batch scored"
    );
    out
}

fn with_scoring_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

/// Highest confidence first; fixtures without a confidence sink to the bottom in input order.
pub fn rank_by_confidence(rows: &mut [PredictiveMatchData]) {
    rows.sort_by(|a, b| match (a.confidence, b.confidence) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn corner_stats(home: &TeamFeatures, away: &TeamFeatures) -> CornerStats {
    let combined_avg = match (home.avg_corners, away.avg_corners) {
        (Some(h), Some(a)) => Some(round2(h + a)),
        _ => None,
    };
    CornerStats {
        home_avg: home.avg_corners,
        away_avg: away.avg_corners,
        combined_avg,
    }
}

fn scoring_patterns(home: &TeamFeatures, away: &TeamFeatures) -> ScoringPatterns {
    ScoringPatterns {
        home_scored_first_rate: home.scored_first_rate,
        away_scored_first_rate: away.scored_first_rate,
        home_first_goal_win_rate: home.first_goal_win_rate,
        away_first_goal_win_rate: away.first_goal_win_rate,
        home_late_goal_rate: home.late_goal_rate,
        away_late_goal_rate: away.late_goal_rate,
        home_btts_rate: home.btts_rate.home,
        away_btts_rate: away.btts_rate.away,
    }
}

/// Short highlights for the UI. Only non-null features produce a line.
pub fn prediction_reasons(p: &PredictiveMatchData) -> Vec<String> {
    let home = p.home_team.display_name();
    let away = p.away_team.display_name();
    let mut out = Vec::new();

    match p.favorite {
        Favorite::Home => out.push(format!(
            "Market favours {home} ({:.2} vs {:.2})",
            p.odds.home, p.odds.away
        )),
        Favorite::Away => out.push(format!(
            "Market favours {away} ({:.2} vs {:.2})",
            p.odds.away, p.odds.home
        )),
        Favorite::Draw => {
            if p.odds.home > 0.0 && p.odds.away > 0.0 {
                out.push("Market sees no clear favourite".to_string());
            }
        }
    }
    if let Some((ph, pd, pa)) = p.odds.no_vig_1x2() {
        out.push(format!(
            "Implied 1X2: {:.0}% / {:.0}% / {:.0}%",
            ph * 100.0,
            pd * 100.0,
            pa * 100.0
        ));
    }

    for (name, features) in [(home, &p.home_features), (away, &p.away_features)] {
        if !features.form.is_empty() {
            out.push(format!("{name} form: {}", features.form));
        }
    }

    let h2h = &p.head_to_head;
    if h2h.matches > 0 {
        out.push(format!(
            "{home} head-to-head: {}W {}D {}L in {} meetings",
            h2h.wins, h2h.draws, h2h.losses, h2h.matches
        ));
    }

    if p.position_gap != 0 {
        let (higher, gap) = if p.position_gap < 0 {
            (home, p.position_gap.unsigned_abs())
        } else {
            (away, p.position_gap.unsigned_abs())
        };
        out.push(format!("{higher} sits {gap} places higher in the table"));
    }

    if let Some(xg) = p.expected_goals {
        out.push(format!("Expected goals: {xg:.2}"));
    }
    if let Some(rate) = p.scoring_patterns.home_scored_first_rate {
        out.push(format!("{home} scores first in {rate}% of matches"));
    }
    if let Some(rate) = p.scoring_patterns.away_scored_first_rate {
        out.push(format!("{away} scores first in {rate}% of matches"));
    }
    if let Some(rate) = p.scoring_patterns.home_btts_rate {
        out.push(format!("Both teams scored in {rate}% of {home} home matches"));
    }
    if let Some(rate) = p.scoring_patterns.away_btts_rate {
        out.push(format!("Both teams scored in {rate}% of {away} away matches"));
    }
    if let Some(corners) = p.corners.combined_avg {
        out.push(format!("Combined corners average: {corners:.2}"));
    }
    if let Some(index) = p.defensive_strength {
        out.push(format!("Defensive strength index: {index:.2}"));
    }

    out
}
