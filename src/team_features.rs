use serde::{Deserialize, Serialize};

use crate::stats::{
    HistoricalMatch, Outcome, ScoringSummary, Side, TableRow, TeamRef, Venue, VenueCounts,
    most_recent_first, rate_pct, round2,
};

const FORM_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueAverages {
    pub home: Option<f64>,
    pub away: Option<f64>,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueTally {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRates {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

/// Flat per-team features for one fixture. Rebuilt on every scoring request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFeatures {
    pub team_id: String,
    pub team_name: String,
    /// 0 when the team is not in the table slice.
    pub table_position: u32,
    /// Recent matches the team actually took part in.
    pub matches: usize,
    pub avg_goals_scored: VenueAverages,
    pub avg_goals_conceded: VenueAverages,
    pub over_1_5: VenueTally,
    pub clean_sheets: VenueTally,
    pub btts_rate: VenueRates,
    /// Most-recent-first W/D/L, at most five characters.
    pub form: String,
    pub home_form: String,
    pub away_form: String,
    pub scored_first_rate: Option<u32>,
    pub first_goal_win_rate: Option<u32>,
    pub late_goal_rate: Option<u32>,
    pub late_goal_win_rate: Option<u32>,
    pub avg_corners: Option<f64>,
}

pub fn table_position(team_id: &str, table: &[TableRow]) -> u32 {
    table
        .iter()
        .find(|row| row.team_id == team_id)
        .map(|row| row.position)
        .unwrap_or(0)
}

pub fn extract_team_features(
    team: &TeamRef,
    table: &[TableRow],
    summary: Option<&ScoringSummary>,
    recent: &[HistoricalMatch],
) -> TeamFeatures {
    let mut out = TeamFeatures {
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        table_position: table_position(&team.id, table),
        ..TeamFeatures::default()
    };

    if let Some(summary) = summary {
        out.avg_goals_scored = venue_averages(&summary.played, &summary.scored);
        out.avg_goals_conceded = venue_averages(&summary.played, &summary.conceded);
    }

    let mut home_matches = 0usize;
    let mut away_matches = 0usize;
    let mut btts_home = 0usize;
    let mut btts_away = 0usize;
    let mut first_tagged = 0usize;
    let mut scored_first = 0usize;
    let mut scored_first_wins = 0usize;
    let mut last_tagged = 0usize;
    let mut scored_last = 0usize;
    let mut scored_last_wins = 0usize;
    let mut corners_sum = 0u64;

    for m in most_recent_first(recent) {
        let Some(side) = m.side_of(&team.id) else {
            tracing::debug!(team = %team.id, match_id = ?m.id, "team not in match, skipping");
            continue;
        };
        out.matches += 1;
        let outcome = m.outcome_for(side);
        let letter = outcome.letter();

        if out.form.len() < FORM_LEN {
            out.form.push(letter);
        }
        match side {
            Side::Home => {
                home_matches += 1;
                if out.home_form.len() < FORM_LEN {
                    out.home_form.push(letter);
                }
            }
            Side::Away => {
                away_matches += 1;
                if out.away_form.len() < FORM_LEN {
                    out.away_form.push(letter);
                }
            }
        }

        if m.result.total_goals().is_some_and(|g| g > 1) {
            bump(&mut out.over_1_5, side);
        }
        if m.goals_against(side) == Some(0) {
            bump(&mut out.clean_sheets, side);
        }
        if m.result.both_scored() == Some(true) {
            match side {
                Side::Home => btts_home += 1,
                Side::Away => btts_away += 1,
            }
        }

        if let Some(first) = m.first_goal {
            first_tagged += 1;
            if first == side {
                scored_first += 1;
                if outcome == Outcome::Win {
                    scored_first_wins += 1;
                }
            }
        }
        if let Some(last) = m.last_goal {
            last_tagged += 1;
            if last == side {
                scored_last += 1;
                if outcome == Outcome::Win {
                    scored_last_wins += 1;
                }
            }
        }

        corners_sum += u64::from(m.corners_for(side).unwrap_or(0));
    }

    out.btts_rate = VenueRates {
        home: rate_pct(btts_home, home_matches),
        away: rate_pct(btts_away, away_matches),
    };
    out.scored_first_rate = rate_pct(scored_first, first_tagged);
    out.first_goal_win_rate = rate_pct(scored_first_wins, scored_first);
    out.late_goal_rate = rate_pct(scored_last, last_tagged);
    out.late_goal_win_rate = rate_pct(scored_last_wins, scored_last);
    out.avg_corners = if out.matches == 0 {
        None
    } else {
        Some(round2(corners_sum as f64 / out.matches as f64))
    };

    out
}

fn bump(tally: &mut VenueTally, side: Side) {
    match side {
        Side::Home => tally.home += 1,
        Side::Away => tally.away += 1,
    }
}

fn venue_averages(played: &VenueCounts, goals: &VenueCounts) -> VenueAverages {
    let avg = |venue: Venue| -> Option<f64> {
        let played = played.get(venue)?;
        if played == 0 {
            return None;
        }
        Some(round2(goals.get(venue)? as f64 / played as f64))
    };
    VenueAverages {
        home: avg(Venue::Home),
        away: avg(Venue::Away),
        total: avg(Venue::Total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CornerCounts, MatchResult};

    fn game(home: &str, away: &str, hg: u32, ag: u32) -> HistoricalMatch {
        HistoricalMatch {
            id: None,
            competition: None,
            home_team: TeamRef::new(home, home),
            away_team: TeamRef::new(away, away),
            result: MatchResult {
                home_goals: Some(hg),
                away_goals: Some(ag),
                winner: None,
            },
            corners: None,
            first_goal: None,
            last_goal: None,
            kickoff: None,
        }
    }

    #[test]
    fn form_is_capped_at_five() {
        let team = TeamRef::new("t", "Team");
        let recent: Vec<_> = (0..50).map(|i| game("t", &format!("o{i}"), 1, 0)).collect();
        let f = extract_team_features(&team, &[], None, &recent);
        assert_eq!(f.form, "WWWWW");
        assert_eq!(f.home_form.len(), 5);
        assert!(f.away_form.is_empty());
        assert_eq!(f.matches, 50);
    }

    #[test]
    fn home_form_counts_only_home_appearances() {
        let team = TeamRef::new("t", "Team");
        let mut recent = Vec::new();
        for _ in 0..6 {
            recent.push(game("o", "t", 2, 0));
        }
        recent.push(game("t", "o", 1, 1));
        let f = extract_team_features(&team, &[], None, &recent);
        assert_eq!(f.form, "LLLLL");
        assert_eq!(f.away_form, "LLLLL");
        assert_eq!(f.home_form, "D");
    }

    #[test]
    fn rates_are_none_without_samples() {
        let team = TeamRef::new("t", "Team");
        let f = extract_team_features(&team, &[], None, &[]);
        assert_eq!(f.table_position, 0);
        assert_eq!(f.avg_corners, None);
        assert_eq!(f.btts_rate, VenueRates::default());
        assert_eq!(f.scored_first_rate, None);
        assert_eq!(f.avg_goals_scored, VenueAverages::default());
    }

    #[test]
    fn corners_average_over_all_matches() {
        let team = TeamRef::new("t", "Team");
        let mut a = game("t", "o", 1, 0);
        a.corners = Some(CornerCounts {
            home: Some(6),
            away: Some(2),
        });
        let mut b = game("o", "t", 1, 0);
        b.corners = Some(CornerCounts {
            home: Some(9),
            away: Some(3),
        });
        let c = game("t", "o", 0, 0);
        let f = extract_team_features(&team, &[], None, &[a, b, c]);
        assert_eq!(f.avg_corners, Some(3.0));
    }

    #[test]
    fn scoring_first_rates() {
        let team = TeamRef::new("t", "Team");
        let mut a = game("t", "o", 2, 1);
        a.first_goal = Some(Side::Home);
        a.last_goal = Some(Side::Away);
        let mut b = game("o", "t", 1, 1);
        b.first_goal = Some(Side::Away);
        let mut c = game("o", "t", 1, 0);
        c.first_goal = Some(Side::Home);
        let f = extract_team_features(&team, &[], None, &[a, b, c]);
        assert_eq!(f.scored_first_rate, Some(67));
        assert_eq!(f.first_goal_win_rate, Some(50));
        assert_eq!(f.late_goal_rate, Some(0));
        assert_eq!(f.late_goal_win_rate, None);
    }

    #[test]
    fn summary_averages_and_table_lookup() {
        let team = TeamRef::new("t", "Team");
        let table = vec![TableRow {
            team_id: "t".to_string(),
            position: 4,
            played: None,
            points: None,
        }];
        let summary = ScoringSummary {
            played: VenueCounts {
                home: Some(4),
                away: Some(0),
                total: None,
            },
            scored: VenueCounts {
                home: Some(9),
                away: Some(0),
                total: None,
            },
            conceded: VenueCounts::default(),
        };
        let f = extract_team_features(&team, &table, Some(&summary), &[]);
        assert_eq!(f.table_position, 4);
        assert_eq!(f.avg_goals_scored.home, Some(2.25));
        assert_eq!(f.avg_goals_scored.away, None);
        assert_eq!(f.avg_goals_scored.total, Some(2.25));
        assert_eq!(f.avg_goals_conceded.home, None);
    }

    #[test]
    fn venue_splits_for_clean_sheets_and_btts() {
        let team = TeamRef::new("t", "Team");
        let recent = vec![
            game("t", "o", 2, 0),
            game("t", "o", 1, 1),
            game("o", "t", 0, 3),
            game("o", "t", 2, 2),
        ];
        let f = extract_team_features(&team, &[], None, &recent);
        assert_eq!(f.clean_sheets, VenueTally { home: 1, away: 1 });
        assert_eq!(f.over_1_5, VenueTally { home: 2, away: 2 });
        assert_eq!(f.btts_rate.home, Some(50));
        assert_eq!(f.btts_rate.away, Some(50));
    }

    #[test]
    fn extreme_counts_do_not_overflow() {
        let team = TeamRef::new("t", "Team");
        let big_corners = || CornerCounts {
            home: Some(3_000_000_000),
            away: Some(0),
        };
        let mut a = game("t", "o", u32::MAX - 1, 2);
        a.corners = Some(big_corners());
        let mut b = game("t", "o", 0, 0);
        b.corners = Some(big_corners());
        let f = extract_team_features(&team, &[], None, &[a, b]);
        assert_eq!(f.avg_corners, Some(3_000_000_000.0));
        assert_eq!(f.over_1_5.home, 1);
        assert_eq!(f.btts_rate.home, Some(50));
    }

    #[test]
    fn form_follows_kickoff_order_when_every_match_has_one() {
        use chrono::{TimeZone, Utc};

        let team = TeamRef::new("t", "Team");
        let mut recent = vec![game("t", "o", 1, 0), game("t", "o", 0, 0), game("t", "o", 0, 2)];
        for (m, day) in recent.iter_mut().zip([1, 3, 2]) {
            m.kickoff = Utc.with_ymd_and_hms(2024, 3, day, 15, 0, 0).single();
        }
        let f = extract_team_features(&team, &[], None, &recent);
        assert_eq!(f.form, "DLW");
    }
}
