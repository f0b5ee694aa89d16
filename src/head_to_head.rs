use serde::{Deserialize, Serialize};

use crate::stats::{HistoricalMatch, Outcome, Side, TeamRef};

const RECENT_RESULTS: usize = 3;

/// Prior meetings seen from the upcoming fixture's home team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub recent: Vec<String>,
}

pub fn analyze_head_to_head(
    meetings: &[HistoricalMatch],
    home_team: &TeamRef,
    away_team: &TeamRef,
) -> HeadToHeadSummary {
    let mut out = HeadToHeadSummary::default();

    for m in meetings {
        let side = fixture_home_side(m, home_team, away_team);
        out.matches += 1;
        match m.outcome_for(side) {
            Outcome::Win => out.wins += 1,
            Outcome::Draw => out.draws += 1,
            Outcome::Loss => out.losses += 1,
        }
        out.goals_scored = out
            .goals_scored
            .saturating_add(m.goals_for(side).unwrap_or(0));
        out.goals_conceded = out
            .goals_conceded
            .saturating_add(m.goals_against(side).unwrap_or(0));

        if out.recent.len() < RECENT_RESULTS {
            out.recent.push(render_meeting(m));
        }
    }

    out
}

/// Slot the fixture's home team held in a past meeting. Roles flip between meetings.
fn fixture_home_side(m: &HistoricalMatch, home_team: &TeamRef, away_team: &TeamRef) -> Side {
    if let Some(side) = m.side_of(&home_team.id) {
        return side;
    }
    if let Some(side) = m.side_of(&away_team.id) {
        return side.opposite();
    }
    tracing::debug!(
        match_id = ?m.id,
        home = %home_team.id,
        away = %away_team.id,
        "meeting has neither fixture team, reading it in slot order"
    );
    Side::Home
}

fn render_meeting(m: &HistoricalMatch) -> String {
    format!(
        "{} {}-{} {}",
        team_abbreviation(m.home_team.display_name()),
        score_cell(m.result.home_goals),
        score_cell(m.result.away_goals),
        team_abbreviation(m.away_team.display_name()),
    )
}

fn score_cell(goals: Option<u32>) -> String {
    goals.map(|g| g.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Three-letter tag: initials of up to three words, or the first three letters of a single word.
pub fn team_abbreviation(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => "???".to_string(),
        [single] => single.chars().take(3).collect::<String>().to_uppercase(),
        many => many
            .iter()
            .take(3)
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_uppercase(),
    }
}
