use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::league_summary::LeagueSummary;
use crate::prediction::PredictiveMatchData;
use crate::team_features::TeamFeatures;

pub struct ExportReport {
    pub predictions: usize,
    pub team_rows: usize,
    pub leagues: usize,
}

pub fn export_workbook(
    path: &Path,
    predictions: &[PredictiveMatchData],
    leagues: &BTreeMap<String, LeagueSummary>,
) -> Result<ExportReport> {
    let mut prediction_rows = vec![vec![
        "Match ID".to_string(),
        "Competition".to_string(),
        "Kickoff".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Favorite".to_string(),
        "Confidence".to_string(),
        "Expected Goals".to_string(),
        "Defensive Strength".to_string(),
        "Position Gap".to_string(),
        "Odds Home".to_string(),
        "Odds Draw".to_string(),
        "Odds Away".to_string(),
        "H2H W-D-L".to_string(),
        "H2H Recent".to_string(),
        "Reasons".to_string(),
    ]];

    let mut team_rows = vec![vec![
        "Match ID".to_string(),
        "Side".to_string(),
        "Team".to_string(),
        "Position".to_string(),
        "Form".to_string(),
        "Home Form".to_string(),
        "Away Form".to_string(),
        "Avg Scored".to_string(),
        "Avg Conceded".to_string(),
        "Clean Sheets H/A".to_string(),
        "Over 1.5 H/A".to_string(),
        "BTTS % H/A".to_string(),
        "Scored First %".to_string(),
        "Avg Corners".to_string(),
    ]];

    let mut league_rows = vec![vec![
        "Competition".to_string(),
        "Fixtures".to_string(),
        "Meetings".to_string(),
        "Avg Goals".to_string(),
        "Home Win %".to_string(),
        "Draw %".to_string(),
        "Away Win %".to_string(),
        "BTTS %".to_string(),
    ]];

    for p in predictions {
        prediction_rows.push(prediction_row(p));
        team_rows.push(team_row(&p.match_id, "home", &p.home_features));
        team_rows.push(team_row(&p.match_id, "away", &p.away_features));
    }
    for summary in leagues.values() {
        league_rows.push(league_row(summary));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &prediction_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamForm")?;
        write_rows(sheet, &team_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Leagues")?;
        write_rows(sheet, &league_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        predictions: prediction_rows.len().saturating_sub(1),
        team_rows: team_rows.len().saturating_sub(1),
        leagues: league_rows.len().saturating_sub(1),
    })
}

fn prediction_row(p: &PredictiveMatchData) -> Vec<String> {
    let h2h = &p.head_to_head;
    vec![
        p.match_id.clone(),
        p.competition.clone().unwrap_or_default(),
        opt_to_string(p.kickoff.map(|k| k.to_rfc3339())),
        p.home_team.name.clone(),
        p.away_team.name.clone(),
        p.favorite.label().to_string(),
        opt_to_string(p.confidence),
        opt_fixed(p.expected_goals),
        opt_fixed(p.defensive_strength),
        p.position_gap.to_string(),
        price_cell(p.odds.home),
        price_cell(p.odds.draw),
        price_cell(p.odds.away),
        format!("{}-{}-{}", h2h.wins, h2h.draws, h2h.losses),
        h2h.recent.join(", "),
        p.reasons.join("; "),
    ]
}

fn team_row(match_id: &str, side: &str, f: &TeamFeatures) -> Vec<String> {
    vec![
        match_id.to_string(),
        side.to_string(),
        f.team_name.clone(),
        f.table_position.to_string(),
        f.form.clone(),
        f.home_form.clone(),
        f.away_form.clone(),
        opt_fixed(f.avg_goals_scored.total),
        opt_fixed(f.avg_goals_conceded.total),
        format!("{}/{}", f.clean_sheets.home, f.clean_sheets.away),
        format!("{}/{}", f.over_1_5.home, f.over_1_5.away),
        format!(
            "{}/{}",
            opt_to_string(f.btts_rate.home),
            opt_to_string(f.btts_rate.away)
        ),
        opt_to_string(f.scored_first_rate),
        opt_fixed(f.avg_corners),
    ]
}

fn league_row(s: &LeagueSummary) -> Vec<String> {
    vec![
        s.competition.clone(),
        s.fixtures.to_string(),
        s.matches.to_string(),
        format!("{:.2}", s.avg_goals),
        s.home_win_rate.to_string(),
        s.draw_rate.to_string(),
        s.away_win_rate.to_string(),
        s.btts_rate.to_string(),
    ]
}

fn price_cell(price: f64) -> String {
    if price > 0.0 {
        format!("{price:.2}")
    } else {
        String::new()
    }
}

fn opt_fixed(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
