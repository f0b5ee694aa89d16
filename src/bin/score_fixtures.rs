use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use fixture_insights::config::EngineConfig;
use fixture_insights::enriched_json::parse_enriched_matches_json;
use fixture_insights::export::export_workbook;
use fixture_insights::league_summary::aggregate_leagues;
use fixture_insights::prediction::{PredictiveMatchData, predict_all, rank_by_confidence};

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = EngineConfig::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cfg) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cfg: EngineConfig) -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let input = args
        .iter()
        .find(|a| !a.starts_with("--") && !is_flag_value(&args, a))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: score_fixtures <input.json> [--json] [--export <xlsx>]"))?;
    let as_json = args.iter().any(|a| a == "--json");
    let export_path = parse_export_arg(&args).or_else(|| cfg.export_path.clone());

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("failed reading {}", input.display()))?;
    let fixtures = parse_enriched_matches_json(&raw)?;
    tracing::info!(fixtures = fixtures.len(), input = %input.display(), "loaded fixtures");

    let mut predictions = predict_all(&fixtures, &cfg);
    rank_by_confidence(&mut predictions);
    let leagues = aggregate_leagues(&fixtures, &cfg.unknown_competition_label);

    if as_json {
        let out = serde_json::json!({
            "predictions": predictions,
            "leagues": leagues,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize output")?
        );
    } else {
        for p in &predictions {
            println!("{}", summary_line(p));
        }
        println!();
        for summary in leagues.values() {
            println!(
                "{}: fixtures={} meetings={} avg_goals={:.2} H/D/A={}%/{}%/{}% btts={}%",
                summary.competition,
                summary.fixtures,
                summary.matches,
                summary.avg_goals,
                summary.home_win_rate,
                summary.draw_rate,
                summary.away_win_rate,
                summary.btts_rate
            );
        }
    }

    if let Some(path) = export_path {
        let report = export_workbook(&path, &predictions, &leagues)?;
        tracing::info!(
            path = %path.display(),
            predictions = report.predictions,
            team_rows = report.team_rows,
            leagues = report.leagues,
            "workbook exported"
        );
    }

    Ok(())
}

fn summary_line(p: &PredictiveMatchData) -> String {
    let confidence = p
        .confidence
        .map(|c| format!("{c:>3}"))
        .unwrap_or_else(|| "  -".to_string());
    let xg = p
        .expected_goals
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{confidence}] {} vs {} fav={} xg={xg} h2h={}W{}D{}L form={}/{}",
        p.home_team.name,
        p.away_team.name,
        p.favorite.label(),
        p.head_to_head.wins,
        p.head_to_head.draws,
        p.head_to_head.losses,
        display_form(&p.home_features.form),
        display_form(&p.away_features.form),
    )
}

fn display_form(form: &str) -> &str {
    if form.is_empty() { "-" } else { form }
}

fn is_flag_value(args: &[String], candidate: &String) -> bool {
    args.windows(2)
        .any(|w| w[0] == "--export" && std::ptr::eq(&w[1], candidate))
}

fn parse_export_arg(args: &[String]) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--export=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--export"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}
