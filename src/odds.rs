use serde::{Deserialize, Serialize};

use crate::stats::Market;

pub const MARKET_1X2: &str = "1X2";
pub const MARKET_OVER_UNDER: &str = "Over/Under";
pub const MARKET_BTTS: &str = "Both teams to score";
pub const SPEC_TOTAL_1_5: &str = "total=1.5";
pub const SPEC_TOTAL_2_5: &str = "total=2.5";

/// Canonical decimal prices for one fixture.
///
/// `0.0` means "market or outcome unavailable". Ratio math must check for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    pub over_1_5: f64,
    pub under_1_5: f64,
    pub over_2_5: f64,
    pub under_2_5: f64,
    pub btts_yes: f64,
    pub btts_no: f64,
}

impl OddsSnapshot {
    /// Margin-free 1X2 probabilities in `[0,1]`, or `None` unless all three prices exceed 1.0.
    pub fn no_vig_1x2(&self) -> Option<(f64, f64, f64)> {
        if self.home <= 1.0 || self.draw <= 1.0 || self.away <= 1.0 {
            return None;
        }
        let ih = 1.0 / self.home;
        let id = 1.0 / self.draw;
        let ia = 1.0 / self.away;
        let sum = ih + id + ia;
        if sum <= 0.0 {
            return None;
        }
        Some((ih / sum, id / sum, ia / sum))
    }
}

/// Implied probabilities the provider attaches to the goal-line markets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpliedProbabilities {
    pub over_1_5: Option<f64>,
    pub over_2_5: Option<f64>,
}

pub fn extract_odds(markets: &[Market]) -> OddsSnapshot {
    OddsSnapshot {
        home: price(markets, MARKET_1X2, "", "Home"),
        draw: price(markets, MARKET_1X2, "", "Draw"),
        away: price(markets, MARKET_1X2, "", "Away"),
        over_1_5: price(markets, MARKET_OVER_UNDER, SPEC_TOTAL_1_5, "Over 1.5"),
        under_1_5: price(markets, MARKET_OVER_UNDER, SPEC_TOTAL_1_5, "Under 1.5"),
        over_2_5: price(markets, MARKET_OVER_UNDER, SPEC_TOTAL_2_5, "Over 2.5"),
        under_2_5: price(markets, MARKET_OVER_UNDER, SPEC_TOTAL_2_5, "Under 2.5"),
        btts_yes: price(markets, MARKET_BTTS, "", "Yes"),
        btts_no: price(markets, MARKET_BTTS, "", "No"),
    }
}

pub fn implied_probabilities(markets: &[Market]) -> ImpliedProbabilities {
    ImpliedProbabilities {
        over_1_5: probability(markets, MARKET_OVER_UNDER, SPEC_TOTAL_1_5, "Over 1.5"),
        over_2_5: probability(markets, MARKET_OVER_UNDER, SPEC_TOTAL_2_5, "Over 2.5"),
    }
}

/// First market with this exact name and specifier. Later duplicates are ignored.
pub fn find_market<'a>(markets: &'a [Market], name: &str, specifier: &str) -> Option<&'a Market> {
    markets
        .iter()
        .find(|m| m.name == name && m.specifier() == specifier)
}

fn price(markets: &[Market], name: &str, specifier: &str, description: &str) -> f64 {
    find_market(markets, name, specifier)
        .and_then(|m| m.outcome(description))
        .and_then(|o| parse_price(&o.price))
        .unwrap_or(0.0)
}

fn probability(markets: &[Market], name: &str, specifier: &str, description: &str) -> Option<f64> {
    let outcome = find_market(markets, name, specifier)?.outcome(description)?;
    let p = parse_decimal(outcome.probability.as_deref()?)?;
    if (0.0..=1.0).contains(&p) {
        Some(p)
    } else {
        tracing::debug!(market = name, outcome = description, p, "implied probability out of range");
        None
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    let v = parse_decimal(raw);
    if v.is_none() && !raw.trim().is_empty() {
        tracing::debug!(raw, "unparseable price, treating as unavailable");
    }
    v.filter(|p| *p > 0.0)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let s = s.replace(',', ".");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
