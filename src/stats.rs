use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which slot a team occupies in a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Result of a match seen from the slots, not from any particular team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    HomeWin,
    Draw,
    AwayWin,
}

impl Verdict {
    pub fn for_side(self, side: Side) -> Outcome {
        match (self, side) {
            (Verdict::Draw, _) => Outcome::Draw,
            (Verdict::HomeWin, Side::Home) | (Verdict::AwayWin, Side::Away) => Outcome::Win,
            _ => Outcome::Loss,
        }
    }
}

/// Result of a match seen from one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
    /// `None` is the provider's draw tag.
    #[serde(default)]
    pub winner: Option<Side>,
}

impl MatchResult {
    pub fn verdict(&self) -> Verdict {
        if let (Some(h), Some(a)) = (self.home_goals, self.away_goals) {
            let derived = if h > a {
                Verdict::HomeWin
            } else if h < a {
                Verdict::AwayWin
            } else {
                Verdict::Draw
            };
            if derived != Self::tag_verdict(self.winner) {
                tracing::debug!(
                    home_goals = h,
                    away_goals = a,
                    winner = ?self.winner,
                    "winner tag contradicts score, using score"
                );
            }
            return derived;
        }
        Self::tag_verdict(self.winner)
    }

    fn tag_verdict(winner: Option<Side>) -> Verdict {
        match winner {
            Some(Side::Home) => Verdict::HomeWin,
            Some(Side::Away) => Verdict::AwayWin,
            None => Verdict::Draw,
        }
    }

    pub fn goals(&self, side: Side) -> Option<u32> {
        match side {
            Side::Home => self.home_goals,
            Side::Away => self.away_goals,
        }
    }

    /// Widened so that any pair of `u32` scores adds without overflow.
    pub fn total_goals(&self) -> Option<u64> {
        Some(u64::from(self.home_goals?) + u64::from(self.away_goals?))
    }

    pub fn both_scored(&self) -> Option<bool> {
        Some(self.home_goals? > 0 && self.away_goals? > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl TeamRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Name for display, falling back to the id when the provider left it blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerCounts {
    #[serde(default)]
    pub home: Option<u32>,
    #[serde(default)]
    pub away: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub competition: Option<String>,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    #[serde(default)]
    pub result: MatchResult,
    #[serde(default)]
    pub corners: Option<CornerCounts>,
    #[serde(default)]
    pub first_goal: Option<Side>,
    #[serde(default)]
    pub last_goal: Option<Side>,
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
}

impl HistoricalMatch {
    /// Slot the team played in, matched by identifier.
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if self.home_team.id == team_id {
            Some(Side::Home)
        } else if self.away_team.id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn goals_for(&self, side: Side) -> Option<u32> {
        self.result.goals(side)
    }

    pub fn goals_against(&self, side: Side) -> Option<u32> {
        self.result.goals(side.opposite())
    }

    pub fn outcome_for(&self, side: Side) -> Outcome {
        self.result.verdict().for_side(side)
    }

    pub fn corners_for(&self, side: Side) -> Option<u32> {
        let corners = self.corners.as_ref()?;
        match side {
            Side::Home => corners.home,
            Side::Away => corners.away,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub team_id: String,
    pub position: u32,
    #[serde(default)]
    pub played: Option<u32>,
    #[serde(default)]
    pub points: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutcome {
    pub description: String,
    #[serde(default)]
    pub price: String,
    /// Text-encoded implied probability in `[0,1]`, when the provider sends one.
    #[serde(default)]
    pub probability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    #[serde(default)]
    pub specifier: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<MarketOutcome>,
}

impl Market {
    pub fn specifier(&self) -> &str {
        self.specifier.as_deref().unwrap_or("")
    }

    pub fn outcome(&self, description: &str) -> Option<&MarketOutcome> {
        self.outcomes.iter().find(|o| o.description == description)
    }
}

/// Raw per-venue counts as supplied by the provider's team statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueCounts {
    #[serde(default)]
    pub home: Option<u32>,
    #[serde(default)]
    pub away: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

impl VenueCounts {
    pub fn get(&self, venue: Venue) -> Option<u64> {
        match venue {
            Venue::Home => self.home.map(u64::from),
            Venue::Away => self.away.map(u64::from),
            Venue::Total => self
                .total
                .map(u64::from)
                .or_else(|| Some(u64::from(self.home?) + u64::from(self.away?))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
    Total,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSummary {
    #[serde(default)]
    pub played: VenueCounts,
    #[serde(default)]
    pub scored: VenueCounts,
    #[serde(default)]
    pub conceded: VenueCounts,
}

/// A nested section of an aggregate that the provider may leave out.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Present(T),
    Absent,
}

impl<T> Section<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Section::Present(v) => Some(v),
            Section::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Section::Present(_))
    }
}

impl<T> Section<Vec<T>> {
    /// Present-but-empty and absent both read as an empty slice.
    pub fn items(&self) -> &[T] {
        match self {
            Section::Present(v) => v,
            Section::Absent => &[],
        }
    }
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::Absent
    }
}

impl<T> From<Option<T>> for Section<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Section::Present(v),
            None => Section::Absent,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Section<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Section::from)
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

/// Upstream value of unknown shape (status codes, ground names). Carried, never inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueValue {
    Flag(bool),
    Number(f64),
    Text(String),
    #[default]
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// One fixture with everything the provider gathered about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMatch {
    pub id: String,
    #[serde(default)]
    pub competition: Section<Competition>,
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OpaqueValue,
    #[serde(default)]
    pub ground: OpaqueValue,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    #[serde(default)]
    pub table: Section<Vec<TableRow>>,
    #[serde(default)]
    pub home_recent: Section<Vec<HistoricalMatch>>,
    #[serde(default)]
    pub away_recent: Section<Vec<HistoricalMatch>>,
    #[serde(default)]
    pub head_to_head: Section<Vec<HistoricalMatch>>,
    #[serde(default)]
    pub markets: Section<Vec<Market>>,
    #[serde(default)]
    pub home_summary: Section<ScoringSummary>,
    #[serde(default)]
    pub away_summary: Section<ScoringSummary>,
}

impl EnrichedMatch {
    pub fn competition_name(&self) -> Option<&str> {
        self.competition
            .as_option()
            .map(|c| c.name.trim())
            .filter(|s| !s.is_empty())
    }
}

/// `round(count * 100 / denominator)`; `None` when the denominator is zero.
pub fn rate_pct(count: usize, denominator: usize) -> Option<u32> {
    if denominator == 0 {
        return None;
    }
    Some(((count as f64) * 100.0 / (denominator as f64)).round() as u32)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Most-recent-first view of a match list. Sorted by kickoff only when every match has one.
pub fn most_recent_first(matches: &[HistoricalMatch]) -> Vec<&HistoricalMatch> {
    let mut out: Vec<&HistoricalMatch> = matches.iter().collect();
    if !out.is_empty() && out.iter().all(|m| m.kickoff.is_some()) {
        out.sort_by(|a, b| b.kickoff.cmp(&a.kickoff));
    }
    out
}
