use std::env;
use std::path::PathBuf;

use crate::league_summary::UNKNOWN_COMPETITION;

const DEFAULT_PARALLELISM: usize = 4;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Worker threads used when scoring a batch of fixtures.
    pub parallelism: usize,
    pub unknown_competition_label: String,
    pub export_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            unknown_competition_label: UNKNOWN_COMPETITION.to_string(),
            export_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let parallelism = non_empty("SCORE_PARALLELISM")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(1, 32);
        let unknown_competition_label = non_empty("UNKNOWN_COMPETITION_LABEL")
            .unwrap_or_else(|| UNKNOWN_COMPETITION.to_string());
        let export_path = non_empty("EXPORT_PATH").map(PathBuf::from);
        let log_level = non_empty("LOG_LEVEL")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_ascii_lowercase();

        Self {
            parallelism,
            unknown_competition_label,
            export_path,
            log_level,
        }
    }
}
