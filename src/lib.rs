pub mod config;
pub mod enriched_json;
pub mod export;
pub mod head_to_head;
pub mod league_summary;
pub mod odds;
pub mod prediction;
pub mod predictive;
pub mod stats;
pub mod team_features;
