use anyhow::{Context, Result};
use serde_json::Value;

use crate::stats::EnrichedMatch;

/// Reads enriched-match aggregates. Accepts an array, a single object, or `null`.
pub fn parse_enriched_matches_json(raw: &str) -> Result<Vec<EnrichedMatch>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid enriched match json")?;
    match root {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value::<EnrichedMatch>(item)
                    .with_context(|| format!("enriched match at index {idx}"))
            })
            .collect(),
        Value::Object(_) => {
            let one = serde_json::from_value::<EnrichedMatch>(root)
                .context("invalid enriched match object")?;
            Ok(vec![one])
        }
        Value::Null => Ok(Vec::new()),
        other => Err(anyhow::anyhow!(
            "expected enriched match array or object, got {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
