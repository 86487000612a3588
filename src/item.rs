use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// A research paper record as delivered by the data source.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub summary: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default, alias = "similarity")]
    pub similarity_score: Option<f32>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read items from {}", path.display()))?;
    let items = parse_items(&raw)
        .with_context(|| format!("failed to parse items in {}", path.display()))?;
    info!(path = %path.display(), count = items.len(), "loaded items");
    Ok(items)
}

/// Accepts a bare array or an object wrapping the array under `items` or `papers`.
pub fn parse_items(raw: &str) -> Result<Vec<Item>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON")?;

    let entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut object) => {
            let wrapped = object
                .remove("items")
                .or_else(|| object.remove("papers"))
                .ok_or_else(|| anyhow!("expected an `items` or `papers` array"))?;
            match wrapped {
                Value::Array(entries) => entries,
                _ => return Err(anyhow!("`items` must be an array")),
            }
        }
        _ => return Err(anyhow!("unexpected JSON type for item list")),
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match Item::deserialize(entry) {
            Ok(item) if !item.id.trim().is_empty() => items.push(item),
            Ok(_) => warn!(index, "skipping item without an id"),
            Err(error) => warn!(index, %error, "skipping malformed item"),
        }
    }

    Ok(items)
}
