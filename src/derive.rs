use std::sync::LazyLock;

use eframe::egui::Color32;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Item;

pub const FALLBACK_YEAR: i32 = 2024;
pub const DEFAULT_IMPORTANCE: f32 = 0.5;
pub const DEFAULT_CATEGORY: &str = "default";

const MIN_PLAUSIBLE_YEAR: i32 = 1900;
const MAX_PLAUSIBLE_YEAR: i32 = 2100;

static DATE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("valid year pattern"));
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

pub fn derive_year(item: &Item) -> i32 {
    if let Some(year) = item.year {
        return year;
    }

    if let Some(year) = item
        .published_date
        .as_deref()
        .and_then(|date| DATE_YEAR.captures(date))
        .and_then(|captures| captures[1].parse::<i32>().ok())
    {
        return year;
    }

    DIGIT_RUN
        .find_iter(&item.title)
        .filter(|run| run.as_str().len() == 4)
        .filter_map(|run| run.as_str().parse::<i32>().ok())
        .find(|year| (MIN_PLAUSIBLE_YEAR..=MAX_PLAUSIBLE_YEAR).contains(year))
        .unwrap_or(FALLBACK_YEAR)
}

pub fn derive_importance(item: &Item) -> f32 {
    item.similarity_score
        .filter(|score| score.is_finite())
        .unwrap_or(DEFAULT_IMPORTANCE)
        .clamp(0.0, 1.0)
}

pub fn derive_category(item: &Item, rules: &CategoryRules) -> String {
    let text = format!("{} {}", item.title, item.summary).to_lowercase();
    rules.classify(&text).to_owned()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_owned(),
            keywords: keywords.iter().map(|keyword| (*keyword).to_owned()).collect(),
        }
    }
}

/// Ordered keyword rules; the first rule with a matching keyword decides the category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRules(pub Vec<CategoryRule>);

impl CategoryRules {
    /// `text` must already be lower-cased.
    pub fn classify(&self, text: &str) -> &str {
        self.0
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| !keyword.is_empty() && text.contains(keyword.as_str()))
            })
            .map(|rule| rule.category.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn rank(&self, category: &str) -> usize {
        self.0
            .iter()
            .position(|rule| rule.category == category)
            .unwrap_or(self.0.len())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|rule| rule.category.as_str())
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self(vec![
            CategoryRule::new(
                "agentic-ai",
                &["agentic", "agent", "planning", "tool use", "autonomous"],
            ),
            CategoryRule::new(
                "rag",
                &[
                    "retrieval augmented",
                    "retrieval-augmented",
                    "retrieval",
                    "knowledge base",
                ],
            ),
            CategoryRule::new(
                "code-generation",
                &[
                    "code generation",
                    "program synthesis",
                    "coding",
                    "software engineering",
                ],
            ),
            CategoryRule::new(
                "reasoning",
                &["reasoning", "chain-of-thought", "chain of thought", "theorem"],
            ),
            CategoryRule::new("multimodal", &["multimodal", "vision", "image", "video"]),
            CategoryRule::new("alignment", &["alignment", "rlhf", "safety", "preference"]),
            CategoryRule::new(
                "efficiency",
                &["quantization", "distillation", "pruning", "efficient"],
            ),
        ])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color `{0}` must start with `#`")]
    MissingHash(String),
    #[error("color `{0}` must have 6 hex digits")]
    BadLength(String),
    #[error("color `{0}` contains non-hex digits")]
    BadDigit(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaletteColor(pub Color32);

impl PaletteColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Color32::from_rgb(r, g, b))
    }
}

impl TryFrom<String> for PaletteColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(value.clone()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::BadLength(value));
        }

        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError::BadDigit(value.clone()))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<PaletteColor> for String {
    fn from(color: PaletteColor) -> Self {
        let [r, g, b, _] = color.0.to_array();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub category: String,
    pub color: PaletteColor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
    pub fallback: PaletteColor,
}

impl Palette {
    pub fn color_for(&self, category: &str) -> Color32 {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.color.0)
            .unwrap_or(self.fallback.0)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let entry = |category: &str, color: PaletteColor| PaletteEntry {
            category: category.to_owned(),
            color,
        };

        Self {
            entries: vec![
                entry("agentic-ai", PaletteColor::rgb(139, 92, 246)),
                entry("rag", PaletteColor::rgb(59, 130, 246)),
                entry("code-generation", PaletteColor::rgb(16, 185, 129)),
                entry("reasoning", PaletteColor::rgb(245, 158, 11)),
                entry("multimodal", PaletteColor::rgb(236, 72, 153)),
                entry("alignment", PaletteColor::rgb(239, 68, 68)),
                entry("efficiency", PaletteColor::rgb(6, 182, 212)),
            ],
            fallback: PaletteColor::rgb(107, 114, 128),
        }
    }
}

/// Affine map from importance to node radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusMap {
    pub base: f32,
    pub scale: f32,
}

impl RadiusMap {
    pub fn radius(self, importance: f32) -> f32 {
        self.base + importance.clamp(0.0, 1.0) * self.scale.max(0.0)
    }
}

impl Default for RadiusMap {
    fn default() -> Self {
        Self {
            base: 8.0,
            scale: 14.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with(title: &str) -> Item {
        Item::new("x", title)
    }

    #[test]
    fn year_prefers_explicit_field() {
        let mut item = item_with("Results from 1999");
        item.year = Some(2021);
        item.published_date = Some("2019-01-02".to_owned());
        assert_eq!(derive_year(&item), 2021);
    }

    #[test]
    fn year_falls_back_through_date_title_and_default() {
        let mut item = item_with("Scaling laws revisited in 2022");
        item.published_date = Some("published 2018-07-03".to_owned());
        assert_eq!(derive_year(&item), 2018);

        item.published_date = Some("sometime".to_owned());
        assert_eq!(derive_year(&item), 2022);

        let item = item_with("Top 1000 2021 benchmarks");
        assert_eq!(derive_year(&item), 2021);

        let item = item_with("Batch of 12345 tokens and 0042 layers");
        assert_eq!(derive_year(&item), FALLBACK_YEAR);
    }

    #[test]
    fn importance_defaults_and_clamps() {
        let mut item = item_with("x");
        assert_eq!(derive_importance(&item), DEFAULT_IMPORTANCE);
        item.similarity_score = Some(1.7);
        assert_eq!(derive_importance(&item), 1.0);
        item.similarity_score = Some(-3.0);
        assert_eq!(derive_importance(&item), 0.0);
        item.similarity_score = Some(f32::NAN);
        assert_eq!(derive_importance(&item), DEFAULT_IMPORTANCE);
    }

    #[test]
    fn category_uses_first_matching_rule() {
        let rules = CategoryRules::default();
        assert_eq!(derive_category(&item_with("Agentic planning"), &rules), "agentic-ai");
        assert_eq!(
            derive_category(&item_with("Retrieval augmented generation"), &rules),
            "rag"
        );
        assert_eq!(
            derive_category(&item_with("An agent with retrieval memory"), &rules),
            "agentic-ai"
        );
        assert_eq!(derive_category(&item_with("Protein folding"), &rules), DEFAULT_CATEGORY);
    }

    #[test]
    fn category_reads_the_abstract_too() {
        let mut item = item_with("A study");
        item.summary = "We apply RLHF to small models".to_owned();
        assert_eq!(derive_category(&item, &CategoryRules::default()), "alignment");
    }

    #[test]
    fn palette_color_round_trips_hex_strings() {
        let color = PaletteColor::try_from("#3b82f6".to_owned()).expect("valid hex");
        assert_eq!(color, PaletteColor::rgb(59, 130, 246));
        assert_eq!(String::from(color), "#3b82f6");
        assert_eq!(
            PaletteColor::try_from("3b82f6".to_owned()),
            Err(ColorParseError::MissingHash("3b82f6".to_owned()))
        );
        assert!(matches!(
            PaletteColor::try_from("#3b82".to_owned()),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            PaletteColor::try_from("#zz82f6".to_owned()),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn palette_falls_back_for_unknown_categories() {
        let palette = Palette::default();
        assert_eq!(palette.color_for("nope"), palette.fallback.0);
        assert_ne!(palette.color_for("rag"), palette.color_for("agentic-ai"));
    }

    #[test]
    fn radius_map_is_monotonic() {
        let map = RadiusMap::default();
        assert!(map.radius(0.9) > map.radius(0.4));
        assert_eq!(map.radius(5.0), map.radius(1.0));
    }
}
