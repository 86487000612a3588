use std::collections::HashSet;

use eframe::egui::{Color32, Vec2};
use tracing::warn;

use crate::derive::{
    CategoryRules, Palette, RadiusMap, derive_category, derive_importance, derive_year,
};
use crate::item::Item;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub title: String,
    pub position: Vec2,
    pub radius: f32,
    pub color: Color32,
    pub category: String,
    pub year: i32,
    pub importance: f32,
    pub authors: Vec<String>,
    pub source: Option<String>,
}

pub struct NodeStyle<'a> {
    pub rules: &'a CategoryRules,
    pub palette: &'a Palette,
    pub radius: RadiusMap,
}

impl Node {
    pub fn from_item(item: &Item, style: &NodeStyle<'_>) -> Self {
        let category = derive_category(item, style.rules);
        let importance = derive_importance(item);

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            position: Vec2::ZERO,
            radius: style.radius.radius(importance),
            color: style.palette.color_for(&category),
            category,
            year: derive_year(item),
            importance,
            authors: item.authors.clone(),
            source: item.source.clone(),
        }
    }
}

/// One node per distinct id, in input order; later duplicates are dropped.
pub fn build_nodes(items: &[Item], style: &NodeStyle<'_>) -> Vec<Node> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut nodes = Vec::with_capacity(items.len());

    for item in items {
        if !seen.insert(item.id.as_str()) {
            warn!(id = %item.id, "duplicate item id, keeping first occurrence");
            continue;
        }
        nodes.push(Node::from_item(item, style));
    }

    nodes
}
