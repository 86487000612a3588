use std::collections::BTreeMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::derive::CategoryRules;
use crate::node::Node;
use crate::util::stable_pair;

use super::SeedLayout;

/// Initial positions plus the anchor each node is pulled toward.
pub(super) struct Seed {
    pub(super) positions: Vec<Vec2>,
    pub(super) anchors: Vec<Vec2>,
}

pub(super) fn seed_positions(
    nodes: &[Node],
    layout: SeedLayout,
    viewport: Vec2,
    padding: f32,
    rules: &CategoryRules,
) -> Seed {
    let center = viewport * 0.5;
    match layout {
        SeedLayout::Circle => circle(nodes.len(), center, viewport.min_elem() * 0.35),
        SeedLayout::YearLanes => year_lanes(nodes, viewport, padding),
        SeedLayout::CategoryClusters => category_clusters(nodes, center, viewport, rules),
    }
}

pub(super) fn apply_jitter(nodes: &[Node], positions: &mut [Vec2], magnitude: f32, seed: u64) {
    if magnitude <= 0.0 {
        return;
    }

    for (node, position) in nodes.iter().zip(positions.iter_mut()) {
        let (jx, jy) = stable_pair(&node.id, seed);
        *position += vec2(jx, jy) * magnitude;
    }
}

fn ring(count: usize, center: Vec2, radius: f32) -> impl Iterator<Item = Vec2> {
    (0..count).map(move |index| {
        if count == 1 {
            return center;
        }
        let angle = (index as f32 / count as f32) * TAU;
        center + vec2(angle.cos(), angle.sin()) * radius
    })
}

fn circle(count: usize, center: Vec2, radius: f32) -> Seed {
    Seed {
        positions: ring(count, center, radius).collect(),
        anchors: vec![center; count],
    }
}

fn year_lanes(nodes: &[Node], viewport: Vec2, padding: f32) -> Seed {
    let mut lanes: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (index, node) in nodes.iter().enumerate() {
        lanes.entry(node.year).or_default().push(index);
    }

    let left = padding.min(viewport.x * 0.5);
    let top = padding.min(viewport.y * 0.5);
    let usable = (viewport - vec2(left, top) * 2.0).max(Vec2::ZERO);
    let lane_width = usable.x / lanes.len().max(1) as f32;

    let mut positions = vec![Vec2::ZERO; nodes.len()];
    let mut anchors = vec![Vec2::ZERO; nodes.len()];
    for (lane, members) in lanes.values().enumerate() {
        let x = left + (lane as f32 + 0.5) * lane_width;
        let row_height = usable.y / (members.len() + 1) as f32;
        for (row, &index) in members.iter().enumerate() {
            positions[index] = vec2(x, top + (row as f32 + 1.0) * row_height);
            anchors[index] = vec2(x, viewport.y * 0.5);
        }
    }

    Seed { positions, anchors }
}

fn category_clusters(
    nodes: &[Node],
    center: Vec2,
    viewport: Vec2,
    rules: &CategoryRules,
) -> Seed {
    let mut clusters: BTreeMap<(usize, &str), Vec<usize>> = BTreeMap::new();
    for (index, node) in nodes.iter().enumerate() {
        clusters
            .entry((rules.rank(&node.category), node.category.as_str()))
            .or_default()
            .push(index);
    }

    let cluster_centers =
        ring(clusters.len(), center, viewport.min_elem() * 0.3).collect::<Vec<_>>();

    let mut positions = vec![Vec2::ZERO; nodes.len()];
    let mut anchors = vec![Vec2::ZERO; nodes.len()];
    for (members, &cluster_center) in clusters.values().zip(&cluster_centers) {
        let spread = 20.0 + 6.0 * (members.len() as f32).sqrt();
        for (&index, position) in members.iter().zip(ring(members.len(), cluster_center, spread)) {
            positions[index] = position;
            anchors[index] = cluster_center;
        }
    }

    Seed { positions, anchors }
}
