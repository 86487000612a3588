//! Fixed-iteration force simulation producing initial node positions.
//!
//! Each iteration applies inverse-square repulsion between all node pairs,
//! optional springs along weighted edges, a centering pull toward the
//! global centre or a per-node anchor, and finally clamps every free node
//! into the padded viewport. Nodes with a pinned position act as fixed
//! repulsors and are never moved.

mod forces;
mod quadtree;
mod seed;

use std::collections::HashMap;
use std::time::Instant;

use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derive::CategoryRules;
use crate::edges::Edge;
use crate::node::Node;
use forces::{
    Spring, accumulate_barnes_hut_repulsion, accumulate_pairwise_repulsion, accumulate_springs,
};
use seed::{apply_jitter, seed_positions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedLayout {
    #[default]
    Circle,
    YearLanes,
    CategoryClusters,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CenterTarget {
    #[default]
    Global,
    /// The lane or cluster centre assigned by the seed layout.
    Anchor,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub seed: SeedLayout,
    pub center_target: CenterTarget,
    pub iterations: usize,
    pub repulsion: f32,
    pub centering: f32,
    pub edge_attraction: f32,
    pub ideal_edge_length: f32,
    pub padding: f32,
    pub max_displacement: f32,
    pub jitter: f32,
    pub jitter_seed: u64,
    /// Node count above which repulsion switches to the Barnes-Hut approximation.
    pub barnes_hut_threshold: usize,
    pub barnes_hut_theta: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: SeedLayout::Circle,
            center_target: CenterTarget::Global,
            iterations: 120,
            repulsion: 2000.0,
            centering: 0.005,
            edge_attraction: 0.0,
            ideal_edge_length: 120.0,
            padding: 40.0,
            max_displacement: 30.0,
            jitter: 0.0,
            jitter_seed: 0,
            barnes_hut_threshold: 400,
            barnes_hut_theta: 0.72,
        }
    }
}

pub struct LayoutRequest<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub viewport: Vec2,
    pub pinned: &'a HashMap<String, Vec2>,
    pub rules: &'a CategoryRules,
}

/// Inclusive clamp range for one axis; collapses to the centre when padding exceeds half the size.
pub fn axis_bounds(size: f32, padding: f32) -> (f32, f32) {
    let size = size.max(0.0);
    let low = padding.max(0.0).min(size * 0.5);
    (low, (size - low).max(low))
}

pub fn run_layout(request: &LayoutRequest<'_>, config: &LayoutConfig) -> Vec<Vec2> {
    let node_count = request.nodes.len();
    if node_count == 0 {
        return Vec::new();
    }

    let started = Instant::now();
    let viewport = request.viewport.max(Vec2::ZERO);
    let seed = seed_positions(
        request.nodes,
        config.seed,
        viewport,
        config.padding,
        request.rules,
    );
    let mut positions = seed.positions;
    apply_jitter(request.nodes, &mut positions, config.jitter, config.jitter_seed);

    let pinned = request
        .nodes
        .iter()
        .map(|node| request.pinned.get(&node.id).copied())
        .collect::<Vec<_>>();
    for (position, pin) in positions.iter_mut().zip(&pinned) {
        if let Some(pin) = pin {
            *position = *pin;
        }
    }

    let (x_min, x_max) = axis_bounds(viewport.x, config.padding);
    let (y_min, y_max) = axis_bounds(viewport.y, config.padding);
    let clamp_free = |positions: &mut [Vec2]| {
        for (position, pin) in positions.iter_mut().zip(&pinned) {
            if pin.is_none() {
                *position = vec2(position.x.clamp(x_min, x_max), position.y.clamp(y_min, y_max));
            }
        }
    };
    clamp_free(&mut positions);

    let springs = request
        .edges
        .iter()
        .map(|edge| Spring {
            source: edge.source,
            target: edge.target,
            weight: edge.weight,
        })
        .collect::<Vec<_>>();
    let center = viewport * 0.5;
    let use_barnes_hut = node_count > config.barnes_hut_threshold;
    let max_step = config.max_displacement.max(0.0);
    let mut displacement = vec![Vec2::ZERO; node_count];

    for _ in 0..config.iterations {
        displacement.fill(Vec2::ZERO);

        if use_barnes_hut {
            accumulate_barnes_hut_repulsion(
                &positions,
                config.repulsion,
                config.barnes_hut_theta,
                &mut displacement,
            );
        } else {
            accumulate_pairwise_repulsion(&positions, config.repulsion, &mut displacement);
        }

        accumulate_springs(
            &positions,
            &springs,
            config.edge_attraction,
            config.ideal_edge_length,
            &mut displacement,
        );

        for (index, entry) in displacement.iter_mut().enumerate() {
            let target = match config.center_target {
                CenterTarget::Global => center,
                CenterTarget::Anchor => seed.anchors[index],
            };
            *entry += (target - positions[index]) * config.centering;
        }

        for ((position, step), pin) in positions.iter_mut().zip(&displacement).zip(&pinned) {
            if pin.is_some() {
                continue;
            }
            let length = step.length();
            *position += if length > max_step {
                *step * (max_step / length)
            } else {
                *step
            };
        }

        clamp_free(&mut positions);
    }

    debug!(
        nodes = node_count,
        edges = springs.len(),
        iterations = config.iterations,
        barnes_hut = use_barnes_hut,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "layout finished"
    );

    positions
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::*;

    fn node(id: &str) -> Node {
        Node {
            id: id.to_owned(),
            title: String::new(),
            position: Vec2::ZERO,
            radius: 10.0,
            color: Color32::GRAY,
            category: "default".to_owned(),
            year: 2020,
            importance: 0.5,
            authors: Vec::new(),
            source: None,
        }
    }

    fn layout(nodes: &[Node], pinned: &HashMap<String, Vec2>, config: &LayoutConfig) -> Vec<Vec2> {
        let rules = CategoryRules::default();
        run_layout(
            &LayoutRequest {
                nodes,
                edges: &[],
                viewport: vec2(800.0, 600.0),
                pinned,
                rules: &rules,
            },
            config,
        )
    }

    #[test]
    fn empty_input_yields_no_positions() {
        assert!(layout(&[], &HashMap::new(), &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn single_node_settles_at_center() {
        let positions = layout(&[node("a")], &HashMap::new(), &LayoutConfig::default());
        assert_eq!(positions, vec![vec2(400.0, 300.0)]);
    }

    #[test]
    fn pinned_nodes_do_not_move() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let pinned = HashMap::from([("b".to_owned(), vec2(-50.0, 900.0))]);
        let positions = layout(&nodes, &pinned, &LayoutConfig::default());
        assert_eq!(positions[1], vec2(-50.0, 900.0));
    }

    #[test]
    fn barnes_hut_path_respects_bounds() {
        let nodes = (0..30).map(|index| node(&format!("n{index}"))).collect::<Vec<_>>();
        let config = LayoutConfig {
            barnes_hut_threshold: 10,
            iterations: 40,
            ..LayoutConfig::default()
        };
        let positions = layout(&nodes, &HashMap::new(), &config);
        assert!(positions.iter().all(|position| {
            (40.0..=760.0).contains(&position.x) && (40.0..=560.0).contains(&position.y)
        }));
    }

    #[test]
    fn degenerate_viewport_collapses_to_center_line() {
        assert_eq!(axis_bounds(50.0, 40.0), (25.0, 25.0));
        assert_eq!(axis_bounds(800.0, 40.0), (40.0, 760.0));
        assert_eq!(axis_bounds(-5.0, 10.0), (0.0, 0.0));
    }
}
