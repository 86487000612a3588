use std::collections::HashMap;

use eframe::egui::{Vec2, pos2, vec2};
use proptest::prelude::*;

use paper_graph::derive::{CategoryRules, Palette, RadiusMap};
use paper_graph::edges::{EdgePolicy, derive_edges};
use paper_graph::layout::{LayoutConfig, LayoutRequest, SeedLayout, axis_bounds, run_layout};
use paper_graph::node::{NodeStyle, build_nodes};
use paper_graph::view::{MAX_SCALE, MIN_SCALE};
use paper_graph::{Dimension, Item, Node, ViewTransform};

const AUTHORS: [&str; 4] = ["Ada Lovelace", "Alan Turing", "Grace Hopper", "Edsger Dijkstra"];
const SOURCES: [&str; 3] = ["arXiv", "ACL", "NeurIPS"];

const TITLES: [&str; 6] = [
    "Agentic planning for web tasks",
    "Retrieval augmented generation at scale",
    "Program synthesis with code generation models",
    "Chain-of-thought reasoning benchmarks",
    "Vision language multimodal pretraining",
    "A survey of everything else",
];

fn nodes(count: usize) -> Vec<Node> {
    let rules = CategoryRules::default();
    let palette = Palette::default();
    let style = NodeStyle {
        rules: &rules,
        palette: &palette,
        radius: RadiusMap::default(),
    };
    let items = (0..count)
        .map(|index| Item {
            year: Some(2015 + (index % 10) as i32),
            similarity_score: Some((index % 7) as f32 / 7.0),
            authors: (0..1 + index % 3)
                .map(|offset| AUTHORS[(index + offset) % AUTHORS.len()].to_owned())
                .collect(),
            source: (index % 4 != 3).then(|| SOURCES[index % SOURCES.len()].to_owned()),
            ..Item::new(format!("paper-{index}"), TITLES[index % TITLES.len()])
        })
        .collect::<Vec<_>>();
    build_nodes(&items, &style)
}

fn layout(nodes: &[Node], viewport: Vec2, config: &LayoutConfig) -> Vec<Vec2> {
    let rules = CategoryRules::default();
    let edges = derive_edges(nodes, &EdgePolicy::default());
    run_layout(
        &LayoutRequest {
            nodes,
            edges: &edges,
            viewport,
            pinned: &HashMap::new(),
            rules: &rules,
        },
        config,
    )
}

fn seed_layout() -> impl Strategy<Value = SeedLayout> {
    prop_oneof![
        Just(SeedLayout::Circle),
        Just(SeedLayout::YearLanes),
        Just(SeedLayout::CategoryClusters),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn layout_is_deterministic(count in 0usize..40, jitter in 0.0f32..25.0, seed in any::<u64>()) {
        let nodes = nodes(count);
        let config = LayoutConfig {
            jitter,
            jitter_seed: seed,
            iterations: 40,
            ..LayoutConfig::default()
        };
        let viewport = vec2(900.0, 700.0);

        prop_assert_eq!(layout(&nodes, viewport, &config), layout(&nodes, viewport, &config));
    }

    #[test]
    fn free_nodes_stay_inside_padded_viewport(
        count in 0usize..60,
        width in 1.0f32..1500.0,
        height in 1.0f32..1200.0,
        padding in 0.0f32..80.0,
        seed in seed_layout(),
    ) {
        let nodes = nodes(count);
        let config = LayoutConfig {
            seed,
            padding,
            iterations: 30,
            edge_attraction: 0.01,
            ..LayoutConfig::default()
        };
        let positions = layout(&nodes, vec2(width, height), &config);
        let (x_min, x_max) = axis_bounds(width, padding);
        let (y_min, y_max) = axis_bounds(height, padding);

        prop_assert_eq!(positions.len(), count);
        for position in positions {
            prop_assert!(position.x.is_finite() && position.y.is_finite());
            prop_assert!(
                (x_min..=x_max).contains(&position.x),
                "x {} outside {}..{}",
                position.x,
                x_min,
                x_max
            );
            prop_assert!(
                (y_min..=y_max).contains(&position.y),
                "y {} outside {}..{}",
                position.y,
                y_min,
                y_max
            );
        }
    }

    #[test]
    fn stronger_repulsion_never_brings_two_nodes_closer(repulsion in 100.0f32..5000.0) {
        let nodes = nodes(2);
        let viewport = vec2(800.0, 600.0);
        let distance = |repulsion: f32| {
            let config = LayoutConfig {
                repulsion,
                ..LayoutConfig::default()
            };
            let positions = layout(&nodes, viewport, &config);
            (positions[0] - positions[1]).length()
        };

        let weaker = distance(repulsion);
        let stronger = distance(repulsion * 1.5 + 50.0);
        prop_assert!(stronger >= weaker - 1e-3, "{stronger} < {weaker}");
    }

    #[test]
    fn zoom_stays_clamped(steps in proptest::collection::vec(-1.0f32..1.0, 1..80)) {
        let mut view = ViewTransform::default();
        for delta_y in steps {
            view.zoom_at(pos2(320.0, 240.0), delta_y);
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&view.scale));
        }
    }

    #[test]
    fn zoom_keeps_the_point_under_the_cursor(
        x in 0.0f32..1000.0,
        y in 0.0f32..800.0,
        delta_y in prop_oneof![Just(-1.0f32), Just(1.0f32)],
    ) {
        let mut view = ViewTransform {
            offset: vec2(35.0, -20.0),
            scale: 1.2,
        };
        let cursor = pos2(x, y);
        let before = view.to_logical(cursor);
        view.zoom_at(cursor, delta_y);
        let after = view.to_logical(cursor);

        prop_assert!((before - after).length() < 1e-2);
    }

    #[test]
    fn edges_respect_weight_range_and_cap(
        count in 0usize..50,
        dimension in proptest::sample::select(Dimension::ALL.to_vec()),
        threshold in 0.0f32..0.9,
    ) {
        let nodes = nodes(count);
        let policy = EdgePolicy {
            dimension,
            threshold,
            ..EdgePolicy::default()
        };
        let edges = derive_edges(&nodes, &policy);

        prop_assert!(edges.len() <= policy.cap(count));
        for edge in &edges {
            prop_assert!(edge.weight > policy.threshold && edge.weight <= 1.0);
            prop_assert!(edge.source < edge.target && edge.target < count);
        }
    }
}

#[test]
fn generated_papers_link_under_every_dimension() {
    let nodes = nodes(12);
    for dimension in Dimension::ALL {
        let policy = EdgePolicy {
            dimension,
            threshold: 0.0,
            ..EdgePolicy::default()
        };
        assert!(!derive_edges(&nodes, &policy).is_empty(), "{dimension} produced no links");
    }
}
