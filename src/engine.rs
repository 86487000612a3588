use std::collections::{BTreeMap, BTreeSet, HashMap};

use eframe::egui::{Color32, Pos2, Vec2, vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::derive::{CategoryRules, Palette, RadiusMap};
use crate::edges::{Dimension, Edge, EdgePolicy, derive_edges, legend_groups};
use crate::interaction::{Effect, Gesture, Interaction, PointerEvent, hit_test};
use crate::item::Item;
use crate::layout::{LayoutConfig, LayoutRequest, run_layout};
use crate::node::{Node, NodeStyle, build_nodes};
use crate::view::ViewTransform;

/// Viewport changes smaller than this are ignored by [`GraphEngine::resize`].
const RESIZE_EPSILON: f32 = 0.5;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub edges: EdgePolicy,
    pub radius: RadiusMap,
    pub rules: CategoryRules,
    pub palette: Palette,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    NodeClicked(String),
    HoverChanged(Option<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub color: Color32,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub pinned_count: usize,
    pub categories: Vec<CategoryCount>,
    pub edge_groups: Vec<(String, usize)>,
    pub year_range: Option<(i32, i32)>,
}

pub type NodeClickHandler = Box<dyn FnMut(&str)>;

/// Layout session for one item list: nodes, edges, drag overrides and the view transform.
pub struct GraphEngine {
    config: EngineConfig,
    id_set: BTreeSet<String>,
    nodes: Vec<Node>,
    index_by_id: HashMap<String, usize>,
    edges: Vec<Edge>,
    overrides: HashMap<String, Vec2>,
    transform: ViewTransform,
    viewport: Vec2,
    interaction: Interaction,
    layout_revision: u64,
    on_node_click: Option<NodeClickHandler>,
}

impl GraphEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            id_set: BTreeSet::new(),
            nodes: Vec::new(),
            index_by_id: HashMap::new(),
            edges: Vec::new(),
            overrides: HashMap::new(),
            transform: ViewTransform::IDENTITY,
            viewport: Vec2::ZERO,
            interaction: Interaction::default(),
            layout_revision: 0,
            on_node_click: None,
        }
    }

    pub fn set_on_node_click(&mut self, handler: impl FnMut(&str) + 'static) {
        self.on_node_click = Some(Box::new(handler));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn dimension(&self) -> Dimension {
        self.config.edges.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.interaction.hovered()
    }

    pub fn dragged_node(&self) -> Option<&str> {
        match self.interaction.gesture() {
            Gesture::DraggingNode {
                id, moved: true, ..
            } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Bumped on every full relayout.
    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.overrides.contains_key(id)
    }

    /// Logical position of a node: the drag override when present, else the simulated one.
    pub fn position(&self, index: usize) -> Option<Vec2> {
        let node = self.nodes.get(index)?;
        Some(resolved_position(node, &self.overrides))
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        self.index_of(id).and_then(|index| self.position(index))
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.nodes
            .iter()
            .map(|node| resolved_position(node, &self.overrides))
    }

    pub fn node_at(&self, screen: Pos2) -> Option<usize> {
        node_index_at(&self.nodes, &self.overrides, &self.transform, screen)
    }

    /// Replaces the item list. The same id-set keeps positions, overrides and the
    /// transform; a different id-set relays out from scratch and drops overrides.
    pub fn set_items(&mut self, items: &[Item]) {
        let style = NodeStyle {
            rules: &self.config.rules,
            palette: &self.config.palette,
            radius: self.config.radius,
        };
        let mut nodes = build_nodes(items, &style);
        let id_set = nodes
            .iter()
            .map(|node| node.id.clone())
            .collect::<BTreeSet<_>>();

        let unchanged = id_set == self.id_set;
        if unchanged {
            for node in &mut nodes {
                if let Some(previous) = self.node(&node.id) {
                    node.position = previous.position;
                }
            }
        }

        self.index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        self.nodes = nodes;
        self.id_set = id_set;
        self.edges = derive_edges(&self.nodes, &self.config.edges);

        if unchanged {
            debug!(nodes = self.nodes.len(), "item set unchanged, keeping layout");
            return;
        }

        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "item set changed, relaying out"
        );
        self.overrides.clear();
        self.interaction.cancel();
        self.relayout();
    }

    /// Relays out on a real size change; node identity and overrides survive.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = vec2(width.max(0.0), height.max(0.0));
        let delta = viewport - self.viewport;
        if delta.x.abs() < RESIZE_EPSILON && delta.y.abs() < RESIZE_EPSILON {
            return;
        }

        debug!(width = viewport.x, height = viewport.y, "viewport resized");
        self.viewport = viewport;
        self.relayout();
    }

    /// Recomputes edges for another relationship dimension without touching positions.
    pub fn set_dimension(&mut self, dimension: Dimension) {
        if self.config.edges.dimension == dimension {
            return;
        }

        self.config.edges.dimension = dimension;
        self.edges = derive_edges(&self.nodes, &self.config.edges);
        debug!(%dimension, edges = self.edges.len(), "edge dimension changed");
    }

    /// No-op until the host reports a viewport through [`GraphEngine::resize`].
    pub fn relayout(&mut self) {
        if self.viewport == Vec2::ZERO {
            return;
        }

        let positions = run_layout(
            &LayoutRequest {
                nodes: &self.nodes,
                edges: &self.edges,
                viewport: self.viewport,
                pinned: &self.overrides,
                rules: &self.config.rules,
            },
            &self.config.layout,
        );

        for (node, position) in self.nodes.iter_mut().zip(positions) {
            node.position = position;
        }
        self.layout_revision = self.layout_revision.wrapping_add(1);
    }

    /// Clears every drag override and restores the identity transform.
    pub fn reset_view(&mut self) {
        self.transform.reset();
        self.interaction.cancel();
        if self.overrides.is_empty() {
            return;
        }

        self.overrides.clear();
        self.relayout();
    }

    /// Drops any press in progress, e.g. when the host loses track of the button.
    pub fn cancel_gesture(&mut self) {
        self.interaction.cancel();
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<GraphEvent> {
        let (nodes, overrides, transform) = (&self.nodes, &self.overrides, &self.transform);
        let effects = self.interaction.handle(event, |screen| {
            node_index_at(nodes, overrides, transform, screen).map(|index| nodes[index].id.clone())
        });

        let mut events = Vec::new();
        for effect in effects {
            match effect {
                Effect::Pan(delta) => self.transform.pan_by(delta),
                Effect::Zoom { cursor, delta_y } => self.transform.zoom_at(cursor, delta_y),
                Effect::DragNode { id, screen_delta } => {
                    let Some(index) = self.index_of(&id) else {
                        continue;
                    };
                    let current = resolved_position(&self.nodes[index], &self.overrides);
                    let logical_delta = screen_delta / self.transform.scale;
                    self.overrides.insert(id, current + logical_delta);
                }
                Effect::Click(id) => {
                    if let Some(handler) = self.on_node_click.as_mut() {
                        handler(&id);
                    }
                    events.push(GraphEvent::NodeClicked(id));
                }
                Effect::Hover(hovered) => events.push(GraphEvent::HoverChanged(hovered)),
            }
        }

        events
    }

    pub fn stats(&self) -> GraphStats {
        let mut categories: BTreeMap<(usize, &str), usize> = BTreeMap::new();
        for node in &self.nodes {
            *categories
                .entry((self.config.rules.rank(&node.category), node.category.as_str()))
                .or_default() += 1;
        }

        let year_range = self
            .nodes
            .iter()
            .map(|node| node.year)
            .fold(None, |range: Option<(i32, i32)>, year| match range {
                Some((low, high)) => Some((low.min(year), high.max(year))),
                None => Some((year, year)),
            });

        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            pinned_count: self.overrides.len(),
            categories: categories
                .into_iter()
                .map(|((_, category), count)| CategoryCount {
                    category: category.to_owned(),
                    color: self.config.palette.color_for(category),
                    count,
                })
                .collect(),
            edge_groups: legend_groups(&self.edges),
            year_range,
        }
    }
}

fn resolved_position(node: &Node, overrides: &HashMap<String, Vec2>) -> Vec2 {
    overrides.get(&node.id).copied().unwrap_or(node.position)
}

fn node_index_at(
    nodes: &[Node],
    overrides: &HashMap<String, Vec2>,
    transform: &ViewTransform,
    screen: Pos2,
) -> Option<usize> {
    hit_test(
        nodes
            .iter()
            .map(|node| (resolved_position(node, overrides), node.radius)),
        transform,
        screen,
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use eframe::egui::pos2;

    use super::*;

    fn items() -> Vec<Item> {
        vec![
            Item {
                year: Some(2024),
                similarity_score: Some(0.9),
                ..Item::new("A", "agentic planning")
            },
            Item {
                year: Some(2020),
                similarity_score: Some(0.4),
                ..Item::new("B", "retrieval augmented generation")
            },
            Item {
                year: Some(2022),
                ..Item::new("C", "tool use agents")
            },
        ]
    }

    fn engine() -> GraphEngine {
        let mut engine = GraphEngine::new(EngineConfig::default());
        engine.resize(800.0, 600.0);
        engine.set_items(&items());
        engine
    }

    fn screen_of(engine: &GraphEngine, id: &str) -> Pos2 {
        engine
            .transform()
            .to_screen(engine.position_of(id).expect("node exists"))
    }

    fn drag(engine: &mut GraphEngine, from: Pos2, to: Pos2) -> Vec<GraphEvent> {
        let mut events = engine.handle_pointer(PointerEvent::Down { pos: from });
        events.extend(engine.handle_pointer(PointerEvent::Move { pos: to }));
        events.extend(engine.handle_pointer(PointerEvent::Up { pos: to }));
        events
    }

    #[test]
    fn empty_engine_reports_no_data() {
        let mut engine = GraphEngine::new(EngineConfig::default());
        engine.resize(640.0, 480.0);
        engine.set_items(&[]);
        assert!(engine.is_empty());
        assert_eq!(engine.stats(), GraphStats::default());
    }

    #[test]
    fn click_fires_callback_and_event() {
        let mut engine = engine();
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        engine.set_on_node_click(move |id| sink.borrow_mut().push(id.to_owned()));

        let at = screen_of(&engine, "B");
        let events = drag(&mut engine, at, at);

        assert!(events.contains(&GraphEvent::NodeClicked("B".to_owned())));
        assert_eq!(*clicked.borrow(), vec!["B".to_owned()]);
    }

    #[test]
    fn node_drag_writes_scaled_override_without_panning() {
        let mut engine = engine();
        engine.handle_pointer(PointerEvent::Wheel {
            pos: pos2(0.0, 0.0),
            delta_y: -1.0,
        });
        let scale = engine.transform().scale;
        let offset = engine.transform().offset;
        let before = engine.position_of("A").expect("node exists");

        let from = screen_of(&engine, "A");
        let events = drag(&mut engine, from, from + vec2(22.0, -11.0));

        let after = engine.position_of("A").expect("node exists");
        assert!(((after - before) - vec2(22.0, -11.0) / scale).length() < 1e-3);
        assert_eq!(engine.transform().offset, offset);
        assert!(engine.is_pinned("A"));
        assert!(!events.iter().any(|event| matches!(event, GraphEvent::NodeClicked(_))));
    }

    #[test]
    fn background_drag_pans() {
        let mut engine = engine();
        let empty = (0..600)
            .map(|step| pos2(step as f32, 0.0))
            .find(|pos| engine.node_at(*pos).is_none())
            .expect("some empty spot on the top edge");

        drag(&mut engine, empty, empty + vec2(15.0, 25.0));
        assert_eq!(engine.transform().offset, vec2(15.0, 25.0));
        assert_eq!(engine.stats().pinned_count, 0);
    }

    #[test]
    fn dimension_switch_keeps_positions() {
        let mut engine = engine();
        let before = engine.positions().collect::<Vec<_>>();
        let revision = engine.layout_revision();

        engine.set_dimension(Dimension::Year);
        assert_eq!(engine.dimension(), Dimension::Year);
        assert_eq!(engine.positions().collect::<Vec<_>>(), before);
        assert_eq!(engine.layout_revision(), revision);
    }

    #[test]
    fn small_resizes_do_not_relayout() {
        let mut engine = engine();
        let revision = engine.layout_revision();
        engine.resize(800.2, 599.9);
        assert_eq!(engine.layout_revision(), revision);
        engine.resize(900.0, 600.0);
        assert_eq!(engine.layout_revision(), revision + 1);
    }

    #[test]
    fn reset_view_clears_overrides_and_transform() {
        let mut engine = engine();
        let from = screen_of(&engine, "C");
        drag(&mut engine, from, from + vec2(40.0, 40.0));
        engine.handle_pointer(PointerEvent::Wheel {
            pos: pos2(100.0, 100.0),
            delta_y: 1.0,
        });

        engine.reset_view();
        assert_eq!(engine.transform(), ViewTransform::IDENTITY);
        assert!(!engine.is_pinned("C"));
    }

    #[test]
    fn layout_waits_for_a_viewport() {
        let mut engine = GraphEngine::new(EngineConfig::default());
        engine.set_items(&items());
        assert_eq!(engine.layout_revision(), 0);
        assert!(engine.positions().all(|position| position == Vec2::ZERO));

        engine.resize(800.0, 600.0);
        assert_eq!(engine.layout_revision(), 1);
        assert!(engine.positions().any(|position| position != Vec2::ZERO));
    }

    #[test]
    fn cancelled_gesture_stops_panning() {
        let mut engine = engine();
        let empty = (0..600)
            .map(|step| pos2(step as f32, 0.0))
            .find(|pos| engine.node_at(*pos).is_none())
            .expect("some empty spot on the top edge");

        engine.handle_pointer(PointerEvent::Down { pos: empty });
        engine.cancel_gesture();
        engine.handle_pointer(PointerEvent::Move {
            pos: empty + vec2(30.0, 30.0),
        });
        assert_eq!(engine.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn stats_group_categories_in_rule_order() {
        let stats = engine().stats();
        let names = stats
            .categories
            .iter()
            .map(|entry| (entry.category.as_str(), entry.count))
            .collect::<Vec<_>>();
        assert_eq!(names, vec![("agentic-ai", 2), ("rag", 1)]);
        assert_eq!(stats.year_range, Some((2020, 2024)));
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.edge_groups, vec![("agentic-ai".to_owned(), 1)]);
    }
}
