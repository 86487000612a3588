use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use paper_graph::search::matching_nodes;
use paper_graph::util::short_label;

use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, segment_visible, to_window,
};
use super::super::{SearchCache, ViewModel};

const LABEL_ZOOM: f32 = 1.4;
const LABEL_CHARS: usize = 42;
const HOVER_CHARS: usize = 90;

impl ViewModel {
    fn refresh_search_cache(&mut self) {
        let query = self.search.trim();
        if query.is_empty() {
            self.search_cache = None;
            return;
        }

        let revision = self.engine.layout_revision();
        if self
            .search_cache
            .as_ref()
            .is_some_and(|cached| cached.query == query && cached.layout_revision == revision)
        {
            return;
        }

        self.search_cache = Some(SearchCache {
            query: query.to_owned(),
            layout_revision: revision,
            matches: matching_nodes(self.engine.nodes(), query),
        });
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.engine.resize(rect.width(), rect.height());
        self.handle_canvas_input(ui, rect, &response);
        self.refresh_search_cache();

        let painter = ui.painter_at(rect);
        let view = self.engine.transform();
        draw_background(&painter, rect, &view);

        if self.engine.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No data",
                FontId::proportional(18.0),
                Color32::from_gray(170),
            );
            return;
        }

        if response.dragged() || self.pointer_captured {
            ui.ctx().request_repaint();
        }

        let nodes = self.engine.nodes();
        let positions = self
            .engine
            .positions()
            .map(|position| to_window(rect, &view, position))
            .collect::<Vec<_>>();
        let matches = self.search_cache.as_ref().map(|cache| &cache.matches);
        let selected_index = self
            .selected
            .as_deref()
            .and_then(|id| self.engine.index_of(id));
        let hovered_index = self.engine.hovered().and_then(|id| self.engine.index_of(id));
        let zoom_sqrt = view.scale.sqrt();

        if self.show_edges {
            for edge in self.engine.edges() {
                let start = positions[edge.source];
                let end = positions[edge.target];
                if !segment_visible(rect, start, end) {
                    continue;
                }

                let touches_selection = selected_index
                    .is_some_and(|index| edge.source == index || edge.target == index);
                let (width, color) = if touches_selection {
                    (
                        ((1.4 + edge.weight * 1.8) * zoom_sqrt).clamp(1.2, 4.8),
                        Color32::from_rgb(246, 206, 104),
                    )
                } else {
                    let alpha = (40.0 + edge.weight * 150.0) as u8;
                    (
                        ((0.5 + edge.weight * 1.6) * zoom_sqrt).clamp(0.45, 3.4),
                        Color32::from_rgba_unmultiplied(150, 160, 176, alpha),
                    )
                };
                painter.line_segment([start, end], Stroke::new(width, color));
            }
        }

        let selected_color = Color32::from_rgb(245, 206, 93);
        let outline = Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190));

        // Reverse order so the first node, which wins hit-testing, is painted on top.
        for index in (0..nodes.len()).rev() {
            let node = &nodes[index];
            let position = positions[index];
            let radius = node.radius * view.scale;
            if !circle_visible(rect, position, radius + 6.0) {
                continue;
            }

            let is_selected = selected_index == Some(index);
            let is_hovered = hovered_index == Some(index);
            let is_match = matches.is_some_and(|matches| matches.contains(&index));

            let color = if is_hovered {
                blend_color(node.color, Color32::WHITE, 0.3)
            } else if is_match {
                blend_color(node.color, Color32::from_rgb(103, 196, 255), 0.35)
            } else if matches.is_some() {
                dim_color(node.color, 0.38)
            } else {
                node.color
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(position, radius, outline);
            if self.engine.is_pinned(&node.id) {
                painter.circle_stroke(
                    position,
                    radius + 2.0,
                    Stroke::new(1.0, Color32::from_gray(225)),
                );
            }
            if is_selected {
                painter.circle_stroke(position, radius + 4.5, Stroke::new(2.0, selected_color));
            }

            let draw_label = self.show_labels
                && (is_selected || is_hovered || is_match || view.scale >= LABEL_ZOOM);
            if draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_label(&node.title, LABEL_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered_index {
            let node = &nodes[index];
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  {}",
                    short_label(&node.title, HOVER_CHARS),
                    node.category,
                    node.year
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let cursor = if self.engine.dragged_node().is_some() {
            Some(egui::CursorIcon::Grabbing)
        } else if hovered_index.is_some() {
            Some(egui::CursorIcon::PointingHand)
        } else {
            None
        };
        if let Some(cursor) = cursor {
            ui.output_mut(|output| output.cursor_icon = cursor);
        }
    }
}
