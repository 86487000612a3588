use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

const MAX_RELATED: usize = 32;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a paper in the graph to inspect it.");
            return;
        };

        let Some(index) = self.engine.index_of(&selected_id) else {
            ui.label("Selected paper is no longer in the graph.");
            return;
        };
        let node = &self.engine.nodes()[index];

        ui.label(RichText::new(node.title.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("\u{25cf}").color(node.color));
            ui.label(format!("Category: {}", node.category));
        });
        ui.label(format!("Year: {}", node.year));
        ui.label(format!("Importance: {:.2}", node.importance));
        if !node.authors.is_empty() {
            ui.label(format!("Authors: {}", node.authors.join(", ")));
        }
        if let Some(source) = &node.source {
            ui.label(format!("Source: {source}"));
        }
        if self.engine.is_pinned(&node.id) {
            ui.label(RichText::new("Pinned by drag").italics());
        }

        ui.separator();

        let mut related = self
            .engine
            .edges()
            .iter()
            .filter_map(|edge| {
                let other = if edge.source == index {
                    edge.target
                } else if edge.target == index {
                    edge.source
                } else {
                    return None;
                };
                Some((other, edge.weight, edge.reason.as_str()))
            })
            .collect::<Vec<_>>();
        related.sort_by(|left, right| right.1.total_cmp(&left.1).then(left.0.cmp(&right.0)));

        ui.label(
            RichText::new(format!(
                "Related by {} ({})",
                self.engine.dimension().label(),
                related.len()
            ))
            .strong(),
        );
        if related.is_empty() {
            ui.small("No links for this paper.");
            return;
        }

        let mut next_selection = None;
        egui::ScrollArea::vertical()
            .id_salt("related_papers")
            .show(ui, |ui| {
                for (other, weight, reason) in related.into_iter().take(MAX_RELATED) {
                    let other_node = &self.engine.nodes()[other];
                    let response = ui
                        .selectable_label(false, other_node.title.as_str())
                        .on_hover_text(other_node.id.as_str());
                    ui.small(format!("{reason} (weight {weight:.2})"));
                    if response.clicked() {
                        next_selection = Some(other_node.id.clone());
                    }
                }
            });

        if next_selection.is_some() {
            self.set_selected(next_selection);
        }
    }
}
