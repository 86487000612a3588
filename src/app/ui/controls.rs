use eframe::egui::{self, RichText, Ui};

use paper_graph::{Dimension, Profile};

use super::super::ViewModel;

const PROFILES: [Profile; 4] = [
    Profile::PaperGraph,
    Profile::Similarity,
    Profile::Timeline,
    Profile::Relationship,
];

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (title or id)")
            .on_hover_text("Fuzzy-highlight matching papers without changing the layout.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Non-matching papers are dimmed while a query is active.");

        ui.separator();

        let mut profile = self.settings.profile;
        egui::ComboBox::from_label("View")
            .selected_text(profile.label())
            .show_ui(ui, |ui| {
                for candidate in PROFILES {
                    ui.selectable_value(&mut profile, candidate, candidate.label());
                }
            });
        if profile != self.settings.profile {
            self.apply_profile(profile);
        }

        let mut dimension = self.engine.dimension();
        egui::ComboBox::from_label("Relationship")
            .selected_text(dimension.label())
            .show_ui(ui, |ui| {
                for candidate in Dimension::ALL {
                    ui.selectable_value(&mut dimension, candidate, candidate.label());
                }
            });
        if dimension != self.engine.dimension() {
            self.settings.dimension = Some(dimension);
            self.engine.set_dimension(dimension);
        }

        ui.separator();

        ui.checkbox(&mut self.show_edges, "Show links")
            .on_hover_text("Draw relationship links between papers.");
        ui.checkbox(&mut self.show_labels, "Show labels")
            .on_hover_text("Label papers when zoomed in, hovered or selected.");

        ui.horizontal(|ui| {
            if ui
                .button("Reset view")
                .on_hover_text("Restore zoom and pan, and release every dragged paper.")
                .clicked()
            {
                self.engine.reset_view();
            }
            if ui
                .button("Re-run layout")
                .on_hover_text("Run the layout again; dragged papers stay where they are.")
                .clicked()
            {
                self.engine.relayout();
            }
        });

        ui.separator();
        self.draw_legend(ui);
    }

    fn draw_legend(&self, ui: &mut Ui) {
        let stats = self.engine.stats();

        ui.label(RichText::new("Categories").strong());
        if stats.categories.is_empty() {
            ui.small("No papers loaded.");
        }
        for entry in &stats.categories {
            ui.horizontal(|ui| {
                ui.label(RichText::new("\u{25cf}").color(entry.color));
                ui.label(format!("{} ({})", entry.category, entry.count));
            });
        }

        if let Some((first, last)) = stats.year_range {
            ui.add_space(4.0);
            if first == last {
                ui.small(format!("Year: {first}"));
            } else {
                ui.small(format!("Years: {first} to {last}"));
            }
        }

        ui.add_space(6.0);
        ui.label(RichText::new(format!("Links by {}", self.engine.dimension().label())).strong());
        if stats.edge_groups.is_empty() {
            ui.small("No links above the threshold.");
        }
        egui::ScrollArea::vertical()
            .id_salt("legend_groups")
            .max_height(220.0)
            .show(ui, |ui| {
                for (group, count) in &stats.edge_groups {
                    ui.small(format!("{group}: {count}"));
                }
            });

        if stats.pinned_count > 0 {
            ui.add_space(6.0);
            ui.small(format!("{} paper(s) pinned by dragging", stats.pinned_count));
        }
    }
}
