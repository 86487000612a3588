use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};
use tracing::info;

use paper_graph::{GraphEngine, Item, Profile};

use super::super::{ViewModel, ViewSettings};

impl ViewModel {
    pub(in crate::app) fn new(items: Vec<Item>, settings: ViewSettings) -> Self {
        let engine = Self::build_engine(&items, &settings, None);

        Self {
            items,
            engine,
            settings,
            search: String::new(),
            search_cache: None,
            selected: None,
            pointer_captured: false,
            canvas_hovered: false,
            show_edges: true,
            show_labels: true,
        }
    }

    fn build_engine(
        items: &[Item],
        settings: &ViewSettings,
        viewport: Option<(f32, f32)>,
    ) -> GraphEngine {
        let config = settings
            .custom_config
            .clone()
            .unwrap_or_else(|| settings.profile.config());
        let mut engine = GraphEngine::new(config);
        if let Some(dimension) = settings.dimension {
            engine.set_dimension(dimension);
        }
        if let Some((width, height)) = viewport {
            engine.resize(width, height);
        }
        engine.set_items(items);
        engine
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        items_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("paper-graph");
                    ui.separator();
                    ui.label(format!("source: {}", items_path.display()));
                    ui.label(format!("view: {}", self.settings.profile.label()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload papers"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.engine.reset_view();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.graph_summary_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    pub(in crate::app) fn apply_profile(&mut self, profile: Profile) {
        if self.settings.profile == profile && self.settings.custom_config.is_none() {
            return;
        }

        info!(profile = profile.label(), "switching view profile");
        self.settings.profile = profile;
        self.settings.dimension = None;
        self.settings.custom_config = None;

        let viewport = self.engine.viewport();
        self.engine =
            Self::build_engine(&self.items, &self.settings, Some((viewport.x, viewport.y)));
        self.search_cache = None;
    }

    pub(in crate::app) fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.engine.set_items(&self.items);
        self.search_cache = None;

        if let Some(selected) = &self.selected
            && self.engine.node(selected).is_none()
        {
            self.selected = None;
        }
    }

    fn graph_summary_text(&self) -> String {
        let stats = self.engine.stats();
        let mut text = format!("{} papers / {} links", stats.node_count, stats.edge_count);
        if stats.pinned_count > 0 {
            text.push_str(&format!(" / {} pinned", stats.pinned_count));
        }
        text.push_str(&format!(" / zoom {:.0}%", self.engine.transform().scale * 100.0));
        text
    }
}
