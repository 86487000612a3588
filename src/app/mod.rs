use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use paper_graph::{Dimension, EngineConfig, GraphEngine, Item, Profile, load_items};

mod graph;
mod render_utils;
mod ui;

type LoadResult = Result<Vec<Item>, String>;

pub struct PaperGraphApp {
    items_path: PathBuf,
    settings: ViewSettings,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

/// Startup choices from the command line, reapplied on every reload.
#[derive(Clone)]
pub struct ViewSettings {
    pub profile: Profile,
    pub dimension: Option<Dimension>,
    pub custom_config: Option<EngineConfig>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    items: Vec<Item>,
    engine: GraphEngine,
    settings: ViewSettings,
    search: String,
    search_cache: Option<SearchCache>,
    selected: Option<String>,
    pointer_captured: bool,
    canvas_hovered: bool,
    show_edges: bool,
    show_labels: bool,
}

struct SearchCache {
    query: String,
    layout_revision: u64,
    matches: HashSet<usize>,
}

impl PaperGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        items_path: PathBuf,
        settings: ViewSettings,
    ) -> Self {
        let state = Self::start_load(items_path.clone());
        Self {
            items_path,
            settings,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(items_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_items(&items_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(items_path: PathBuf) -> AppState {
        info!(path = %items_path.display(), "loading items");
        AppState::Loading {
            rx: Self::spawn_load(items_path),
        }
    }

    fn ready_state(&self, result: LoadResult) -> AppState {
        match result {
            Ok(items) => AppState::Ready(Box::new(ViewModel::new(items, self.settings.clone()))),
            Err(message) => {
                error!(%message, "failed to load items");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for PaperGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading papers...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load papers");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.items_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.items_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(items)) => {
                            // Same papers keep their dragged positions and view.
                            model.replace_items(items);
                        }
                        Ok(Err(message)) => transition = Some(Err(message)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.items_path.clone());
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.ready_state(result);
        }
    }
}
