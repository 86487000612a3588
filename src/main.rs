mod app;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_graph::{Dimension, EngineConfig, Profile};

use app::{PaperGraphApp, ViewSettings};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with the papers to display.
    items: PathBuf,

    #[arg(long, value_enum, default_value_t = Profile::PaperGraph)]
    profile: Profile,

    /// Relationship used for links; defaults to the profile's choice.
    #[arg(long, value_enum)]
    dimension: Option<Dimension>,

    /// JSON engine configuration that replaces the profile defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let custom_config = args.config.as_deref().map(load_config).transpose()?;
    let settings = ViewSettings {
        profile: args.profile,
        dimension: args.dimension,
        custom_config,
    };
    info!(
        items = %args.items.display(),
        profile = settings.profile.label(),
        "starting paper-graph"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let items_path = args.items;
    eframe::run_native(
        "paper-graph",
        options,
        Box::new(move |cc| Ok(Box::new(PaperGraphApp::new(cc, items_path, settings)))),
    )
    .map_err(|err| {
        error!(error = %err, "graph window failed");
        anyhow!("visualization unavailable: {err}")
    })
}
