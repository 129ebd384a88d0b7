mod app;
mod catalog;
mod config;
mod util;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use eframe::egui::vec2;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Catalog JSON file. The bundled sample assets are used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Viewer settings file, defaults to the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed layout seed for reproducible positions.
    #[arg(long)]
    seed: Option<u64>,
    /// Write one laid-out pass to this SVG file and exit.
    #[arg(long, value_name = "FILE")]
    export_svg: Option<PathBuf>,
    /// Export canvas width.
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    /// Export canvas height.
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    if let Some(path) = &args.export_svg {
        let mut config = config::load_or_default(args.config.as_deref());
        if let Some(seed) = args.seed {
            config.layout.seed = Some(seed);
        }
        let entities = catalog::load_or_sample(args.catalog.as_deref())?;
        return app::export_svg(&entities, vec2(args.width, args.height), &config.layout, path);
    }

    let window_size = config::load_or_default(args.config.as_deref()).view.window_size;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size(window_size),
        ..Default::default()
    };
    let launch = app::LaunchOptions {
        catalog: args.catalog,
        config_path: args.config,
        seed: args.seed,
    };

    eframe::run_native(
        "Asset Lineage",
        options,
        Box::new(move |cc| Ok(Box::new(app::AssetLineageApp::new(cc, launch)))),
    )
    .map_err(|error| anyhow!("failed to start the viewer: {error}"))
}
