use std::collections::HashMap;
use std::path::PathBuf;

use eframe::egui::{self, Context, Vec2};

use crate::catalog::AssetStore;
use crate::config::ViewerConfig;

mod export;
mod geometry;
mod graph;
mod highlight;
mod physics;
mod render_utils;
mod ui;

pub use export::export_svg;

use graph::GraphScene;
use highlight::{InteractionMode, StyleTable};
use ui::EditorState;

/// Where the viewer reads its catalog and settings from.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    pub catalog: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

pub struct AssetLineageApp {
    options: LaunchOptions,
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    store: AssetStore,
    config: ViewerConfig,
    config_path: Option<PathBuf>,
    catalog_label: String,
    mode: InteractionMode,
    search: String,
    scene: Option<GraphScene>,
    rebuild_requested: bool,
    styles: StyleTable,
    editor: EditorState,
    export_path: String,
    status: Option<String>,
}

/// Per-pass node: identity from the catalog plus simulation state.
struct GraphNode {
    id: String,
    name: String,
    description: String,
    /// Relationship names as written in the catalog, resolved or not.
    uses: Vec<String>,
    radius: f32,
    depth: usize,
    pos: Vec2,
    velocity: Vec2,
    pinned: Option<Vec2>,
}

/// Directed from the used asset to the asset using it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GraphEdge {
    source: usize,
    target: usize,
}

struct RenderGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    max_depth: usize,
}

impl AssetLineageApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::load(&options);
        Self { options, state }
    }

    fn load(options: &LaunchOptions) -> AppState {
        match ViewModel::load(options) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => {
                tracing::error!(error = format!("{error:#}"), "failed to load catalog");
                AppState::Error(format!("{error:#}"))
            }
        }
    }
}

impl eframe::App for AssetLineageApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the asset catalog");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::load(&self.options));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    /// Rebuilds the render pass when the catalog or the canvas size changed.
    fn ensure_scene(&mut self, viewport: Vec2) {
        let revision = self.store.revision();
        let current = self
            .scene
            .as_ref()
            .is_some_and(|scene| scene.is_current(revision, viewport));
        if current && !self.rebuild_requested {
            return;
        }

        self.rebuild_requested = false;
        let previous = self.scene.take();
        self.scene = Some(GraphScene::build(
            self.store.entities(),
            viewport,
            &self.config.layout,
            revision,
            previous.as_ref(),
        ));
    }
}
