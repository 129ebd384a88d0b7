use std::path::PathBuf;

use anyhow::Context as _;
use eframe::egui::{self, Align, Context, Layout};

use crate::catalog::{self, AssetStore};
use crate::config;

use super::super::export::write_scene_svg;
use super::super::graph::GraphEvent;
use super::super::highlight::{Highlight, InteractionMode, StyleTable};
use super::super::{LaunchOptions, ViewModel};
use super::EditorState;

const DEFAULT_EXPORT_PATH: &str = "asset-lineage.svg";

impl ViewModel {
    pub(in crate::app) fn load(options: &LaunchOptions) -> anyhow::Result<Self> {
        let mut config = config::load_or_default(options.config_path.as_deref());
        if let Some(seed) = options.seed {
            config.layout.seed = Some(seed);
        }

        let entities = catalog::load_or_sample(options.catalog.as_deref())?;
        let store = AssetStore::new(entities).context("catalog failed validation")?;
        let catalog_label = options
            .catalog
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "sample assets".to_owned());

        Ok(Self {
            store,
            config,
            config_path: options.config_path.clone(),
            catalog_label,
            mode: InteractionMode::Neutral,
            search: String::new(),
            scene: None,
            rebuild_requested: false,
            styles: StyleTable::standard(),
            editor: EditorState::default(),
            export_path: DEFAULT_EXPORT_PATH.to_owned(),
            status: None,
        })
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Asset Lineage");
                    ui.separator();
                    ui.label(format!("catalog: {}", self.catalog_label));
                    ui.label(format!("assets: {}", self.store.len()));
                    let edge_count = self
                        .scene
                        .as_ref()
                        .map_or(0, |scene| scene.graph().edges.len());
                    ui.label(format!("connections: {edge_count}"));
                    if ui
                        .button("Rebuild layout")
                        .on_hover_text("Run a fresh layout pass.")
                        .clicked()
                    {
                        self.rebuild_requested = true;
                    }
                    if ui
                        .button("Reheat")
                        .on_hover_text("Let the current layout settle again.")
                        .clicked()
                        && let Some(scene) = self.scene.as_mut()
                    {
                        scene.reheat();
                    }
                    ui.separator();
                    ui.add(egui::TextEdit::singleline(&mut self.export_path).desired_width(180.0));
                    if ui.button("Export SVG").clicked() {
                        self.export_current();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
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
            .show(ctx, |ui| {
                self.draw_details(ui);
                ui.separator();
                self.draw_editor(ui);
            });

        let events = egui::CentralPanel::default()
            .show(ctx, |ui| self.draw_graph(ui))
            .inner;
        self.apply_events(events);
    }

    /// Selects `id`, or clears it when it is already selected. Leaves search mode.
    pub(super) fn activate(&mut self, id: &str) {
        self.search.clear();
        self.mode.click_node(id);
    }

    fn apply_events(&mut self, events: Vec<GraphEvent>) {
        for event in events {
            match event {
                GraphEvent::NodeActivated(id) => self.activate(&id),
                GraphEvent::FilterReset => {
                    self.search.clear();
                    self.mode.click_background();
                }
            }
        }
    }

    fn export_current(&mut self) {
        let path = PathBuf::from(self.export_path.trim());
        let result = match &self.scene {
            Some(scene) => {
                let highlight = Highlight::compute(scene.graph(), &self.mode);
                write_scene_svg(scene, &highlight, &self.styles, &path)
            }
            None => Err(anyhow::anyhow!("the graph has not been laid out yet")),
        };

        self.status = Some(match result {
            Ok(()) => format!("Exported {}", path.display()),
            Err(error) => {
                tracing::warn!(error = format!("{error:#}"), "svg export failed");
                format!("Export failed: {error:#}")
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use tempfile::tempdir;

    use super::*;

    fn model(dir: &std::path::Path) -> ViewModel {
        ViewModel::load(&LaunchOptions {
            catalog: None,
            config_path: Some(dir.join("viewer.toml")),
            seed: Some(11),
        })
        .expect("sample catalog loads")
    }

    #[test]
    fn load_applies_seed_override_and_sample_catalog() {
        let dir = tempdir().expect("tempdir");
        let model = model(dir.path());
        assert_eq!(model.config.layout.seed, Some(11));
        assert_eq!(model.store.len(), 5);
        assert_eq!(model.catalog_label, "sample assets");
    }

    #[test]
    fn load_reports_invalid_catalogs() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"name": "a"}, {"name": "a"}]"#).expect("write");

        let error = ViewModel::load(&LaunchOptions {
            catalog: Some(path),
            ..LaunchOptions::default()
        })
        .err()
        .expect("duplicate names are rejected");
        assert!(format!("{error:#}").contains("already exists"));
    }

    #[test]
    fn graph_events_drive_the_interaction_mode() {
        let dir = tempdir().expect("tempdir");
        let mut model = model(dir.path());
        model.search = "asset".to_owned();
        model.mode.set_search("asset", model.store.entities());

        model.apply_events(vec![GraphEvent::NodeActivated("Data Asset 2".to_owned())]);
        assert_eq!(model.mode.selected(), Some("Data Asset 2"));
        assert!(model.search.is_empty());

        model.apply_events(vec![GraphEvent::NodeActivated("Data Asset 2".to_owned())]);
        assert_eq!(model.mode, InteractionMode::Neutral);

        model.apply_events(vec![
            GraphEvent::NodeActivated("Data Asset 1".to_owned()),
            GraphEvent::FilterReset,
        ]);
        assert_eq!(model.mode, InteractionMode::Neutral);
    }

    #[test]
    fn scene_is_rebuilt_after_catalog_changes() {
        let dir = tempdir().expect("tempdir");
        let mut model = model(dir.path());
        let viewport = vec2(800.0, 600.0);

        model.ensure_scene(viewport);
        assert_eq!(model.scene.as_ref().map(|s| s.graph().nodes.len()), Some(5));

        model
            .store
            .add(catalog::Entity::new("Data Asset 6", "late").using(["Data Asset 4"]))
            .expect("add");
        model.ensure_scene(viewport);
        let scene = model.scene.as_ref().expect("scene");
        assert_eq!(scene.graph().nodes.len(), 6);
        assert_eq!(scene.graph().edges.len(), 5);
    }

    #[test]
    fn export_without_scene_sets_a_failure_status() {
        let dir = tempdir().expect("tempdir");
        let mut model = model(dir.path());
        model.export_path = dir.path().join("out.svg").display().to_string();
        model.export_current();
        assert!(model.status.as_deref().is_some_and(|s| s.starts_with("Export failed")));

        model.ensure_scene(vec2(640.0, 480.0));
        model.export_current();
        assert!(model.status.as_deref().is_some_and(|s| s.starts_with("Exported")));
        assert!(dir.path().join("out.svg").exists());
    }
}
