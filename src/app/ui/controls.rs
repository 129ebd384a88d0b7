use eframe::egui::{self, Color32, RichText, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::Entity;
use crate::config;

use super::super::ViewModel;
use super::super::highlight::{EdgeRole, InteractionMode, NodeRole};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Orders the substring matches for display: name hits first, then by fuzzy
/// score, ties in catalog order. The match set itself is not changed.
pub(super) fn ranked_matches<'a>(
    entities: &'a [Entity],
    matches: &[String],
    term: &str,
) -> Vec<&'a Entity> {
    let matcher = SkimMatcherV2::default();
    let query = term.trim();

    let mut ranked = entities
        .iter()
        .filter(|entity| matches.contains(&entity.name))
        .map(|entity| {
            let key = (
                fuzzy_match_score(&matcher, &entity.name, query),
                fuzzy_match_score(&matcher, &entity.description, query),
            );
            (key, entity)
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|(a, _), (b, _)| b.cmp(a));
    ranked.into_iter().map(|(_, entity)| entity).collect()
}

fn legend_swatch(ui: &mut Ui, fill: Color32, stroke: Color32, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter()
            .circle(rect.center(), 6.0, fill, egui::Stroke::new(1.5, stroke));
        ui.label(text);
    });
}

fn legend_line(ui: &mut Ui, color: Color32, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().line_segment(
            [rect.left_center(), rect.right_center()],
            egui::Stroke::new(3.0, color),
        );
        ui.label(text);
    });
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Assets");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search")
            .on_hover_text("Matches asset names and descriptions, ignoring case.");
        let search_response = ui.text_edit_singleline(&mut self.search);
        if search_response.changed() {
            self.mode.set_search(&self.search, self.store.entities());
        }

        let mut activated = None;

        if let InteractionMode::SearchActive { term, matches } = &self.mode {
            ui.add_space(4.0);
            if matches.is_empty() {
                ui.label(RichText::new("No assets match").italics());
            } else {
                ui.label(format!("{} result(s)", matches.len()));
                for entity in ranked_matches(self.store.entities(), matches, term) {
                    if ui
                        .link(entity.name.as_str())
                        .on_hover_text(entity.description.as_str())
                        .clicked()
                    {
                        activated = Some(entity.name.clone());
                    }
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("All assets").strong());
        if self.store.is_empty() {
            ui.label("The catalog is empty. Add an asset to get started.");
        }
        let selected = self.mode.selected().map(str::to_owned);
        egui::ScrollArea::vertical()
            .id_salt("asset_list_scroll")
            .max_height(320.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for entity in self.store.entities() {
                    let is_selected = selected.as_deref() == Some(entity.name.as_str());
                    if ui
                        .selectable_label(is_selected, entity.name.as_str())
                        .on_hover_text(entity.description.as_str())
                        .clicked()
                    {
                        activated = Some(entity.name.clone());
                    }
                    if !entity.relationships.is_empty() {
                        let sources = entity.relationship_names().collect::<Vec<_>>().join(", ");
                        ui.small(format!("Uses data from: {sources}"));
                    }
                }
            });

        if let Some(name) = activated {
            self.activate(&name);
        }

        ui.separator();
        ui.collapsing("Legend", |ui| {
            for (role, text) in [
                (NodeRole::Default, "Asset"),
                (NodeRole::Selected, "Selected or search match"),
                (NodeRole::DirectDependency, "Direct data source"),
                (NodeRole::DirectUser, "Direct user"),
            ] {
                let style = self.styles.node(role);
                legend_swatch(ui, style.fill, style.stroke, text);
            }
            for (role, text) in [
                (EdgeRole::Incoming, "Data flowing in"),
                (EdgeRole::Outgoing, "Data flowing out"),
            ] {
                legend_line(ui, self.styles.edge(role).stroke, text);
            }
        });

        ui.collapsing("View settings", |ui| {
            ui.checkbox(&mut self.config.view.show_labels, "Show labels")
                .on_hover_text("Draw asset names inside the circles.");
            ui.checkbox(&mut self.config.view.edge_tooltips, "Edge tooltips")
                .on_hover_text("Describe the data flow when hovering a connection.");
            ui.checkbox(&mut self.config.layout.preserve_positions, "Keep positions on rebuild")
                .on_hover_text("Start a new layout from the previous node positions.");

            if ui.button("Save settings").clicked() {
                self.status = Some(match config::save(&self.config, self.config_path.as_deref()) {
                    Ok(()) => "Settings saved".to_owned(),
                    Err(error) => {
                        tracing::warn!(error = format!("{error:#}"), "failed to save settings");
                        format!("Saving settings failed: {error:#}")
                    }
                });
            }
        });
    }
}
