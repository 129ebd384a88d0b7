use std::fmt::Write as _;

use eframe::egui::{RichText, Ui};

use super::super::{RenderGraph, ViewModel};

fn push_section(text: &mut String, heading: &str, names: &[&str]) {
    if names.is_empty() {
        return;
    }
    let _ = write!(text, "\n\n{heading}:");
    for name in names {
        let _ = write!(text, "\n- {name}");
    }
}

/// Hover text for a node: name, description and both relationship directions.
pub(in crate::app) fn node_tooltip(graph: &RenderGraph, index: usize) -> String {
    let Some(node) = graph.nodes.get(index) else {
        return String::new();
    };

    let mut text = format!("{}\n{}", node.name, node.description);
    push_section(&mut text, "Used by", &graph.users_of(index));
    push_section(&mut text, "Uses data from", &graph.dependencies_of(index));
    text
}

pub(in crate::app) fn edge_tooltip(graph: &RenderGraph, edge_index: usize) -> String {
    let Some(edge) = graph.edges.get(edge_index) else {
        return String::new();
    };
    let source = graph.nodes[edge.source].name.as_str();
    let target = graph.nodes[edge.target].name.as_str();
    format!("{source} → {target}\n{target} uses data from {source}")
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Asset Details");
        ui.add_space(6.0);

        let Some(selected) = self.mode.selected().map(str::to_owned) else {
            ui.label("Click an asset in the graph or the list to inspect it.");
            return;
        };

        let Some(entity) = self.store.get(&selected).cloned() else {
            ui.label("The selected asset no longer exists in the catalog.");
            return;
        };

        ui.label(RichText::new(entity.name.as_str()).strong());
        if entity.description.is_empty() {
            ui.small("No description");
        } else {
            ui.label(entity.description.as_str());
        }

        let mut activated = None;

        ui.separator();
        ui.label(RichText::new("Uses data from").strong());
        if entity.relationships.is_empty() {
            ui.label("Nothing, this is a source asset.");
        }
        for name in entity.relationship_names() {
            if ui.link(name).clicked() {
                activated = Some(name.to_owned());
            }
        }

        ui.separator();
        ui.label(RichText::new("Used by").strong());
        let users = self.store.users_of(&entity.name);
        if users.is_empty() {
            ui.label("No asset uses this one yet.");
        }
        for name in users {
            if ui.link(name).clicked() {
                activated = Some(name.to_owned());
            }
        }

        ui.add_space(8.0);
        if ui.button("Edit asset").clicked() {
            self.editor.start_edit(&entity);
        }

        if let Some(name) = activated {
            self.search.clear();
            self.mode.click_node(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entity, sample_entities};

    #[test]
    fn node_tooltip_lists_both_directions() {
        let graph = RenderGraph::from_entities(&sample_entities());
        let index = graph.index_of("Data Asset 3").expect("present");

        assert_eq!(
            node_tooltip(&graph, index),
            "Data Asset 3\nDescription for Data Asset 3\
             \n\nUsed by:\n- Data Asset 5\
             \n\nUses data from:\n- Data Asset 1\n- Data Asset 2"
        );
    }

    #[test]
    fn isolated_node_tooltip_has_no_sections() {
        let graph = RenderGraph::from_entities(&sample_entities());
        let index = graph.index_of("Data Asset 4").expect("present");
        assert_eq!(
            node_tooltip(&graph, index),
            "Data Asset 4\nDescription for Data Asset 4"
        );
        assert_eq!(node_tooltip(&graph, 99), "");
    }

    #[test]
    fn unresolved_sources_still_appear_in_the_tooltip() {
        let entities = vec![
            Entity::new("orders", ""),
            Entity::new("revenue", "daily").using(["orders", "fx rates"]),
        ];
        let graph = RenderGraph::from_entities(&entities);
        let index = graph.index_of("revenue").expect("present");

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(
            node_tooltip(&graph, index),
            "revenue\ndaily\n\nUses data from:\n- orders\n- fx rates"
        );
    }

    #[test]
    fn edge_tooltip_states_the_data_flow() {
        let graph = RenderGraph::from_entities(&sample_entities());
        assert_eq!(
            edge_tooltip(&graph, 0),
            "Data Asset 1 → Data Asset 2\nData Asset 2 uses data from Data Asset 1"
        );
        assert_eq!(edge_tooltip(&graph, 42), "");
    }
}
