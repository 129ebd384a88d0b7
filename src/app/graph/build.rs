use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;

use crate::catalog::Entity;

use super::super::{GraphEdge, GraphNode, RenderGraph};
use super::depth::{compute_depths, max_depth};

const MIN_NODE_RADIUS: f32 = 30.0;
const RADIUS_PER_CHAR: f32 = 4.0;

pub(in crate::app) fn node_radius(name: &str) -> f32 {
    (name.chars().count() as f32 * RADIUS_PER_CHAR).max(MIN_NODE_RADIUS)
}

/// One node per entity, in catalog order. Later entities reusing a name are skipped.
pub(in crate::app) fn build_nodes(entities: &[Entity]) -> Vec<GraphNode> {
    let mut seen = HashSet::with_capacity(entities.len());
    let mut nodes = Vec::with_capacity(entities.len());
    for entity in entities {
        if !seen.insert(entity.name.as_str()) {
            tracing::debug!(name = %entity.name, "duplicate asset name skipped");
            continue;
        }

        nodes.push(GraphNode {
            id: entity.name.clone(),
            name: entity.name.clone(),
            description: entity.description.clone(),
            uses: entity.relationship_names().map(str::to_owned).collect(),
            radius: node_radius(&entity.name),
            depth: 0,
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pinned: None,
        });
    }
    nodes
}

/// Edges point from the used asset to its user. References that do not
/// resolve to a node are dropped, as are self references.
pub(in crate::app) fn build_edges(entities: &[Entity], nodes: &[GraphNode]) -> Vec<GraphEdge> {
    let index_by_id = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect::<HashMap<_, _>>();

    let mut seen = HashSet::with_capacity(entities.len());
    let mut edges = Vec::new();
    for entity in entities {
        if !seen.insert(entity.name.as_str()) {
            continue;
        }
        let Some(&target) = index_by_id.get(entity.name.as_str()) else {
            continue;
        };

        for name in entity.relationship_names() {
            let Some(&source) = index_by_id.get(name) else {
                continue;
            };
            if source == target {
                tracing::debug!(name = %entity.name, "self reference skipped");
                continue;
            }
            edges.push(GraphEdge { source, target });
        }
    }
    edges
}

impl RenderGraph {
    /// Nodes, edges, adjacency and depths for one render pass. Positions are left at zero.
    pub(in crate::app) fn from_entities(entities: &[Entity]) -> Self {
        let mut nodes = build_nodes(entities);
        let edges = build_edges(entities, &nodes);

        let depths = compute_depths(&nodes, &edges);
        for (node, depth) in nodes.iter_mut().zip(&depths) {
            node.depth = *depth;
        }

        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            outgoing[edge.source].push(edge.target);
            incoming[edge.target].push(edge.source);
        }

        Self {
            max_depth: max_depth(&depths),
            nodes,
            edges,
            index_by_id,
            outgoing,
            incoming,
        }
    }

    pub(in crate::app) fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Names of the assets using `index`, in edge order.
    pub(in crate::app) fn users_of(&self, index: usize) -> Vec<&str> {
        self.outgoing
            .get(index)
            .into_iter()
            .flatten()
            .map(|&target| self.nodes[target].name.as_str())
            .collect()
    }

    /// Names `index` lists as its data sources, in catalog order. Includes
    /// references that did not resolve to a node.
    pub(in crate::app) fn dependencies_of(&self, index: usize) -> Vec<&str> {
        self.nodes
            .get(index)
            .map(|node| node.uses.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::sample_entities;

    fn abc() -> Vec<Entity> {
        vec![
            Entity::new("A", ""),
            Entity::new("B", "").using(["A"]),
            Entity::new("C", "").using(["A", "B"]),
        ]
    }

    fn named_edges(graph: &RenderGraph) -> Vec<(&str, &str)> {
        graph
            .edges
            .iter()
            .map(|edge| {
                (
                    graph.nodes[edge.source].id.as_str(),
                    graph.nodes[edge.target].id.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn edges_point_from_used_asset_to_user() {
        let graph = RenderGraph::from_entities(&abc());
        assert_eq!(named_edges(&graph), vec![("A", "B"), ("A", "C"), ("B", "C")]);

        let depths = graph
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node.depth))
            .collect::<Vec<_>>();
        assert_eq!(depths, vec![("A", 0), ("B", 1), ("C", 2)]);
        assert_eq!(graph.max_depth, 2);
    }

    #[test]
    fn unknown_and_self_references_are_dropped() {
        let entities = vec![
            Entity::new("A", "").using(["ghost", "A"]),
            Entity::new("B", "").using(["A", "A"]),
        ];
        let graph = RenderGraph::from_entities(&entities);
        // parallel edges stay
        assert_eq!(named_edges(&graph), vec![("A", "B"), ("A", "B")]);
    }

    #[test]
    fn duplicate_names_keep_the_first_entity() {
        let entities = vec![
            Entity::new("A", "first"),
            Entity::new("B", ""),
            Entity::new("A", "second").using(["B"]),
        ];
        let graph = RenderGraph::from_entities(&entities);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].description, "first");
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn adjacency_lists_name_neighbours() {
        let graph = RenderGraph::from_entities(&sample_entities());
        let three = graph.index_of("Data Asset 3").expect("present");
        assert_eq!(graph.users_of(three), vec!["Data Asset 5"]);
        assert_eq!(graph.dependencies_of(three), vec!["Data Asset 1", "Data Asset 2"]);
        assert_eq!(graph.index_of("missing"), None);
    }

    #[test]
    fn radius_has_a_floor_of_thirty() {
        assert_eq!(node_radius(""), 30.0);
        assert_eq!(node_radius("short"), 30.0);
        assert_eq!(node_radius("Data Asset 12"), 52.0);
        assert_eq!(node_radius("ééééééééé"), 36.0);
    }

    fn catalog_strategy() -> impl Strategy<Value = Vec<Entity>> {
        (1usize..14).prop_flat_map(|count| {
            proptest::collection::vec(proptest::collection::vec(0usize..20, 0..4), count).prop_map(
                move |references| {
                    references
                        .into_iter()
                        .enumerate()
                        .map(|(index, refs)| {
                            // references past the catalog end become dangling names
                            Entity::new(format!("asset-{index}"), "")
                                .using(refs.into_iter().map(|target| format!("asset-{target}")))
                        })
                        .collect()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn every_edge_resolves(entities in catalog_strategy()) {
            let graph = RenderGraph::from_entities(&entities);
            for edge in &graph.edges {
                prop_assert!(edge.source < graph.nodes.len());
                prop_assert!(edge.target < graph.nodes.len());
                prop_assert_ne!(edge.source, edge.target);
            }
        }

        #[test]
        fn rebuilding_is_deterministic(entities in catalog_strategy()) {
            let first = RenderGraph::from_entities(&entities);
            let second = RenderGraph::from_entities(&entities);
            prop_assert_eq!(named_edges(&first), named_edges(&second));
            let depths = |graph: &RenderGraph| graph.nodes.iter().map(|n| n.depth).collect::<Vec<_>>();
            prop_assert_eq!(depths(&first), depths(&second));
        }

        #[test]
        fn radius_grows_with_name_length(a in ".{0,24}", b in ".{0,24}") {
            let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
            prop_assert!(node_radius(&short) <= node_radius(&long));
            prop_assert!(node_radius(&short) >= 30.0);
        }
    }
}
