use crate::catalog::Entity;
use crate::util::contains_ignore_case;

mod collect;
mod style;

use self::collect::{connected_nodes, direct_dependencies, direct_users};
pub(crate) use self::style::StyleTable;
use super::RenderGraph;

/// What the canvas is currently emphasising. Selection and search exclude
/// each other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum InteractionMode {
    #[default]
    Neutral,
    NodeSelected(String),
    /// `matches` empty means "no results", which is not the same as neutral.
    SearchActive { term: String, matches: Vec<String> },
}

impl InteractionMode {
    /// Clicking the selected node again clears the selection.
    pub(crate) fn click_node(&mut self, id: &str) {
        *self = match self {
            Self::NodeSelected(current) if current.as_str() == id => Self::Neutral,
            _ => Self::NodeSelected(id.to_owned()),
        };
    }

    pub(crate) fn click_background(&mut self) {
        *self = Self::Neutral;
    }

    /// Empty text only leaves search mode; it never clears a selection.
    /// Whitespace is a real term and is matched as typed.
    pub(crate) fn set_search(&mut self, term: &str, entities: &[Entity]) {
        if term.is_empty() {
            if matches!(self, Self::SearchActive { .. }) {
                *self = Self::Neutral;
            }
            return;
        }

        *self = Self::SearchActive {
            term: term.to_owned(),
            matches: search_matches(entities, term),
        };
    }

    /// Re-evaluates the mode against a changed catalog.
    pub(crate) fn refresh(&mut self, entities: &[Entity]) {
        match self {
            Self::Neutral => {}
            Self::NodeSelected(id) => {
                if !entities.iter().any(|entity| entity.name == *id) {
                    tracing::debug!(node = %id, "selected asset vanished, clearing selection");
                    *self = Self::Neutral;
                }
            }
            Self::SearchActive { term, matches } => {
                *matches = search_matches(entities, term);
            }
        }
    }

    pub(crate) fn selected(&self) -> Option<&str> {
        match self {
            Self::NodeSelected(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub(crate) fn is_no_results(&self) -> bool {
        matches!(self, Self::SearchActive { matches, .. } if matches.is_empty())
    }
}

/// Names of the entities whose name or description contains `term`, ignoring case.
pub(crate) fn search_matches(entities: &[Entity], term: &str) -> Vec<String> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entities
        .iter()
        .filter(|entity| {
            contains_ignore_case(&entity.name, &needle)
                || contains_ignore_case(&entity.description, &needle)
        })
        .map(|entity| entity.name.clone())
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeRole {
    Default,
    Selected,
    DirectDependency,
    DirectUser,
    Indirect,
    SearchMatch,
    SearchConnected,
    Unrelated,
}

impl NodeRole {
    pub(crate) const COUNT: usize = 8;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EdgeRole {
    Default,
    /// Source is the selected node.
    Outgoing,
    /// Target is the selected node.
    Incoming,
    InClosure,
    SearchBothMatch,
    SearchOneMatch,
    SearchConnected,
    Outside,
}

impl EdgeRole {
    pub(crate) const COUNT: usize = 8;
}

/// Per-node and per-edge roles for one frame, indexed like the render graph.
pub(crate) struct Highlight {
    pub(crate) nodes: Vec<NodeRole>,
    pub(crate) edges: Vec<EdgeRole>,
}

impl Highlight {
    fn neutral(graph: &RenderGraph) -> Self {
        Self {
            nodes: vec![NodeRole::Default; graph.nodes.len()],
            edges: vec![EdgeRole::Default; graph.edges.len()],
        }
    }

    pub(in crate::app) fn compute(graph: &RenderGraph, mode: &InteractionMode) -> Self {
        match mode {
            InteractionMode::Neutral => Self::neutral(graph),
            InteractionMode::NodeSelected(id) => match graph.index_of(id) {
                Some(selected) => Self::for_selection(graph, selected),
                None => Self::neutral(graph),
            },
            InteractionMode::SearchActive { matches, .. } => {
                let indices = matches
                    .iter()
                    .filter_map(|id| graph.index_of(id))
                    .collect::<Vec<_>>();
                if indices.is_empty() {
                    Self::neutral(graph)
                } else {
                    Self::for_search(graph, &indices)
                }
            }
        }
    }

    fn for_selection(graph: &RenderGraph, selected: usize) -> Self {
        let closure = connected_nodes(graph, &[selected]);
        let dependencies = direct_dependencies(graph, selected);
        let users = direct_users(graph, selected);

        let nodes = (0..graph.nodes.len())
            .map(|index| {
                if index == selected {
                    NodeRole::Selected
                } else if dependencies.contains(&index) {
                    NodeRole::DirectDependency
                } else if users.contains(&index) {
                    NodeRole::DirectUser
                } else if closure.contains(&index) {
                    NodeRole::Indirect
                } else {
                    NodeRole::Unrelated
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| {
                if edge.source == selected {
                    EdgeRole::Outgoing
                } else if edge.target == selected {
                    EdgeRole::Incoming
                } else if closure.contains(&edge.source) && closure.contains(&edge.target) {
                    EdgeRole::InClosure
                } else {
                    EdgeRole::Outside
                }
            })
            .collect();

        Self { nodes, edges }
    }

    fn for_search(graph: &RenderGraph, matched: &[usize]) -> Self {
        let closure = connected_nodes(graph, matched);
        let is_match = |index: usize| matched.contains(&index);

        let nodes = (0..graph.nodes.len())
            .map(|index| {
                if is_match(index) {
                    NodeRole::SearchMatch
                } else if closure.contains(&index) {
                    NodeRole::SearchConnected
                } else {
                    NodeRole::Unrelated
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| {
                if !closure.contains(&edge.source) || !closure.contains(&edge.target) {
                    return EdgeRole::Outside;
                }
                match (is_match(edge.source), is_match(edge.target)) {
                    (true, true) => EdgeRole::SearchBothMatch,
                    (true, false) | (false, true) => EdgeRole::SearchOneMatch,
                    (false, false) => EdgeRole::SearchConnected,
                }
            })
            .collect();

        Self { nodes, edges }
    }
}
