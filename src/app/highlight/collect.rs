use std::collections::{HashSet, VecDeque};

use super::super::RenderGraph;

/// Every node reachable from any of `starts` following edges in either
/// direction, starts included.
pub(super) fn connected_nodes(graph: &RenderGraph, starts: &[usize]) -> HashSet<usize> {
    let node_count = graph.nodes.len();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    for &start in starts {
        if start < node_count && visited.insert(start) {
            queue.push_back(start);
        }
    }

    while let Some(index) = queue.pop_front() {
        let neighbours = graph.outgoing[index].iter().chain(&graph.incoming[index]);
        for &next in neighbours {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}

/// Sources of edges into `index`: the assets it uses data from.
pub(super) fn direct_dependencies(graph: &RenderGraph, index: usize) -> HashSet<usize> {
    graph
        .incoming
        .get(index)
        .map(|sources| sources.iter().copied().collect())
        .unwrap_or_default()
}

/// Targets of edges out of `index`: the assets using it.
pub(super) fn direct_users(graph: &RenderGraph, index: usize) -> HashSet<usize> {
    graph
        .outgoing
        .get(index)
        .map(|targets| targets.iter().copied().collect())
        .unwrap_or_default()
}
