use std::collections::VecDeque;

use super::super::{GraphEdge, GraphNode};

/// Longest-path depth of every node from the roots (nodes that are never an
/// edge target), indexed like `nodes`. Unreached nodes get 0.
///
/// A depth above `nodes.len() - 1` can only come from a cycle and is never
/// recorded, which bounds the relaxation on cyclic input.
pub(in crate::app) fn compute_depths(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<usize> {
    let node_count = nodes.len();
    let mut outgoing = vec![Vec::new(); node_count];
    let mut is_target = vec![false; node_count];
    for edge in edges {
        if edge.source < node_count && edge.target < node_count {
            outgoing[edge.source].push(edge.target);
            is_target[edge.target] = true;
        }
    }

    let mut depths: Vec<Option<usize>> = vec![None; node_count];
    let mut queue = VecDeque::new();
    for (index, targeted) in is_target.iter().enumerate() {
        if !targeted {
            depths[index] = Some(0);
            queue.push_back(index);
        }
    }

    let cap = node_count.saturating_sub(1);
    let mut capped = false;
    while let Some(current) = queue.pop_front() {
        let Some(depth) = depths[current] else {
            continue;
        };

        for &child in &outgoing[current] {
            let candidate = depth + 1;
            if candidate > cap {
                capped = true;
                continue;
            }
            if depths[child].is_none_or(|recorded| candidate > recorded) {
                depths[child] = Some(candidate);
                queue.push_back(child);
            }
        }
    }

    if capped {
        tracing::warn!(nodes = node_count, "relationship cycle detected, depths capped");
    }

    depths.into_iter().map(|depth| depth.unwrap_or(0)).collect()
}

pub(in crate::app) fn max_depth(depths: &[usize]) -> usize {
    depths.iter().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::app::physics::test_support::node_at;

    fn nodes(count: usize) -> Vec<GraphNode> {
        (0..count)
            .map(|index| node_at(&format!("n{index}"), 0.0, 0.0))
            .collect()
    }

    fn edges(pairs: &[(usize, usize)]) -> Vec<GraphEdge> {
        pairs
            .iter()
            .map(|&(source, target)| GraphEdge { source, target })
            .collect()
    }

    #[test]
    fn longest_path_wins() {
        // 0 -> 1 -> 2 -> 3 and a shortcut 0 -> 3
        let depths = compute_depths(&nodes(4), &edges(&[(0, 3), (0, 1), (1, 2), (2, 3)]));
        assert_eq!(depths, vec![0, 1, 2, 3]);
        assert_eq!(max_depth(&depths), 3);
    }

    #[test]
    fn isolated_nodes_are_roots() {
        let depths = compute_depths(&nodes(3), &edges(&[(0, 1)]));
        assert_eq!(depths, vec![0, 1, 0]);
    }

    #[test]
    fn cycle_reachable_from_root_terminates() {
        // 0 -> 1 -> 2 -> 1
        let depths = compute_depths(&nodes(3), &edges(&[(0, 1), (1, 2), (2, 1)]));
        assert!(depths.iter().all(|&depth| depth <= 2));
        assert_eq!(depths[0], 0);
    }

    #[test]
    fn rootless_cycle_defaults_to_zero() {
        let depths = compute_depths(&nodes(2), &edges(&[(0, 1), (1, 0)]));
        assert_eq!(depths, vec![0, 0]);
    }

    #[test]
    fn empty_input() {
        assert!(compute_depths(&[], &[]).is_empty());
        assert_eq!(max_depth(&[]), 0);
    }

    fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..16).prop_flat_map(|count| {
            let pairs = proptest::collection::vec((0..count, 0..count), 0..(count * 2));
            pairs.prop_map(move |pairs| {
                let edges = pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .collect::<Vec<_>>();
                (count, edges)
            })
        })
    }

    proptest! {
        #[test]
        fn depth_increases_along_every_edge((count, pairs) in dag_strategy()) {
            let depths = compute_depths(&nodes(count), &edges(&pairs));
            for &(source, target) in &pairs {
                prop_assert!(depths[target] >= depths[source] + 1);
            }
        }

        #[test]
        fn roots_sit_at_depth_zero((count, pairs) in dag_strategy()) {
            let depths = compute_depths(&nodes(count), &edges(&pairs));
            for index in 0..count {
                if pairs.iter().all(|&(_, target)| target != index) {
                    prop_assert_eq!(depths[index], 0);
                }
            }
        }
    }
}
