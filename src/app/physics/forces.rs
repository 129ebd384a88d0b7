use eframe::egui::{Vec2, vec2};

use super::super::geometry::closest_point_on_segment;
use super::super::{GraphEdge, GraphNode};
use super::quadtree::QuadNode;

/// Tiny deterministic offset used when two points coincide.
fn jiggle(seed: usize) -> Vec2 {
    let angle = ((seed as f32) * 0.618_034 + 0.37) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

/// Inverse-square falloff with the singularity below one pixel flattened out.
fn softened(distance_sq: f32) -> f32 {
    if distance_sq < 1.0 {
        distance_sq.sqrt()
    } else {
        distance_sq
    }
}

/// Per-link strength `1 / min(deg(s), deg(t))` and bias `deg(s) / (deg(s) + deg(t))`.
pub(super) fn link_terms(node_count: usize, edges: &[GraphEdge]) -> (Vec<f32>, Vec<f32>) {
    let mut degree = vec![0usize; node_count];
    for edge in edges {
        if edge.source < node_count && edge.target < node_count {
            degree[edge.source] += 1;
            degree[edge.target] += 1;
        }
    }

    edges
        .iter()
        .map(|edge| {
            let source = degree.get(edge.source).copied().unwrap_or(0).max(1) as f32;
            let target = degree.get(edge.target).copied().unwrap_or(0).max(1) as f32;
            (1.0 / source.min(target), source / (source + target))
        })
        .unzip()
}

pub(super) fn apply_links(
    nodes: &mut [GraphNode],
    edges: &[GraphEdge],
    strengths: &[f32],
    biases: &[f32],
    distance: f32,
    alpha: f32,
) {
    let node_count = nodes.len();
    for (index, edge) in edges.iter().enumerate() {
        let (source, target) = (edge.source, edge.target);
        if source == target || source >= node_count || target >= node_count {
            continue;
        }

        let mut delta = (nodes[target].pos + nodes[target].velocity)
            - (nodes[source].pos + nodes[source].velocity);
        if delta.length_sq() <= f32::EPSILON {
            delta = jiggle(index);
        }

        let length = delta.length();
        let scale = (length - distance) / length * alpha * strengths[index];
        let correction = delta * scale;
        let bias = biases[index];

        nodes[target].velocity -= correction * bias;
        nodes[source].velocity += correction * (1.0 - bias);
    }
}

/// Barnes-Hut many-body term for one node. `strength` is negative for repulsion.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta_sq: f32,
    alpha: f32,
    velocity: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }

            let mut delta = positions[other_index] - point;
            if delta.length_sq() <= f32::EPSILON {
                // opposite signs for the two members of a pair
                let offset = jiggle(index + other_index);
                delta = if index < other_index { offset } else { -offset };
            }
            *velocity += delta * (strength * alpha / softened(delta.length_sq()));
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance_sq = delta.length_sq();
    let side = node.bounds.side_length();
    if (side * side) / theta_sq < distance_sq {
        *velocity += delta * (strength * node.mass * alpha / softened(distance_sq));
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, strength, theta_sq, alpha, velocity);
    }
}

pub(super) fn apply_center(nodes: &mut [GraphNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mut mean = Vec2::ZERO;
    for node in nodes.iter() {
        mean += node.pos;
    }
    mean /= nodes.len() as f32;

    let shift = mean - center;
    for node in nodes.iter_mut() {
        node.pos -= shift;
    }
}

fn collide_pair(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut delta = predicted[from] - predicted[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    if distance_sq <= 1e-12 {
        delta = jiggle(from.wrapping_mul(31) ^ to);
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = to_sq / (from_sq + to_sq);

    deltas[from] += push * share;
    deltas[to] -= push * (1.0 - share);
}

/// Pairwise collision over two quadtree regions; regions further apart
/// than their largest radii combined are skipped wholesale.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = node_a.max_radius + node_b.max_radius;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                for j in (i + 1)..node_a.indices.len() {
                    collide_pair(
                        node_a.indices[i],
                        node_a.indices[j],
                        predicted,
                        radii,
                        strength,
                        deltas,
                    );
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    collide_pair(from, to, predicted, radii, strength, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, predicted, radii, strength, deltas);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a, child_b, false, predicted, radii, strength, deltas,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, predicted, radii, strength, deltas);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, predicted, radii, strength, deltas);
        }
    }
}

pub(super) fn apply_depth_attraction(
    nodes: &mut [GraphNode],
    target_x: &[f32],
    strength: f32,
    alpha: f32,
) {
    for (node, &target) in nodes.iter_mut().zip(target_x) {
        node.velocity.x += (target - node.pos.x) * strength * alpha;
    }
}

pub(super) fn apply_vertical_centering(
    nodes: &mut [GraphNode],
    center_y: f32,
    strength: f32,
    alpha: f32,
) {
    for node in nodes.iter_mut() {
        node.velocity.y += (center_y - node.pos.y) * strength * alpha;
    }
}

/// Pushes nodes off the body of links they are not an endpoint of.
pub(super) fn apply_link_avoidance(
    nodes: &mut [GraphNode],
    edges: &[GraphEdge],
    padding: f32,
    alpha: f32,
) {
    let node_count = nodes.len();
    for index in 0..node_count {
        let point = nodes[index].pos;
        let threshold = nodes[index].radius + padding;
        let mut nudge = Vec2::ZERO;

        for edge in edges {
            if edge.source == index
                || edge.target == index
                || edge.source >= node_count
                || edge.target >= node_count
            {
                continue;
            }

            let Some(projection) =
                closest_point_on_segment(point, nodes[edge.source].pos, nodes[edge.target].pos)
            else {
                continue;
            };

            let offset = point - projection;
            let distance = offset.length();
            if distance >= threshold {
                continue;
            }

            let strength = ((threshold - distance) / threshold).min(5.0) * alpha * 10.0;
            if distance > 0.0 {
                nudge += (offset / distance) * strength;
            }
        }

        nodes[index].velocity += nudge;
    }
}
