mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::RenderGraph;
use crate::config::LayoutConfig;
use crate::util::id_jitter;
use forces::{
    accumulate_charge_for_node, accumulate_collision_pairs, apply_center, apply_depth_attraction,
    apply_link_avoidance, apply_links, apply_vertical_centering, link_terms,
};
use quadtree::QuadNode;

/// Reusable buffers for the quadtree-backed forces.
#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

#[derive(Clone, Copy)]
struct ForceParams {
    link_distance: f32,
    charge_strength: f32,
    theta_sq: f32,
    collide_padding: f32,
    collide_strength: f32,
    depth_x_strength: f32,
    center_y_strength: f32,
    avoidance_padding: f32,
}

/// Annealed force simulation over the nodes of one render pass.
///
/// The graph is borrowed per call rather than owned so the scene can keep
/// painting from it between ticks.
pub(in crate::app) struct Simulation {
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    params: ForceParams,
    viewport: Vec2,
    target_x: Vec<f32>,
    link_strengths: Vec<f32>,
    link_biases: Vec<f32>,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub(in crate::app) fn new(graph: &RenderGraph, viewport: Vec2, config: &LayoutConfig) -> Self {
        let step = viewport.x / (graph.max_depth as f32 + 2.0);
        let target_x = graph
            .nodes
            .iter()
            .map(|node| (node.depth as f32 + 0.5) * step + id_jitter(&node.id))
            .collect();
        let (link_strengths, link_biases) = link_terms(graph.nodes.len(), &graph.edges);
        let theta = config.barnes_hut_theta.max(f32::EPSILON);

        Self {
            alpha: 1.0,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            alpha_target: 0.0,
            velocity_decay: config.velocity_decay,
            params: ForceParams {
                link_distance: config.link_distance,
                charge_strength: config.charge_strength,
                theta_sq: theta * theta,
                collide_padding: config.collide_padding,
                collide_strength: config.collide_strength,
                depth_x_strength: config.depth_x_strength,
                center_y_strength: config.center_y_strength,
                avoidance_padding: config.avoidance_padding,
            },
            viewport,
            target_x,
            link_strengths,
            link_biases,
            scratch: PhysicsScratch::default(),
        }
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    pub(in crate::app) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    pub(in crate::app) fn restart(&mut self) {
        self.alpha = 1.0;
    }

    /// Still cooling, or held warm by a drag.
    pub(in crate::app) fn is_active(&self) -> bool {
        self.alpha >= self.alpha_min || self.alpha_target > 0.0
    }

    pub(in crate::app) fn run(&mut self, graph: &mut RenderGraph, ticks: usize) {
        for _ in 0..ticks {
            self.tick(graph);
        }
    }

    pub(in crate::app) fn tick(&mut self, graph: &mut RenderGraph) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;
        let params = self.params;
        let center = self.viewport * 0.5;

        if graph.nodes.is_empty() {
            return;
        }

        apply_links(
            &mut graph.nodes,
            &graph.edges,
            &self.link_strengths,
            &self.link_biases,
            params.link_distance,
            alpha,
        );
        self.apply_many_body(graph, alpha);
        apply_center(&mut graph.nodes, center);
        self.apply_collisions(graph);
        apply_depth_attraction(
            &mut graph.nodes,
            &self.target_x,
            params.depth_x_strength,
            alpha,
        );
        apply_vertical_centering(&mut graph.nodes, center.y, params.center_y_strength, alpha);
        apply_link_avoidance(&mut graph.nodes, &graph.edges, params.avoidance_padding, alpha);

        self.integrate(graph, center);
    }

    fn apply_many_body(&mut self, graph: &mut RenderGraph, alpha: f32) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.radii.clear();
        for node in &graph.nodes {
            scratch.positions.push(node.pos);
            scratch.radii.push(node.radius);
        }

        let Some(quadtree) = QuadNode::build(&scratch.positions, &scratch.radii) else {
            return;
        };

        for (index, node) in graph.nodes.iter_mut().enumerate() {
            accumulate_charge_for_node(
                &quadtree,
                index,
                &scratch.positions,
                self.params.charge_strength,
                self.params.theta_sq,
                alpha,
                &mut node.velocity,
            );
        }
    }

    fn apply_collisions(&mut self, graph: &mut RenderGraph) {
        let node_count = graph.nodes.len();
        let scratch = &mut self.scratch;
        scratch.predicted.clear();
        scratch.radii.clear();
        for node in &graph.nodes {
            scratch.predicted.push(node.pos + node.velocity);
            scratch.radii.push(node.radius + self.params.collide_padding);
        }
        scratch.deltas.clear();
        scratch.deltas.resize(node_count, Vec2::ZERO);

        let Some(quadtree) = QuadNode::build(&scratch.predicted, &scratch.radii) else {
            return;
        };

        accumulate_collision_pairs(
            &quadtree,
            &quadtree,
            true,
            &scratch.predicted,
            &scratch.radii,
            self.params.collide_strength,
            &mut scratch.deltas,
        );

        for (node, delta) in graph.nodes.iter_mut().zip(&scratch.deltas) {
            node.velocity += *delta;
        }
    }

    fn integrate(&self, graph: &mut RenderGraph, center: Vec2) {
        let retain = 1.0 - self.velocity_decay;
        for node in &mut graph.nodes {
            if let Some(pin) = node.pinned {
                node.pos = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= retain;
            node.pos += node.velocity;

            if !node.pos.x.is_finite() || !node.pos.y.is_finite() {
                tracing::warn!(node = %node.id, "non-finite position, recentering");
                node.pos = center;
                node.velocity = Vec2::ZERO;
            }
        }
    }
}

/// Layered starting positions: x by depth, y uniform in `[0, height)`.
pub(in crate::app) fn seed_positions(graph: &mut RenderGraph, viewport: Vec2, rng: &mut impl Rng) {
    let column = viewport.x / (graph.max_depth as f32 + 1.0);
    for node in &mut graph.nodes {
        let y = if viewport.y > 0.0 {
            rng.gen_range(0.0..viewport.y)
        } else {
            0.0
        };
        node.pos = vec2(node.depth as f32 * column + 50.0, y);
        node.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
pub(in crate::app) mod test_support {
    use eframe::egui::{Vec2, vec2};

    use crate::app::GraphNode;
    use crate::app::graph::node_radius;

    pub(in crate::app) fn node_at(name: &str, x: f32, y: f32) -> GraphNode {
        GraphNode {
            id: name.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            uses: Vec::new(),
            radius: node_radius(name),
            depth: 0,
            pos: vec2(x, y),
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }
}
